use anyhow::{anyhow, bail, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::matching::{ScoringWeights, DEFAULT_MIN_SCORE};

/// Matcher settings, read from a YAML file.
///
/// ```yaml
/// min_score: 60
/// weights:
///   date_per_day: 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub min_score: i32,
    pub weights: ScoringWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            weights: ScoringWeights::default(),
        }
    }
}

impl Config {
    /// Loads the config at `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| anyhow!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| anyhow!("Error in config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let weights = &self.weights;
        if weights.amount_mismatch_score >= 0 {
            bail!(
                "amount_mismatch_score must be negative, got {}",
                weights.amount_mismatch_score
            );
        }
        for (name, value) in [
            ("max_score", weights.max_score),
            ("date_base", weights.date_base),
            ("date_per_day", weights.date_per_day),
            ("payee_max", weights.payee_max),
        ] {
            if value < 0 {
                bail!("{} must not be negative, got {}", name, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(Config::default(), config);
        assert_eq!(50, config.min_score);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_score: 70\nweights:\n  date_per_day: 10").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(70, config.min_score);
        assert_eq!(10, config.weights.date_per_day);
        assert_eq!(100, config.weights.date_base);
        assert_eq!(-1000, config.weights.amount_mismatch_score);
    }

    #[test]
    fn positive_mismatch_score_is_rejected() {
        let err = Config::from_yaml("weights:\n  amount_mismatch_score: 5").unwrap_err();
        assert!(err.to_string().contains("amount_mismatch_score"));
    }

    #[test]
    fn negative_credit_is_rejected() {
        let err = Config::from_yaml("weights:\n  payee_max: -1").unwrap_err();
        assert!(err.to_string().contains("payee_max"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_yaml("min_scor: 10").is_err());
    }
}
