use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

const INVESTMENT_CODE_PREFIX: &str = "!type:invst";

/// A section or record-type marker such as `!Type:Bank` or `!Account`.
///
/// Two headers are the same header if their codes are the same. The description
/// and type text are informational and don't take part in comparisons.
#[derive(Serialize, Debug, Clone)]
pub struct Header {
    pub code: String,
    pub description: String,
    pub type_name: String,
}

impl Header {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            type_name: type_name.into(),
        }
    }

    pub fn account() -> Self {
        Self::new("!Account", "Account list or which account follows", "Account")
    }

    pub fn category() -> Self {
        Self::new("!Type:Cat", "Category list", "Category")
    }

    pub fn tag() -> Self {
        Self::new("!Type:Tag", "Tag list", "Tag")
    }

    /// Builds the header of a transaction block from its `!Type:` line.
    pub fn transaction_type(line: &str) -> Self {
        let type_name = line
            .split_once(':')
            .map(|(_, name)| name.trim())
            .unwrap_or_default();
        Self::new(
            line.trim(),
            format!("{} transactions", type_name),
            type_name,
        )
    }

    pub fn bank() -> Self {
        Self::transaction_type("!Type:Bank")
    }

    pub fn is_investment(&self) -> bool {
        self.code.to_lowercase().starts_with(INVESTMENT_CODE_PREFIX)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::bank()
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Header {}

impl Hash for Header {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl PartialOrd for Header {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Header {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_description() {
        let a = Header::new("!Type:Bank", "Checking", "Bank");
        let b = Header::new("!Type:Bank", "Something else", "");
        assert_eq!(a, b);
        assert_ne!(a, Header::new("!Type:CCard", "Checking", "Bank"));
    }

    #[test]
    fn ordering_uses_code() {
        let mut headers = vec![
            Header::new("!Type:Invst", "a", ""),
            Header::new("!Type:Bank", "z", ""),
            Header::new("!Type:CCard", "m", ""),
        ];
        headers.sort();
        let codes: Vec<_> = headers.iter().map(|h| h.code.as_str()).collect();
        assert_eq!(vec!["!Type:Bank", "!Type:CCard", "!Type:Invst"], codes);
    }

    #[test]
    fn transaction_type_from_line() {
        let header = Header::transaction_type("!Type:CCard");
        assert_eq!("!Type:CCard", header.code);
        assert_eq!("CCard", header.type_name);
        assert!(!header.is_investment());
        assert!(Header::transaction_type("!type:invst").is_investment());
    }
}
