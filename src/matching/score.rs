use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::reference::TransactionLike;
use super::similarity::payee_similarity;

/// The constants of the scoring function.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringWeights {
    /// Score of any pair whose amounts differ. Must stay below every equal-amount score.
    pub amount_mismatch_score: i32,
    pub max_score: i32,
    /// Credit for identical dates.
    pub date_base: i32,
    /// Credit lost per day between the two dates.
    pub date_per_day: i32,
    /// Credit for identical payees.
    pub payee_max: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            amount_mismatch_score: -1000,
            max_score: 200,
            date_base: 100,
            date_per_day: 5,
            payee_max: 80,
        }
    }
}

/// Raw inputs and intermediate values of a comparison.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchFeatures {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount_a: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount_b: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount_diff: Decimal,
    pub date_a: Option<NaiveDate>,
    pub date_b: Option<NaiveDate>,
    pub date_days: Option<i64>,
    pub payee_a: String,
    pub payee_b: String,
    /// Rounded to three decimal places.
    pub payee_sim: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub score: i32,
    pub reasons: Vec<String>,
    pub features: MatchFeatures,
}

impl MatchScore {
    pub fn amounts_match(&self) -> bool {
        self.features.amount_diff.is_zero()
    }
}

/// Orders candidates best first: highest score, then fewest days apart (a
/// missing date ranks after any known distance), then most similar payee.
pub fn ranking(a: &MatchScore, b: &MatchScore) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| match (a.features.date_days, b.features.date_days) {
            (Some(a_days), Some(b_days)) => a_days.cmp(&b_days),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.features.payee_sim.total_cmp(&a.features.payee_sim))
}

pub fn compare<A, B>(a: &A, b: &B) -> MatchScore
where
    A: TransactionLike + ?Sized,
    B: TransactionLike + ?Sized,
{
    compare_with(a, b, &ScoringWeights::default())
}

/// Scores how likely `a` and `b` are the same transaction. Unequal amounts
/// always get `amount_mismatch_score`; otherwise date proximity and payee
/// similarity add up, capped at `max_score`.
pub fn compare_with<A, B>(a: &A, b: &B, weights: &ScoringWeights) -> MatchScore
where
    A: TransactionLike + ?Sized,
    B: TransactionLike + ?Sized,
{
    let amount_diff = (a.amount() - b.amount()).abs();
    let date_days = match (a.date(), b.date()) {
        (Some(date_a), Some(date_b)) => Some((date_a - date_b).num_days().abs()),
        _ => None,
    };
    let payee_sim = payee_similarity(a.payee(), b.payee());

    let features = MatchFeatures {
        amount_a: a.amount(),
        amount_b: b.amount(),
        amount_diff,
        date_a: a.date(),
        date_b: b.date(),
        date_days,
        payee_a: a.payee().to_string(),
        payee_b: b.payee().to_string(),
        payee_sim: (payee_sim * 1000.0).round() / 1000.0,
    };

    let mut reasons = Vec::new();
    if !amount_diff.is_zero() {
        reasons.push(format!("Amount differs by {}", amount_diff));
        return MatchScore {
            score: weights.amount_mismatch_score,
            reasons,
            features,
        };
    }

    let mut score: i64 = 0;
    match date_days {
        Some(days) => {
            let date_points = (i64::from(weights.date_base)
                - i64::from(weights.date_per_day).saturating_mul(days))
            .max(0);
            score += date_points;
            if days == 0 {
                reasons.push(format!("Same date (+{})", date_points));
            } else {
                reasons.push(format!("{} day(s) apart (+{})", days, date_points));
            }
        }
        None => reasons.push("No date on one side (+0)".to_string()),
    }

    let payee_points = (f64::from(weights.payee_max) * payee_sim).round_ties_even() as i64;
    score += payee_points;
    reasons.push(format!("Payee similarity {:.2} (+{})", payee_sim, payee_points));

    MatchScore {
        score: score.min(i64::from(weights.max_score)) as i32,
        reasons,
        features,
    }
}
