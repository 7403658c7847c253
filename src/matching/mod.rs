//! Matching bank transactions against reference transactions.
//!
//! Every candidate pair gets a score from [`compare`]. Pairs whose amounts
//! differ are never paired automatically; among equal amounts, close dates and
//! similar payees win. A [`MatchSession`] holds the one-to-one pairing and
//! lets callers adjust it by hand.

mod error;
mod reference;
mod score;
mod session;
mod similarity;

pub use error::{MatchError, Side};
pub use reference::{ReferenceTransaction, TransactionLike};
pub use score::{compare, compare_with, ranking, MatchFeatures, MatchScore, ScoringWeights};
pub use session::{MatchSession, Nonmatch, DEFAULT_MIN_SCORE};
pub use similarity::{normalize_payee, payee_similarity};
