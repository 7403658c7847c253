use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};

use super::error::{MatchError, Side};
use super::reference::TransactionLike;
use super::score::{compare_with, ranking, MatchScore, ScoringWeights};
use crate::model::Transaction;

pub const DEFAULT_MIN_SCORE: i32 = 50;

/// Pairs up bank transactions with reference transactions, one to one.
///
/// The pairing maps bank positions to reference positions. No position of
/// either side is ever used by more than one pair.
pub struct MatchSession<B, R> {
    bank: Vec<B>,
    reference: Vec<R>,
    pairs: BTreeMap<usize, usize>,
    min_score_default: i32,
    weights: ScoringWeights,
}

/// Why a bank transaction has no partner.
#[derive(Debug, Clone, PartialEq)]
pub enum Nonmatch {
    /// No unmatched reference transaction has the same amount.
    NoEqualAmount { amount: Decimal },
    /// The best unmatched reference transaction and its score.
    BestCandidate { index: usize, score: MatchScore },
}

impl Display for Nonmatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nonmatch::NoEqualAmount { amount } => {
                write!(f, "No equal-amount candidates for ${}.", amount)
            }
            Nonmatch::BestCandidate { index, score } => {
                let mut parts = vec![format!(
                    "Best candidate index {} (score {}).",
                    index, score.score
                )];
                if let Some(days) = score.features.date_days {
                    parts.push(format!("Date Δ = {} day(s)", days));
                }
                parts.push(format!("Payee sim = {:.2}", score.features.payee_sim));
                parts.extend(score.reasons.iter().cloned());
                write!(f, "{}", parts.join("; "))
            }
        }
    }
}

impl<B: TransactionLike, R: TransactionLike> MatchSession<B, R> {
    pub fn new(bank: Vec<B>, reference: Vec<R>, min_score_default: i32) -> Self {
        Self {
            bank,
            reference,
            pairs: BTreeMap::new(),
            min_score_default,
            weights: ScoringWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn bank(&self) -> &[B] {
        &self.bank
    }

    pub fn reference(&self) -> &[R] {
        &self.reference
    }

    pub fn has_pairs(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Replaces the current pairing with a greedy one. Bank transactions are
    /// visited in order, and each takes the best still-unused reference
    /// transaction of the same amount if that candidate scores at least the
    /// threshold. Returns the pairs in bank order.
    pub fn auto_match(&mut self, min_score: Option<i32>) -> Vec<(usize, usize)> {
        let threshold = min_score.unwrap_or(self.min_score_default);
        self.pairs.clear();

        let mut by_amount: BTreeMap<Decimal, Vec<usize>> = BTreeMap::new();
        for (index, reference) in self.reference.iter().enumerate() {
            by_amount.entry(reference.amount()).or_default().push(index);
        }

        let mut used = vec![false; self.reference.len()];
        for (bank_index, bank) in self.bank.iter().enumerate() {
            let Some(candidates) = by_amount.get(&bank.amount()) else {
                continue;
            };
            let best = candidates
                .iter()
                .filter(|&&index| !used[index])
                .map(|&index| (compare_with(bank, &self.reference[index], &self.weights), index))
                .min_by(|(a, a_index), (b, b_index)| ranking(a, b).then(a_index.cmp(b_index)));
            let Some((score, reference_index)) = best else {
                continue;
            };
            if score.score < threshold {
                log::debug!(
                    "Bank transaction {}: best candidate {} scores {} < {}",
                    bank_index,
                    reference_index,
                    score.score,
                    threshold,
                );
                continue;
            }
            self.pairs.insert(bank_index, reference_index);
            used[reference_index] = true;
        }
        log::info!(
            "Matched {} of {} bank transactions against {} reference transactions",
            self.pairs.len(),
            self.bank.len(),
            self.reference.len(),
        );
        self.pairs()
    }

    /// Pairs the two transactions, dropping any pair either of them was part of.
    pub fn manual_match(&mut self, bank_index: usize, reference_index: usize) -> Result<(), MatchError> {
        self.check_bank_index(bank_index)?;
        self.check_reference_index(reference_index)?;
        self.pairs.retain(|_, paired| *paired != reference_index);
        self.pairs.insert(bank_index, reference_index);
        Ok(())
    }

    /// Drops the pair of the given bank transaction and the pair of the given
    /// reference transaction. Passing neither does nothing.
    pub fn manual_unmatch(
        &mut self,
        bank_index: Option<usize>,
        reference_index: Option<usize>,
    ) -> Result<(), MatchError> {
        if let Some(index) = bank_index {
            self.check_bank_index(index)?;
        }
        if let Some(index) = reference_index {
            self.check_reference_index(index)?;
        }
        if let Some(index) = bank_index {
            self.pairs.remove(&index);
        }
        if let Some(index) = reference_index {
            self.pairs.retain(|_, paired| *paired != index);
        }
        Ok(())
    }

    /// The current pairs as (bank index, reference index), in bank order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.pairs.iter().map(|(&bank, &reference)| (bank, reference)).collect()
    }

    pub fn matched_bank_indices(&self) -> BTreeSet<usize> {
        self.pairs.keys().copied().collect()
    }

    pub fn matched(&self) -> impl Iterator<Item = (&B, &R)> + '_ {
        self.pairs
            .iter()
            .map(|(&bank, &reference)| (&self.bank[bank], &self.reference[reference]))
    }

    pub fn unmatched_bank(&self) -> Vec<(usize, &B)> {
        self.bank
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.pairs.contains_key(index))
            .collect()
    }

    pub fn unmatched_reference(&self) -> Vec<(usize, &R)> {
        self.reference
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.is_reference_matched(*index))
            .collect()
    }

    fn is_reference_matched(&self, index: usize) -> bool {
        self.pairs.values().any(|&paired| paired == index)
    }

    /// Scores the bank transaction against every unmatched reference
    /// transaction and reports the best equal-amount candidate, ranked the
    /// same way as in [`auto_match`](Self::auto_match).
    pub fn explain_nonmatch(&self, bank_index: usize) -> Result<Nonmatch, MatchError> {
        self.check_bank_index(bank_index)?;
        let bank = &self.bank[bank_index];
        let best = self
            .unmatched_reference()
            .into_iter()
            .map(|(index, reference)| (compare_with(bank, reference, &self.weights), index))
            .filter(|(score, _)| score.amounts_match())
            .min_by(|(a, a_index), (b, b_index)| ranking(a, b).then(a_index.cmp(b_index)));
        Ok(match best {
            Some((score, index)) => Nonmatch::BestCandidate { index, score },
            None => Nonmatch::NoEqualAmount {
                amount: bank.amount(),
            },
        })
    }

    pub fn nonmatch_reason(&self, bank_index: usize) -> Result<String, MatchError> {
        Ok(self.explain_nonmatch(bank_index)?.to_string())
    }

    fn check_bank_index(&self, index: usize) -> Result<(), MatchError> {
        check_index(Side::Bank, index, self.bank.len())
    }

    fn check_reference_index(&self, index: usize) -> Result<(), MatchError> {
        check_index(Side::Reference, index, self.reference.len())
    }
}

fn check_index(side: Side, index: usize, len: usize) -> Result<(), MatchError> {
    if index < len {
        Ok(())
    } else {
        Err(MatchError::InvalidIndex { side, index, len })
    }
}

impl<R: TransactionLike> MatchSession<Transaction, R> {
    /// Copies category, tag and splits of each paired reference transaction
    /// onto its bank transaction. Returns the number of updated transactions.
    pub fn apply_updates(&mut self) -> usize {
        for (&bank_index, &reference_index) in &self.pairs {
            let reference = &self.reference[reference_index];
            let transaction = &mut self.bank[bank_index];
            transaction.splits = reference.splits().to_vec();
            transaction.category = if transaction.splits.is_empty() {
                reference.category().to_string()
            } else {
                String::new()
            };
            transaction.tag = reference.tag().to_string();
            if transaction.has_splits() && transaction.splits_total() != transaction.amount {
                log::warn!(
                    "Splits of bank transaction {} add up to {} instead of {}",
                    bank_index,
                    transaction.splits_total(),
                    transaction.amount,
                );
            }
        }
        self.pairs.len()
    }

    pub fn into_bank(self) -> Vec<Transaction> {
        self.bank
    }
}
