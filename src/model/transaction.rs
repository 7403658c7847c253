use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::rc::Rc;

use super::{Account, ClearedStatus, Header, Security, Split};

/// A single ledger transaction.
///
/// The account is shared with every other transaction of the same account block;
/// the transaction doesn't own it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub account: Rc<Account>,
    pub header: Header,
    pub date: NaiveDate,
    pub action_chk: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub cleared: ClearedStatus,
    pub payee: String,
    pub address: Vec<String>,
    pub memo: String,
    pub category: String,
    pub tag: String,
    pub splits: Vec<Split>,
    pub security: Option<Security>,
}

impl Transaction {
    pub fn new(account: Rc<Account>, header: Header, date: NaiveDate, amount: Decimal) -> Self {
        Self {
            account,
            header,
            date,
            action_chk: String::new(),
            amount,
            cleared: ClearedStatus::default(),
            payee: String::new(),
            address: Vec::new(),
            memo: String::new(),
            category: String::new(),
            tag: String::new(),
            splits: Vec::new(),
            security: None,
        }
    }

    pub fn has_splits(&self) -> bool {
        !self.splits.is_empty()
    }

    pub fn splits_total(&self) -> Decimal {
        self.splits.iter().map(|split| split.amount).sum()
    }

    /// Splits in their canonical order, for order-insensitive comparisons.
    pub fn sorted_splits(&self) -> Vec<Split> {
        let mut splits = self.splits.clone();
        splits.sort();
        splits
    }
}
