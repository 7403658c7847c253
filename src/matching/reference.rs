use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{Split, Transaction};

/// What the matcher needs to know about a transaction, whatever its source.
pub trait TransactionLike {
    fn date(&self) -> Option<NaiveDate>;
    fn amount(&self) -> Decimal;
    fn payee(&self) -> &str;

    fn memo(&self) -> &str {
        ""
    }

    fn category(&self) -> &str {
        ""
    }

    fn tag(&self) -> &str {
        ""
    }

    fn splits(&self) -> &[Split] {
        &[]
    }
}

impl<T: TransactionLike + ?Sized> TransactionLike for &T {
    fn date(&self) -> Option<NaiveDate> {
        (**self).date()
    }

    fn amount(&self) -> Decimal {
        (**self).amount()
    }

    fn payee(&self) -> &str {
        (**self).payee()
    }

    fn memo(&self) -> &str {
        (**self).memo()
    }

    fn category(&self) -> &str {
        (**self).category()
    }

    fn tag(&self) -> &str {
        (**self).tag()
    }

    fn splits(&self) -> &[Split] {
        (**self).splits()
    }
}

impl TransactionLike for Transaction {
    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn payee(&self) -> &str {
        &self.payee
    }

    fn memo(&self) -> &str {
        &self.memo
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn splits(&self) -> &[Split] {
        &self.splits
    }
}

/// A transaction from an external source, e.g. a spreadsheet export converted to JSON.
///
/// ```json
/// {"date": "2025-08-01", "amount": "-42.50", "payee": "Acme", "category": "Groceries"}
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ReferenceTransaction {
    pub date: Option<NaiveDate>,
    pub amount: Decimal,
    pub payee: String,
    pub memo: String,
    pub category: String,
    pub tag: String,
    pub splits: Vec<Split>,
}

impl ReferenceTransaction {
    pub fn new(date: Option<NaiveDate>, amount: Decimal, payee: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            payee: payee.into(),
            ..Default::default()
        }
    }

    /// Reads a JSON array of reference transactions.
    pub fn from_json(json: &str) -> serde_json::Result<Vec<Self>> {
        serde_json::from_str(json)
    }
}

impl TransactionLike for ReferenceTransaction {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn payee(&self) -> &str {
        &self.payee
    }

    fn memo(&self) -> &str {
        &self.memo
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn splits(&self) -> &[Split] {
        &self.splits
    }
}
