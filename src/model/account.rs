use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::Header;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub account_type: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub credit_limit: Option<Decimal>,
    pub statement_balance_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub statement_balance: Option<Decimal>,
    pub header: Header,
}

impl Account {
    pub fn new(name: impl Into<String>, account_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account_type: account_type.into(),
            description: String::new(),
            credit_limit: None,
            statement_balance_date: None,
            statement_balance: None,
            header: Header::account(),
        }
    }

    /// Whether both refer to the same ledger account. Only the identifying
    /// fields take part, so an account read from a transaction preamble
    /// is the same account as its fuller entry in the account list.
    pub fn is_same_account(&self, other: &Account) -> bool {
        self.name == other.name && self.account_type == other.account_type
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new("", "")
    }
}
