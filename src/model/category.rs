use rust_decimal::Decimal;
use serde::Serialize;

use super::Header;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Category {
    pub name: String,
    pub description: String,
    pub tax_related: bool,
    pub tax_schedule: String,
    pub income_category: bool,
    pub expense_category: bool,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub budget: Option<Decimal>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn header(&self) -> Header {
        Header::category()
    }
}
