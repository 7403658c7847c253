//! Turns raw field values into typed values.

use chrono::NaiveDate;
use chumsky::{prelude::end, Parser as _};
use rust_decimal::Decimal;

use super::error::ConversionError;
use super::fields::Field;
use crate::model::ClearedStatus;

mod amount;
mod date;
#[cfg(test)]
mod testutils;

pub use amount::amount;
pub use date::{date, format_date};

/// The marker written in place of the category of a transaction with splits.
pub const SPLIT_SENTINEL: &str = "--Split--";

const TAG_SEPARATOR: char = '/';

/// A type that can be read from the raw value of a QIF field.
pub trait QifValue: Sized {
    const TARGET: &'static str;

    fn from_qif(raw: &str) -> Result<Self, String>;
}

/// Converts the raw value of `field` into `T`.
pub fn coerce<T: QifValue>(field: Field, raw: &str) -> Result<T, ConversionError> {
    T::from_qif(raw).map_err(|reason| ConversionError {
        field: field.name(),
        target: T::TARGET,
        raw: raw.to_string(),
        reason,
    })
}

fn run_parser<T>(
    parser: impl chumsky::Parser<char, T, Error = chumsky::error::Simple<char>>,
    raw: &str,
) -> Result<T, String> {
    parser.then_ignore(end()).parse(raw).map_err(|errors| {
        errors
            .into_iter()
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    })
}

impl QifValue for String {
    const TARGET: &'static str = "text";

    fn from_qif(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl QifValue for Decimal {
    const TARGET: &'static str = "decimal";

    fn from_qif(raw: &str) -> Result<Self, String> {
        run_parser(amount(), raw)
    }
}

impl QifValue for NaiveDate {
    const TARGET: &'static str = "date";

    fn from_qif(raw: &str) -> Result<Self, String> {
        run_parser(date(), raw)
    }
}

/// Flag fields are set by their mere presence; an explicit value may still switch them off.
impl QifValue for bool {
    const TARGET: &'static str = "flag";

    fn from_qif(raw: &str) -> Result<Self, String> {
        match raw.to_lowercase().as_str() {
            "" | "y" | "yes" | "t" | "true" | "1" => Ok(true),
            "n" | "no" | "f" | "false" | "0" => Ok(false),
            _ => Err("Expected a yes/no flag".to_string()),
        }
    }
}

impl QifValue for ClearedStatus {
    const TARGET: &'static str = "cleared status";

    fn from_qif(raw: &str) -> Result<Self, String> {
        match raw {
            "" | "N" => Ok(ClearedStatus::NotCleared),
            "*" | "c" => Ok(ClearedStatus::Cleared),
            "X" | "R" => Ok(ClearedStatus::Reconciled),
            "?" => Ok(ClearedStatus::Unknown),
            _ => Err("Expected one of *, c, X, R, N, ?".to_string()),
        }
    }
}

/// A category field value, which may carry a tag after a `/`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryRef {
    pub category: String,
    pub tag: String,
}

impl CategoryRef {
    pub fn new(category: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            tag: tag.into(),
        }
    }

    pub fn is_split_sentinel(&self) -> bool {
        self.category == SPLIT_SENTINEL
    }

    pub fn to_qif(&self) -> String {
        encode_category(&self.category, &self.tag)
    }
}

impl QifValue for CategoryRef {
    const TARGET: &'static str = "category";

    fn from_qif(raw: &str) -> Result<Self, String> {
        Ok(match raw.split_once(TAG_SEPARATOR) {
            Some((category, tag)) => CategoryRef::new(category.trim(), tag.trim()),
            None => CategoryRef::new(raw.trim(), ""),
        })
    }
}

pub fn encode_category(category: &str, tag: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() {
        category.to_string()
    } else {
        format!("{}{}{}", category, TAG_SEPARATOR, tag)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Groceries/Costco", "Groceries", "Costco")]
    #[case("Groceries", "Groceries", "")]
    #[case("--Split--/Vacation", "--Split--", "Vacation")]
    #[case("/Trip", "", "Trip")]
    #[case("Auto:Fuel/Trip/Extra", "Auto:Fuel", "Trip/Extra")]
    fn category_with_tag(#[case] raw: &str, #[case] category: &str, #[case] tag: &str) {
        let parsed = coerce::<CategoryRef>(Field::Category, raw).unwrap();
        assert_eq!(CategoryRef::new(category, tag), parsed);
        assert_eq!(raw, parsed.to_qif());
    }

    #[rstest]
    #[case("", ClearedStatus::NotCleared)]
    #[case("N", ClearedStatus::NotCleared)]
    #[case("*", ClearedStatus::Cleared)]
    #[case("c", ClearedStatus::Cleared)]
    #[case("X", ClearedStatus::Reconciled)]
    #[case("R", ClearedStatus::Reconciled)]
    #[case("?", ClearedStatus::Unknown)]
    fn cleared_codes(#[case] raw: &str, #[case] expected: ClearedStatus) {
        assert_eq!(Ok(expected), coerce(Field::Cleared, raw));
    }

    #[test]
    fn invalid_cleared_code() {
        let err = coerce::<ClearedStatus>(Field::Cleared, "Z").unwrap_err();
        assert_eq!("cleared", err.field);
        assert_eq!("cleared status", err.target);
        assert_eq!("Z", err.raw);
    }

    #[test]
    fn invalid_amount_reports_field_and_target() {
        let err = coerce::<Decimal>(Field::Amount, "ten").unwrap_err();
        assert_eq!("amount", err.field);
        assert_eq!("decimal", err.target);
        assert!(err.to_string().starts_with("Cannot convert amount value \"ten\" to decimal"));
    }

    #[test]
    fn dates_and_amounts() {
        assert_eq!(
            Ok(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
            coerce(Field::Date, "8/ 1'25")
        );
        assert_eq!(Ok(Decimal::new(-4250, 2)), coerce(Field::Amount, "-42.50"));
        assert!(coerce::<NaiveDate>(Field::Date, "8/1'25x").is_err());
    }

    #[rstest]
    #[case("", true)]
    #[case("Y", true)]
    #[case("false", false)]
    fn flags(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(Ok(expected), coerce(Field::ExpenseFlag, raw));
    }
}
