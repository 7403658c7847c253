//! Builds ledger entities from caret-delimited records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::rc::Rc;

use super::error::{ConversionError, FormatError, ParseError};
use super::fields::{Field, FieldMapper};
use super::lines::{record_text, Line};
use super::sections::SectionKind;
use super::values::{coerce, CategoryRef, QifValue};
use crate::model::{Account, Category, ListRecord, Security, Split, Tag, Transaction};
use crate::model::{ClearedStatus, Header};

/// A record whose lines have all been resolved to fields.
struct DecodedRecord<'a> {
    record: &'a [Line],
    fields: Vec<(Field, &'a str, usize)>,
}

impl<'a> DecodedRecord<'a> {
    fn decode(
        record: &'a [Line],
        mapper: &FieldMapper,
        section: SectionKind,
    ) -> Result<Self, FormatError> {
        let fields = record
            .iter()
            .filter_map(|line| line.code_and_value().map(|(code, value)| (code, value, line.number)))
            .map(|(code, value, number)| match mapper.lookup(code) {
                Some(field) => Ok((field, value, number)),
                None => Err(FormatError {
                    code,
                    section,
                    line: number,
                    record: record_text(record),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { record, fields })
    }

    fn first_line(&self) -> usize {
        self.record.first().map(|line| line.number).unwrap_or_default()
    }

    fn coerce<T: QifValue>(&self, field: Field, raw: &str, line: usize) -> Result<T, ParseError> {
        coerce(field, raw).map_err(|source| self.conversion_error(line, source))
    }

    fn conversion_error(&self, line: usize, source: ConversionError) -> ParseError {
        ParseError::Conversion {
            line,
            record: record_text(self.record),
            source,
        }
    }

    fn missing(&self, field: Field, reason: &str) -> ParseError {
        self.conversion_error(
            self.first_line(),
            ConversionError {
                field: field.name(),
                target: field.name(),
                raw: String::new(),
                reason: reason.to_string(),
            },
        )
    }
}

pub fn build_tag(record: &[Line]) -> Result<Tag, ParseError> {
    let decoded = DecodedRecord::decode(record, &FieldMapper::for_section(SectionKind::Tag), SectionKind::Tag)?;
    let mut tag = Tag::default();
    for &(field, value, _) in &decoded.fields {
        match field {
            Field::Name => tag.name = value.to_string(),
            Field::Description => tag.description = value.to_string(),
            _ => {}
        }
    }
    Ok(tag)
}

pub fn build_category(record: &[Line]) -> Result<Category, ParseError> {
    let decoded = DecodedRecord::decode(
        record,
        &FieldMapper::for_section(SectionKind::Category),
        SectionKind::Category,
    )?;
    let mut category = Category::default();
    for &(field, value, line) in &decoded.fields {
        match field {
            Field::Name => category.name = value.to_string(),
            Field::Description => category.description = value.to_string(),
            Field::ExpenseFlag => category.expense_category = decoded.coerce(field, value, line)?,
            Field::IncomeFlag => category.income_category = decoded.coerce(field, value, line)?,
            Field::TaxRelated => category.tax_related = decoded.coerce(field, value, line)?,
            Field::TaxSchedule => category.tax_schedule = value.to_string(),
            Field::Budget => category.budget = Some(decoded.coerce(field, value, line)?),
            _ => {}
        }
    }
    Ok(category)
}

pub fn build_account(record: &[Line]) -> Result<Account, ParseError> {
    let decoded = DecodedRecord::decode(
        record,
        &FieldMapper::for_section(SectionKind::Account),
        SectionKind::Account,
    )?;
    let mut account = Account::default();
    for &(field, value, line) in &decoded.fields {
        match field {
            Field::Name => account.name = value.to_string(),
            Field::Description => account.description = value.to_string(),
            Field::AccountType => account.account_type = value.to_string(),
            Field::CreditLimit => account.credit_limit = Some(decoded.coerce(field, value, line)?),
            Field::BalanceDate => {
                account.statement_balance_date = Some(decoded.coerce(field, value, line)?)
            }
            Field::BalanceAmount => {
                account.statement_balance = Some(decoded.coerce(field, value, line)?)
            }
            _ => {}
        }
    }
    Ok(account)
}

/// Decodes a record of a list section we keep generically. Values stay raw text.
pub fn build_list_record(record: &[Line], kind: SectionKind) -> Result<ListRecord, ParseError> {
    let decoded = DecodedRecord::decode(record, &FieldMapper::for_section(kind), kind)?;
    Ok(ListRecord {
        fields: decoded
            .fields
            .iter()
            .map(|&(field, value, _)| (field.name(), value.to_string()))
            .collect(),
    })
}

/// Builds one transaction of an account block. Splits start at each split
/// category line; a split that is still open at the end of the record is kept.
pub fn build_transaction(
    record: &[Line],
    account: &Rc<Account>,
    header: &Header,
) -> Result<Transaction, ParseError> {
    let mapper = FieldMapper::for_transaction(header);
    let decoded = DecodedRecord::decode(record, &mapper, SectionKind::Transaction)?;

    let mut date: Option<NaiveDate> = None;
    let mut amount: Option<Decimal> = None;
    let mut legacy_amount: Option<Decimal> = None;
    let mut cleared = ClearedStatus::default();
    let mut action_chk = String::new();
    let mut payee = String::new();
    let mut address = Vec::new();
    let mut memo = String::new();
    let mut category = CategoryRef::default();
    let mut splits: Vec<Split> = Vec::new();
    let mut open_split: Option<Split> = None;
    let mut security: Option<Security> = None;

    for &(field, value, line) in &decoded.fields {
        match field {
            Field::Date => date = Some(decoded.coerce(field, value, line)?),
            Field::Amount => amount = Some(decoded.coerce(field, value, line)?),
            Field::LegacyAmount => legacy_amount = Some(decoded.coerce(field, value, line)?),
            Field::Cleared => cleared = decoded.coerce(field, value, line)?,
            Field::CheckNumber => action_chk = value.to_string(),
            Field::Payee => payee = value.to_string(),
            Field::Address => address.push(value.to_string()),
            Field::Memo => memo = value.to_string(),
            Field::Category => category = decoded.coerce(field, value, line)?,
            Field::SplitCategory => {
                let split_category: CategoryRef = decoded.coerce(field, value, line)?;
                splits.extend(open_split.take());
                open_split = Some(
                    Split::new(split_category.category, Decimal::ZERO).with_tag(split_category.tag),
                );
            }
            Field::SplitMemo | Field::SplitAmount => {
                let Some(split) = open_split.as_mut() else {
                    return Err(decoded.conversion_error(
                        line,
                        ConversionError {
                            field: field.name(),
                            target: "split",
                            raw: value.to_string(),
                            reason: "Split field before any split category".to_string(),
                        },
                    ));
                };
                if field == Field::SplitMemo {
                    split.memo = value.to_string();
                } else {
                    split.amount = decoded.coerce(field, value, line)?;
                }
            }
            Field::SecurityName => security.get_or_insert_with(Security::default).name = value.to_string(),
            Field::Price => {
                security.get_or_insert_with(Security::default).price = decoded.coerce(field, value, line)?
            }
            Field::Quantity => {
                security.get_or_insert_with(Security::default).quantity = decoded.coerce(field, value, line)?
            }
            Field::Commission => {
                security.get_or_insert_with(Security::default).commission = decoded.coerce(field, value, line)?
            }
            Field::TransferAmount => {
                security.get_or_insert_with(Security::default).transfer_amount =
                    decoded.coerce(field, value, line)?
            }
            _ => {}
        }
    }
    splits.extend(open_split.take());

    let date = date.ok_or_else(|| decoded.missing(Field::Date, "Transaction has no date"))?;
    let amount = amount.or(legacy_amount).unwrap_or_default();

    let mut transaction = Transaction::new(Rc::clone(account), header.clone(), date, amount);
    transaction.action_chk = action_chk;
    transaction.cleared = cleared;
    transaction.payee = payee;
    transaction.address = address;
    transaction.memo = memo;
    // With splits, the category line only carries the split marker and the tag.
    transaction.category = if splits.is_empty() {
        category.category
    } else {
        String::new()
    };
    transaction.tag = category.tag;
    transaction.splits = splits;
    // All-zero security lines count as no security.
    transaction.security = security.filter(|security| !security.is_empty());
    Ok(transaction)
}
