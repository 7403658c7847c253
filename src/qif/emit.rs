use std::io::Write;

use super::error::EmitError;
use super::lines::RECORD_END;
use super::values::{encode_category, format_date, SPLIT_SENTINEL};
use crate::model::{Account, Category, Header, Ledger, Sections, Tag, Transaction};

/// Renders the sections selected in `ledger.sections`, in the order tags,
/// categories, accounts, transactions.
pub fn emit(ledger: &Ledger) -> Result<String, EmitError> {
    if ledger.sections.is_empty() {
        return Err(EmitError::NoSections);
    }
    let mut lines = Vec::new();
    if ledger.sections.contains(Sections::TAGS) {
        emit_tags(&ledger.tags, &mut lines);
    }
    if ledger.sections.contains(Sections::CATEGORIES) {
        emit_categories(&ledger.categories, &mut lines);
    }
    if ledger.sections.contains(Sections::ACCOUNTS) {
        emit_accounts(&ledger.accounts, &mut lines);
    }
    if ledger.sections.contains(Sections::TRANSACTIONS) {
        emit_transaction_lines(&ledger.transactions, &mut lines);
    }
    Ok(join_lines(lines))
}

/// Renders transactions on their own, with account preambles where the account changes.
pub fn emit_transactions(transactions: &[Transaction]) -> String {
    let mut lines = Vec::new();
    emit_transaction_lines(transactions, &mut lines);
    join_lines(lines)
}

pub fn write_ledger(ledger: &Ledger, mut writer: impl Write) -> Result<(), EmitError> {
    let text = emit(ledger)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

pub fn write_transactions(transactions: &[Transaction], mut writer: impl Write) -> Result<(), EmitError> {
    writer.write_all(emit_transactions(transactions).as_bytes())?;
    Ok(())
}

fn join_lines(lines: Vec<String>) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn push_if(lines: &mut Vec<String>, condition: bool, line: impl FnOnce() -> String) {
    if condition {
        lines.push(line());
    }
}

fn emit_tags(tags: &[Tag], lines: &mut Vec<String>) {
    if tags.is_empty() {
        return;
    }
    lines.push(Header::tag().code);
    for tag in tags {
        lines.push(format!("N{}", tag.name));
        push_if(lines, !tag.description.is_empty(), || format!("D{}", tag.description));
        lines.push(RECORD_END.to_string());
    }
}

fn emit_categories(categories: &[Category], lines: &mut Vec<String>) {
    if categories.is_empty() {
        return;
    }
    lines.push(Header::category().code);
    for category in categories {
        lines.push(format!("N{}", category.name));
        push_if(lines, !category.description.is_empty(), || format!("D{}", category.description));
        push_if(lines, category.tax_related, || "T".to_string());
        push_if(lines, !category.tax_schedule.is_empty(), || format!("R{}", category.tax_schedule));
        push_if(lines, category.income_category, || "I".to_string());
        push_if(lines, category.expense_category, || "E".to_string());
        if let Some(budget) = category.budget {
            lines.push(format!("B{}", budget));
        }
        lines.push(RECORD_END.to_string());
    }
}

fn emit_accounts(accounts: &[Account], lines: &mut Vec<String>) {
    if accounts.is_empty() {
        return;
    }
    lines.push("!Option:AutoSwitch".to_string());
    lines.push(Header::account().code);
    for account in accounts {
        lines.push(format!("N{}", account.name));
        lines.push(format!("T{}", account.account_type));
        push_if(lines, !account.description.is_empty(), || format!("D{}", account.description));
        if let Some(limit) = account.credit_limit {
            lines.push(format!("L{}", limit));
        }
        if let Some(date) = account.statement_balance_date {
            lines.push(format!("/{}", format_date(date)));
        }
        if let Some(balance) = account.statement_balance {
            lines.push(format!("${}", balance));
        }
        lines.push(RECORD_END.to_string());
    }
    lines.push("!Clear:AutoSwitch".to_string());
}

/// The four preamble lines the parser's lookahead expects in front of a type header.
fn account_preamble(account: &Account, lines: &mut Vec<String>) {
    lines.push(Header::account().code);
    lines.push(format!("N{}", account.name));
    lines.push(format!("T{}", account.account_type));
    lines.push(RECORD_END.to_string());
}

fn emit_transaction_lines(transactions: &[Transaction], lines: &mut Vec<String>) {
    let mut previous: Option<&Transaction> = None;
    for transaction in transactions {
        let account_changed = previous
            .map_or(true, |previous| !previous.account.is_same_account(&transaction.account));
        let header_changed = previous.map_or(true, |previous| previous.header != transaction.header);
        if account_changed {
            account_preamble(&transaction.account, lines);
        }
        if account_changed || header_changed {
            lines.push(transaction.header.code.clone());
        }
        transaction_lines(transaction, lines);
        previous = Some(transaction);
    }
}

fn transaction_lines(transaction: &Transaction, lines: &mut Vec<String>) {
    lines.push(format!("D{}", format_date(transaction.date)));
    push_if(lines, !transaction.action_chk.is_empty(), || format!("N{}", transaction.action_chk));
    if let Some(security) = &transaction.security {
        push_if(lines, !security.name.is_empty(), || format!("Y{}", security.name));
        push_if(lines, !security.price.is_zero(), || format!("I{}", security.price));
        push_if(lines, !security.quantity.is_zero(), || format!("Q{}", security.quantity));
        push_if(lines, !security.commission.is_zero(), || format!("O{}", security.commission));
        push_if(lines, !security.transfer_amount.is_zero(), || {
            format!("${}", security.transfer_amount)
        });
    }
    lines.push(format!("T{}", transaction.amount));
    lines.push(format!("U{}", transaction.amount));
    if let Some(code) = transaction.cleared.qif_code() {
        lines.push(format!("C{}", code));
    }
    push_if(lines, !transaction.payee.is_empty(), || format!("P{}", transaction.payee));
    for address in &transaction.address {
        lines.push(format!("A{}", address));
    }
    push_if(lines, !transaction.memo.is_empty(), || format!("M{}", transaction.memo));
    let category = if transaction.has_splits() {
        SPLIT_SENTINEL
    } else {
        transaction.category.as_str()
    };
    lines.push(format!("L{}", encode_category(category, &transaction.tag)));
    for split in &transaction.splits {
        lines.push(format!("S{}", encode_category(&split.category, &split.tag)));
        push_if(lines, !split.memo.is_empty(), || format!("E{}", split.memo));
        lines.push(format!("${}", split.amount));
    }
    lines.push(RECORD_END.to_string());
}
