use std::rc::Rc;

use super::builder::{build_account, build_category, build_list_record, build_tag, build_transaction};
use super::error::ParseError;
use super::lines::{normalize, split_on_caret, Line};
use super::sections::{
    break_into_sections, is_account_header, is_clear_autoswitch, is_type_header, Section,
    SectionKind,
};
use crate::model::{Account, Header, Ledger, OtherList, Sections, Transaction, UnknownSection};

/// Parses QIF text into a ledger.
///
/// Records of list sections that fail to convert are skipped with a warning.
/// Transaction records are not tolerated that way, and an unknown field code
/// fails the parse in any section.
pub fn parse(text: &str) -> Result<Ledger, ParseError> {
    let lines = normalize(text);
    let mut ledger = Ledger::new();
    let mut current_account = Rc::new(Account::default());

    for section in break_into_sections(&lines) {
        match section.kind {
            SectionKind::Tag => {
                ledger.tags.extend(parse_list(&section, build_tag)?);
                ledger.sections |= Sections::TAGS;
            }
            SectionKind::Category => {
                ledger.categories.extend(parse_list(&section, build_category)?);
                ledger.sections |= Sections::CATEGORIES;
            }
            SectionKind::Account => {
                let accounts = parse_list(&section, build_account)?;
                // Without the closing AutoSwitch directive, an account header
                // selects the account the following transactions belong to.
                let closed = section.lines.last().is_some_and(is_clear_autoswitch);
                if let (false, Some(last)) = (closed, accounts.last()) {
                    current_account = Rc::new(last.clone());
                }
                if !accounts.is_empty() {
                    ledger.sections |= Sections::ACCOUNTS;
                }
                ledger.accounts.extend(accounts);
            }
            SectionKind::Transaction => {
                ledger
                    .transactions
                    .extend(parse_transactions(&section.lines, &mut current_account)?);
                ledger.sections |= Sections::TRANSACTIONS;
            }
            SectionKind::Memorized
            | SectionKind::Security
            | SectionKind::Class
            | SectionKind::Payee => {
                let kind = section.kind;
                let records = parse_list(&section, |record| build_list_record(record, kind))?;
                ledger.other_lists.push(OtherList {
                    kind: kind.to_string(),
                    header: section
                        .first_header()
                        .map(|line| line.text.clone())
                        .unwrap_or_default(),
                    records,
                });
            }
            SectionKind::Unknown => {
                let mut lines = section.lines.iter().map(|line| line.text.clone());
                let header = lines.next().unwrap_or_default();
                log::warn!(
                    "Line {}: keeping unrecognized section {:?} as is",
                    section.lines.first().map(|line| line.number).unwrap_or_default(),
                    header,
                );
                ledger.unknown_sections.push(UnknownSection {
                    header,
                    lines: lines.collect(),
                });
            }
        }
    }
    Ok(ledger)
}

fn parse_list<T>(
    section: &Section,
    build: impl Fn(&[Line]) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    let content = section.content();
    let mut entities = Vec::new();
    for record in split_on_caret(&content) {
        match build(record) {
            Ok(entity) => entities.push(entity),
            Err(ParseError::Conversion { line, source, .. }) => {
                log::warn!("Line {}: skipping {} record: {}", line, section.kind, source);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(entities)
}

/// One account block of a transaction section: an optional `!Account`
/// preamble, the `!Type:` header and the records that follow it.
struct AccountBlock<'a> {
    first_line: usize,
    account: Option<&'a [Line]>,
    type_header: Option<&'a Line>,
    body: &'a [Line],
}

fn next_block(lines: &[Line]) -> (AccountBlock<'_>, &[Line]) {
    let first_line = lines.first().map(|line| line.number).unwrap_or_default();
    let mut index = 0;

    let mut account = None;
    if lines.first().is_some_and(is_account_header) {
        let end = lines[1..]
            .iter()
            .position(|line| line.is_record_end() || line.is_header())
            .map(|position| position + 1)
            .unwrap_or(lines.len());
        account = Some(&lines[1..end]);
        index = match lines.get(end) {
            Some(line) if line.is_record_end() => end + 1,
            _ => end,
        };
    }

    let mut type_header = None;
    if let Some(line) = lines.get(index).filter(|line| is_type_header(line)) {
        type_header = Some(line);
        index += 1;
    }

    if index == 0 && lines.first().is_some_and(Line::is_header) {
        // A directive such as !Option:AutoSwitch inside the section.
        index = 1;
    }

    let body_end = lines[index..]
        .iter()
        .position(Line::is_header)
        .map(|position| index + position)
        .unwrap_or(lines.len());
    let block = AccountBlock {
        first_line,
        account,
        type_header,
        body: &lines[index..body_end],
    };
    (block, &lines[body_end..])
}

fn parse_transactions(
    lines: &[Line],
    current_account: &mut Rc<Account>,
) -> Result<Vec<Transaction>, ParseError> {
    let mut transactions = Vec::new();
    let mut rest = lines;
    while !rest.is_empty() {
        let (block, remaining) = next_block(rest);
        rest = remaining;

        if let Some(account_lines) = block.account {
            *current_account = Rc::new(build_account(account_lines)?);
        }

        match (block.type_header, block.body.is_empty()) {
            (None, true) => {
                log::debug!("Line {}: skipping empty account block", block.first_line);
            }
            (Some(type_header), true) => {
                log::warn!(
                    "Line {}: skipping {:?} block without transactions",
                    type_header.number,
                    type_header.text,
                );
            }
            (None, false) => {
                log::warn!(
                    "Line {}: skipping {} lines without a type header",
                    block.first_line,
                    block.body.len(),
                );
            }
            (Some(type_header), false) => {
                let header = Header::transaction_type(&type_header.text);
                for record in split_on_caret(block.body) {
                    transactions.push(build_transaction(record, current_account, &header)?);
                }
            }
        }
    }
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::model::{ClearedStatus, Split};
    use crate::qif::error::FormatError;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn parses_all_sections() {
        let text = "!Type:Tag\nNVacation\nDTrips\n^\n\
            !Type:Cat\nNGroceries\nDFood\nE\n^\nNSalary\nI\nT\n^\n\
            !Option:AutoSwitch\n!Account\nNChecking\nTBank\nDMain\n^\nNVisa\nTCCard\n^\n!Clear:AutoSwitch\n\
            !Account\nNChecking\nTBank\n^\n!Type:Bank\nD8/1'25\nT-10.00\nPAcme\nLGroceries/Vacation\n^\n\
            D8/2'25\nT1000.00\nC*\nPEmployer\nLSalary\n^\n";
        let ledger = parse(text).unwrap();
        assert_eq!(Sections::ALL, ledger.sections);
        assert_eq!(1, ledger.tags.len());
        assert_eq!("Vacation", ledger.tags[0].name);
        assert_eq!(2, ledger.categories.len());
        assert!(ledger.categories[0].expense_category);
        assert!(ledger.categories[1].income_category);
        assert!(ledger.categories[1].tax_related);
        assert_eq!(2, ledger.accounts.len());
        assert_eq!("Main", ledger.accounts[0].description);
        assert_eq!(2, ledger.transactions.len());

        let first = &ledger.transactions[0];
        assert_eq!("Checking", first.account.name);
        assert_eq!(Header::bank(), first.header);
        assert_eq!(date(2025, 8, 1), first.date);
        assert_eq!(Decimal::new(-1000, 2), first.amount);
        assert_eq!("Groceries", first.category);
        assert_eq!("Vacation", first.tag);

        let second = &ledger.transactions[1];
        assert_eq!(ClearedStatus::Cleared, second.cleared);
        assert!(Rc::ptr_eq(&first.account, &second.account));
    }

    #[test]
    fn transactions_follow_their_account_blocks() {
        let text = "!Account\nNChecking\nTBank\n^\n!Type:Bank\nD1/1'25\nT-1\n^\nD1/2'25\nT-2\n^\n\
            !Account\nNVisa\nTCCard\n^\n!Type:CCard\nD1/3'25\nT-3\n^\n\
            !Type:CCard\nD1/4'25\nT-4\n^";
        let ledger = parse(text).unwrap();
        let accounts: Vec<_> = ledger
            .transactions
            .iter()
            .map(|t| (t.account.name.as_str(), t.header.code.as_str()))
            .collect();
        assert_eq!(
            vec![
                ("Checking", "!Type:Bank"),
                ("Checking", "!Type:Bank"),
                ("Visa", "!Type:CCard"),
                ("Visa", "!Type:CCard"),
            ],
            accounts
        );
        assert!(ledger.accounts.is_empty());
        assert_eq!(Sections::TRANSACTIONS, ledger.sections);
    }

    #[test]
    fn transactions_without_preamble_use_a_default_account() {
        let ledger = parse("!Type:Bank\nD1/1'25\nT-1\n^").unwrap();
        assert_eq!(1, ledger.transactions.len());
        assert_eq!(Account::default(), *ledger.transactions[0].account);
    }

    #[test]
    fn account_header_with_description_selects_account_for_following_block() {
        let text = "!Account\nNSavings\nTBank\nDRainy day\n^\n!Type:Bank\nD1/1'25\nT5\n^";
        let ledger = parse(text).unwrap();
        assert_eq!(1, ledger.accounts.len());
        assert_eq!("Savings", ledger.transactions[0].account.name);
        assert_eq!("Rainy day", ledger.transactions[0].account.description);
    }

    #[test]
    fn split_transaction_and_plain_transaction_in_one_block() {
        let text = "!Account\nNChecking\nTBank\n^\n!Type:Bank\n\
            D8/1'25\nT-100.00\nPStore\nL--Split--\nSFood\n$-60.00\nSHome\n$-40.00\n^\n\
            D8/2'25\nT-5.00\nPCafe\nLDining\n^";
        let ledger = parse(text).unwrap();
        assert_eq!(2, ledger.transactions.len());
        let split = &ledger.transactions[0];
        assert_eq!(
            vec![
                Split::new("Food", Decimal::new(-6000, 2)),
                Split::new("Home", Decimal::new(-4000, 2)),
            ],
            split.splits
        );
        assert_eq!(split.amount, split.splits_total());
        assert_eq!("", split.category);
        assert_eq!("Dining", ledger.transactions[1].category);
    }

    #[test]
    fn type_header_without_transactions_is_skipped() {
        let text = "!Account\nNChecking\nTBank\n^\n!Type:Bank\n!Type:CCard\nD1/1'25\nT-1\n^";
        let ledger = parse(text).unwrap();
        assert_eq!(1, ledger.transactions.len());
        assert_eq!("!Type:CCard", ledger.transactions[0].header.code);
        assert_eq!("Checking", ledger.transactions[0].account.name);
    }

    #[test]
    fn unknown_field_code_in_transaction_is_fatal() {
        let err = parse("!Type:Bank\nD1/1'25\nT-1\nZzz\n^").unwrap_err();
        assert_eq!(
            ParseError::Format(FormatError {
                code: 'Z',
                section: SectionKind::Transaction,
                line: 4,
                record: "D1/1'25\nT-1\nZzz".to_string(),
            }),
            err
        );
        assert_eq!(4, err.line());
    }

    #[test]
    fn unknown_field_code_in_list_is_fatal() {
        let err = parse("!Type:Tag\nNTrip\nQ1\n^").unwrap_err();
        assert!(matches!(err, ParseError::Format(FormatError { code: 'Q', .. })));
    }

    #[test]
    fn bad_value_in_transaction_is_fatal() {
        let err = parse("!Type:Bank\nDnot a date\nT-1\n^").unwrap_err();
        assert!(matches!(err, ParseError::Conversion { line: 2, .. }));
    }

    #[test]
    fn bad_value_in_list_skips_the_record() {
        let ledger = parse("!Type:Cat\nNFood\nBlots\n^\nNRent\n^").unwrap();
        let names: Vec<_> = ledger.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(vec!["Rent"], names);
    }

    #[test]
    fn other_lists_and_unknown_sections_are_kept() {
        let text = "!Type:Memorized\nKC\nPAcme\nT-10.00\nLGroceries\n^\n\
            !Type:Security\nNAcme Corp\nSACME\nTStock\n^\n\
            !Type:Prices\n\"ACME\",12.5,\"1/2'25\"\n^";
        let ledger = parse(text).unwrap();
        assert_eq!(2, ledger.other_lists.len());
        assert_eq!("Memorized", ledger.other_lists[0].kind);
        assert_eq!(Some("Acme"), ledger.other_lists[0].records[0].get("payee"));
        assert_eq!("!Type:Security", ledger.other_lists[1].header);
        assert_eq!(Some("ACME"), ledger.other_lists[1].records[0].get("symbol"));
        assert_eq!(1, ledger.unknown_sections.len());
        assert_eq!("!Type:Prices", ledger.unknown_sections[0].header);
        assert_eq!(2, ledger.unknown_sections[0].lines.len());
        assert!(ledger.sections.is_empty());
    }

    #[test]
    fn stray_clear_autoswitch_selects_no_accounts() {
        let ledger = parse("!Clear:AutoSwitch\n!Type:Bank\nD8/1'25\nT-1.00\n^").unwrap();
        assert!(ledger.accounts.is_empty());
        assert!(!ledger.sections.contains(Sections::ACCOUNTS));
        assert_eq!(Sections::TRANSACTIONS, ledger.sections);
        assert_eq!(1, ledger.transactions.len());
    }

    #[test]
    fn empty_input() {
        let ledger = parse("\r\n  \n").unwrap();
        assert!(ledger.sections.is_empty());
        assert!(ledger.transactions.is_empty());
    }
}
