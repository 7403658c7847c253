use anyhow::{anyhow, Context as _, Result};
use ariadne::{Color, Fmt as _, Label, Report, ReportKind, Source};
use console::{pad_str, style, Alignment, StyledObject};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use crate::args::{Args, Command, MatchArgs};
use crate::config::Config;
use crate::matching::{MatchSession, ReferenceTransaction, TransactionLike};
use crate::model::{Ledger, Transaction};
use crate::qif::{self, ParseError};
use crate::terminal::{BulletPointPrinter, LineWriter};

pub fn main(args: Args) -> Result<()> {
    match args.command {
        Command::Check { path } => main_check(&path),
        Command::Dump { path, json } => main_dump(&path, json),
        Command::Normalize { path, output } => main_normalize(&path, output.as_deref()),
        Command::Match(args) => main_match(&args),
    }
}

fn main_check(path: &Path) -> Result<()> {
    let ledger = load_ledger(path)?;
    println!(
        "{} {} accounts, {} categories, {} tags, {} transactions",
        style("OK").green().bold(),
        ledger.accounts.len(),
        ledger.categories.len(),
        ledger.tags.len(),
        ledger.transactions.len(),
    );
    if !ledger.unknown_sections.is_empty() {
        println!(
            "{} {} section(s) with unknown headers were kept as raw lines",
            style("Note:").yellow(),
            ledger.unknown_sections.len(),
        );
    }
    Ok(())
}

fn main_dump(path: &Path, json: bool) -> Result<()> {
    let ledger = load_ledger(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ledger)?);
        return Ok(());
    }
    let printer = BulletPointPrinter::new_stdout();

    println!("{}", style_header("Accounts:"));
    printer.print_items(
        ledger.accounts.iter().map(|account| {
            format!(
                "{} {}",
                style_account(&account.name),
                style(format!("[{}]", account.account_type)).dim()
            )
        }),
        style("(none)").italic(),
    );

    println!();
    println!("{}", style_header("Transactions:"));
    let mut current_account: Option<&str> = None;
    for transaction in &ledger.transactions {
        if current_account != Some(transaction.account.name.as_str()) {
            current_account = Some(transaction.account.name.as_str());
            printer.print_item(style_account(&transaction.account.name));
        }
        print_transaction(&printer.indent(), transaction);
    }
    if ledger.transactions.is_empty() {
        printer.print_item(style("(none)").italic());
    }
    Ok(())
}

fn main_normalize(path: &Path, output: Option<&Path>) -> Result<()> {
    let ledger = load_ledger(path)?;
    write_output(&ledger, output)
}

fn main_match(args: &MatchArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let ledger = load_ledger(&args.ledger)?;
    let is_json = args
        .reference
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    if is_json {
        let reference = load_reference_json(&args.reference)?;
        run_match(ledger, reference, &config, args)
    } else {
        let reference = load_ledger(&args.reference)?.transactions;
        run_match(ledger, reference, &config, args)
    }
}

fn run_match<R: TransactionLike>(
    mut ledger: Ledger,
    reference: Vec<R>,
    config: &Config,
    args: &MatchArgs,
) -> Result<()> {
    let bank = std::mem::take(&mut ledger.transactions);
    let mut session =
        MatchSession::new(bank, reference, config.min_score).with_weights(config.weights);
    session.auto_match(args.min_score);

    // The updated ledger goes to stdout unless there is an output file.
    if args.apply && args.output.is_none() {
        print_report(&BulletPointPrinter::new_stderr(), &session, args.explain)?;
    } else {
        print_report(&BulletPointPrinter::new_stdout(), &session, args.explain)?;
    }

    if !args.apply {
        return Ok(());
    }
    let matched = session.matched_bank_indices();
    let updated = session.apply_updates();
    log::info!("Updated {} transactions", updated);
    let transactions = session.into_bank();
    ledger.transactions = if args.only_matched {
        transactions
            .into_iter()
            .enumerate()
            .filter(|(index, _)| matched.contains(index))
            .map(|(_, transaction)| transaction)
            .collect()
    } else {
        transactions
    };
    write_output(&ledger, args.output.as_deref())
}

fn print_report<W: LineWriter + Clone, R: TransactionLike>(
    printer: &BulletPointPrinter<W>,
    session: &MatchSession<Transaction, R>,
    explain: bool,
) -> Result<()> {
    let pairs = session.pairs();
    printer.print_item(style_header(&format!("Matched ({}):", pairs.len())));
    let nested = printer.indent();
    for (bank_index, reference_index) in pairs {
        nested.print_item(format!(
            "{} {}",
            style(format!("#{} ↔ #{}", bank_index, reference_index)).dim(),
            style_summary(&session.bank()[bank_index]),
        ));
    }

    let unmatched_bank = session.unmatched_bank();
    printer.print_item(style_header(&format!("Unmatched bank transactions ({}):", unmatched_bank.len())));
    let nested = printer.indent();
    for (index, transaction) in unmatched_bank {
        nested.print_item(format!("{} {}", style(format!("#{}", index)).dim(), style_summary(transaction)));
        if explain {
            let reason = session.nonmatch_reason(index)?;
            nested.indent().print_item(style(reason).italic());
        }
    }

    let unmatched_reference = session.unmatched_reference();
    printer.print_item(style_header(&format!(
        "Unmatched reference transactions ({}):",
        unmatched_reference.len()
    )));
    let nested = printer.indent();
    for (index, transaction) in unmatched_reference {
        nested.print_item(format!("{} {}", style(format!("#{}", index)).dim(), style_summary(transaction)));
    }
    Ok(())
}

fn write_output(ledger: &Ledger, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| anyhow!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            qif::write_ledger(ledger, &mut writer)?;
            writer.flush()?;
            log::info!("Wrote {} transactions to {}", ledger.transactions.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            qif::write_ledger(ledger, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn load_ledger(path: &Path) -> Result<Ledger> {
    let content = std::fs::read_to_string(path)
        .with_context(|| anyhow!("Failed to read QIF file {}", path.display()))?;
    let content = maybe_remove_byte_order_mark(content);
    match qif::parse(&content) {
        Ok(ledger) => {
            log::info!(
                "Loaded {} transactions from {}",
                ledger.transactions.len(),
                path.display()
            );
            Ok(ledger)
        }
        Err(err) => {
            print_parse_error(&content, &err)?;
            Err(anyhow::Error::new(err).context(format!("Failed to parse {}", path.display())))
        }
    }
}

fn load_reference_json(path: &Path) -> Result<Vec<ReferenceTransaction>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| anyhow!("Failed to read reference file {}", path.display()))?;
    let reference = ReferenceTransaction::from_json(&content)
        .with_context(|| anyhow!("Failed to parse reference file {}", path.display()))?;
    log::info!("Loaded {} reference transactions from {}", reference.len(), path.display());
    Ok(reference)
}

fn print_parse_error(input: &str, err: &ParseError) -> Result<()> {
    let input = input.replace("\r\n", "\n").replace('\r', "\n");
    let span = line_span(&input, err.line());
    let label = match err {
        ParseError::Format(err) => format!("Unknown field code {}", err.code.fg(Color::Red)),
        ParseError::Conversion { source, .. } => source.to_string(),
    };
    let message = err.to_string();
    let message = message.lines().next().unwrap_or_default().to_string();

    Report::build(ReportKind::Error, span.clone())
        .with_message(message)
        .with_label(Label::new(span).with_message(label).with_color(Color::Red))
        .finish()
        .eprint(Source::from(&input))?;
    Ok(())
}

/// Char range of the 1-based line `number`, or an empty range past the end.
fn line_span(input: &str, number: usize) -> Range<usize> {
    let mut start = 0;
    for (index, line) in input.split('\n').enumerate() {
        let len = line.chars().count();
        if index + 1 == number {
            return start..start + len;
        }
        start += len + 1;
    }
    start..start
}

fn maybe_remove_byte_order_mark(mut content: String) -> String {
    if content.starts_with('\u{FEFF}') {
        content.remove(0);
    }
    content
}

fn print_transaction<W: LineWriter + Clone>(printer: &BulletPointPrinter<W>, transaction: &Transaction) {
    let category = if transaction.has_splits() {
        format!(" [{} splits]", transaction.splits.len())
    } else if transaction.category.is_empty() {
        String::new()
    } else {
        format!(" [{}]", transaction.category)
    };
    printer.print_item(format!(
        "{}{}",
        style_summary(transaction),
        style_category(&category)
    ));
    if transaction.has_splits() {
        let printer = printer.indent();
        for split in &transaction.splits {
            printer.print_item(format!(
                "{} {}",
                pad_str(&style_amount(split.amount).to_string(), 15, Alignment::Right, None),
                style_category(&split.category),
            ));
        }
    }
}

fn style_summary(transaction: &impl TransactionLike) -> String {
    let date = transaction
        .date()
        .map(|date| style_date(&date).to_string())
        .unwrap_or_else(|| "(no date)".to_string());
    format!(
        "{} {} {}",
        pad_str(&date, 10, Alignment::Left, None),
        pad_str(&style_amount(transaction.amount()).to_string(), 15, Alignment::Right, None),
        style_payee(transaction.payee()),
    )
}

fn style_header(header: &str) -> StyledObject<&str> {
    style(header).bold().underlined()
}

fn style_account(name: &str) -> StyledObject<&str> {
    style(name).magenta()
}

fn style_date(date: &chrono::NaiveDate) -> StyledObject<String> {
    style(date.format("%Y-%m-%d").to_string())
}

fn style_amount(amount: Decimal) -> StyledObject<String> {
    let result = style(amount.to_string()).bold();
    if amount < Decimal::ZERO {
        result.red()
    } else {
        result.green()
    }
}

fn style_payee(payee: &str) -> StyledObject<&str> {
    style(payee).yellow()
}

fn style_category(category: &str) -> StyledObject<&str> {
    style(category).cyan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 0..5)]
    #[case(2, 6..8)]
    #[case(3, 9..9)]
    #[case(4, 10..14)]
    #[case(9, 15..15)]
    fn line_spans(#[case] number: usize, #[case] expected: Range<usize>) {
        assert_eq!(expected, line_span("!Type\nD1\n\nTé^x", number));
    }

    #[test]
    fn byte_order_mark_is_removed() {
        assert_eq!("!Type:Bank", maybe_remove_byte_order_mark("\u{FEFF}!Type:Bank".to_string()));
        assert_eq!("!Type:Bank", maybe_remove_byte_order_mark("!Type:Bank".to_string()));
    }
}
