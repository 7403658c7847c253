use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Read, rewrite and reconcile QIF ledgers.
#[derive(Parser, Debug)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a QIF file and report the first error, if any
    Check {
        /// Path to the QIF file
        path: PathBuf,
    },

    /// Print the accounts and transactions of a QIF file
    Dump {
        /// Path to the QIF file
        path: PathBuf,

        /// Print the whole parsed ledger as JSON instead
        #[clap(long)]
        json: bool,
    },

    /// Parse a QIF file and write it back in canonical form
    Normalize {
        /// Path to the QIF file
        path: PathBuf,

        /// Where to write the result. Defaults to stdout.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Match the transactions of a QIF file against reference transactions
    Match(MatchArgs),
}

#[derive(Debug, ClapArgs)]
pub struct MatchArgs {
    /// Path to the QIF file with the bank transactions
    pub ledger: PathBuf,

    /// Reference transactions, as a JSON array (.json) or another QIF file
    pub reference: PathBuf,

    /// Minimum score for a pair to be accepted. Overrides the config file.
    #[clap(long)]
    pub min_score: Option<i32>,

    /// Path to the YAML config file
    #[clap(long, default_value = "qif-reconcile.yaml")]
    pub config: PathBuf,

    /// Copy category, tag and splits of the matched references into the ledger and write it out
    #[clap(long)]
    pub apply: bool,

    /// Where to write the updated ledger. Defaults to stdout.
    #[clap(short, long, requires = "apply")]
    pub output: Option<PathBuf>,

    /// Only write the matched transactions
    #[clap(long, requires = "apply")]
    pub only_matched: bool,

    /// Explain why unmatched bank transactions found no partner
    #[clap(long)]
    pub explain: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
