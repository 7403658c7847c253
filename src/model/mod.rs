//! Ledger entities produced by the QIF parser and consumed by the emitter and the matcher.

mod account;
mod category;
mod cleared;
mod header;
mod ledger;
mod security;
mod split;
mod tag;
mod transaction;

pub use account::Account;
pub use category::Category;
pub use cleared::ClearedStatus;
pub use header::Header;
pub use ledger::{Ledger, ListRecord, OtherList, Sections, UnknownSection};
pub use security::Security;
pub use split::Split;
pub use tag::Tag;
pub use transaction::Transaction;
