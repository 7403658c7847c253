//! Reading and writing QIF ledgers.
//!
//! Parsing runs in layers: the input is normalized into lines, the lines are
//! grouped into sections by their `!` headers, each section is cut into
//! `^`-terminated records and every record is decoded through the field table
//! of its section. Emitting writes the entities back in a form that parses to
//! the same entities again.

mod builder;
mod emit;
mod error;
mod fields;
mod lines;
mod parse;
mod sections;
mod values;

pub use emit::{emit, emit_transactions, write_ledger, write_transactions};
pub use error::{ConversionError, EmitError, FormatError, ParseError};
pub use fields::{Field, FieldMapper};
pub use parse::parse;
pub use sections::SectionKind;
pub use values::{coerce, CategoryRef, QifValue, SPLIT_SENTINEL};
