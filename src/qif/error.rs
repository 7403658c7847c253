use thiserror::Error;

use super::sections::SectionKind;

/// A record used a field code that its section doesn't define.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown field code '{code}' in {section} record at line {line}:\n{record}")]
pub struct FormatError {
    pub code: char,
    pub section: SectionKind,
    pub line: usize,
    pub record: String,
}

/// A raw field value couldn't be turned into the type the field needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot convert {field} value {raw:?} to {target}: {reason}")]
pub struct ConversionError {
    pub field: &'static str,
    pub target: &'static str,
    pub raw: String,
    pub reason: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Invalid record at line {line}: {source}\n{record}")]
    Conversion {
        line: usize,
        record: String,
        #[source]
        source: ConversionError,
    },
}

impl ParseError {
    /// The 1-based line of the input the error points at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Format(err) => err.line,
            ParseError::Conversion { line, .. } => *line,
        }
    }
}

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("No section selected for emission")]
    NoSections,

    #[error("Failed to write QIF output")]
    Io(#[from] std::io::Error),
}
