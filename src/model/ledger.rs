use serde::Serialize;
use std::fmt::{self, Display};
use std::ops::{BitOr, BitOrAssign};

use super::{Account, Category, Tag, Transaction};

/// Which sections a ledger carries (and which ones get emitted).
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sections(u8);

impl Sections {
    pub const NONE: Sections = Sections(0);
    pub const TAGS: Sections = Sections(1 << 0);
    pub const CATEGORIES: Sections = Sections(1 << 1);
    pub const ACCOUNTS: Sections = Sections(1 << 2);
    pub const TRANSACTIONS: Sections = Sections(1 << 3);
    pub const ALL: Sections = Sections(0b1111);

    pub fn contains(self, other: Sections) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Sections) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Sections {
    type Output = Sections;

    fn bitor(self, rhs: Sections) -> Sections {
        Sections(self.0 | rhs.0)
    }
}

impl BitOrAssign for Sections {
    fn bitor_assign(&mut self, rhs: Sections) {
        self.insert(rhs);
    }
}

impl Display for Sections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names = [
            (Sections::TAGS, "tags"),
            (Sections::CATEGORIES, "categories"),
            (Sections::ACCOUNTS, "accounts"),
            (Sections::TRANSACTIONS, "transactions"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

/// A decoded record of a list section that has no dedicated entity type
/// (memorized payees, securities, classes, payees).
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ListRecord {
    pub fields: Vec<(&'static str, String)>,
}

impl ListRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OtherList {
    pub kind: String,
    pub header: String,
    pub records: Vec<ListRecord>,
}

/// A section with a header we don't recognize, kept as it was read.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection {
    pub header: String,
    pub lines: Vec<String>,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct Ledger {
    pub sections: Sections,
    pub tags: Vec<Tag>,
    pub categories: Vec<Category>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub other_lists: Vec<OtherList>,
    pub unknown_sections: Vec<UnknownSection>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sections(mut self, sections: Sections) -> Self {
        self.sections = sections;
        self
    }
}
