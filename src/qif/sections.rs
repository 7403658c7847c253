use serde::Serialize;
use std::fmt::{self, Display};

use super::lines::Line;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Account,
    Category,
    Tag,
    Memorized,
    Security,
    Class,
    Payee,
    Transaction,
    Unknown,
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Account => "Account",
            SectionKind::Category => "Category",
            SectionKind::Tag => "Tag",
            SectionKind::Memorized => "Memorized",
            SectionKind::Security => "Security",
            SectionKind::Class => "Class",
            SectionKind::Payee => "Payee",
            SectionKind::Transaction => "Transaction",
            SectionKind::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

const SECTION_NAMES: &[(&str, SectionKind)] = &[
    ("!type:cat", SectionKind::Category),
    ("!type:category", SectionKind::Category),
    ("!type:tag", SectionKind::Tag),
    ("!type:memorized", SectionKind::Memorized),
    ("!type:memorized payee", SectionKind::Memorized),
    ("!type:security", SectionKind::Security),
    ("!type:class", SectionKind::Class),
    ("!type:payee", SectionKind::Payee),
    ("!type:cash", SectionKind::Transaction),
    ("!type:bank", SectionKind::Transaction),
    ("!type:ccard", SectionKind::Transaction),
    ("!type:oth a", SectionKind::Transaction),
    ("!type:oth l", SectionKind::Transaction),
    ("!type:invst", SectionKind::Transaction),
];

pub const ACCOUNT_HEADER: &str = "!account";
pub const TYPE_HEADER_PREFIX: &str = "!type:";
const OPTION_AUTOSWITCH: &str = "!option:autoswitch";
const CLEAR_AUTOSWITCH: &str = "!clear:autoswitch";

/// An `!Account` header whose type header sits this many lines further down
/// opens a transaction block (`!Account`, `N`, `T`, `^`, `!Type:`) instead of
/// an account list.
pub const PREAMBLE_LOOKAHEAD: usize = 4;

/// A run of lines that belong to one kind of section, header lines included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<Line>,
}

impl Section {
    /// The lines of the section without any header or directive lines.
    pub fn content(&self) -> Vec<Line> {
        self.lines
            .iter()
            .filter(|line| !line.is_header())
            .cloned()
            .collect()
    }

    pub fn first_header(&self) -> Option<&Line> {
        self.lines.iter().find(|line| line.is_header())
    }
}

pub fn is_account_header(line: &Line) -> bool {
    line.text.to_lowercase() == ACCOUNT_HEADER
}

pub fn is_clear_autoswitch(line: &Line) -> bool {
    line.text.to_lowercase().starts_with(CLEAR_AUTOSWITCH)
}

pub fn is_type_header(line: &Line) -> bool {
    line.text.to_lowercase().starts_with(TYPE_HEADER_PREFIX)
}

/// Determines the kind of section the header at `index` starts.
pub fn classify_header(lines: &[Line], index: usize) -> SectionKind {
    let Some(line) = lines.get(index) else {
        return SectionKind::Unknown;
    };
    let normalized = line.text.trim().to_lowercase();

    if normalized.starts_with(OPTION_AUTOSWITCH) {
        // The directive belongs to whatever section the next header opens.
        return match lines.get(index + 1) {
            Some(next) if next.is_header() => classify_header(lines, index + 1),
            _ => SectionKind::Unknown,
        };
    }
    if normalized.starts_with(CLEAR_AUTOSWITCH) {
        return SectionKind::Account;
    }
    if normalized == ACCOUNT_HEADER {
        return if introduces_transactions(lines, index) {
            SectionKind::Transaction
        } else {
            SectionKind::Account
        };
    }

    SECTION_NAMES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, kind)| *kind)
        .unwrap_or(SectionKind::Unknown)
}

fn introduces_transactions(lines: &[Line], index: usize) -> bool {
    lines
        .get(index + PREAMBLE_LOOKAHEAD)
        .is_some_and(is_type_header)
}

/// Groups lines into sections. Each header starts a new section unless it is of
/// the same kind as the one before it, in which case the sections are merged.
/// Lines before the first header form an unknown section.
pub fn break_into_sections(lines: &[Line]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if !line.is_header() {
            if let Some(current) = sections.last_mut() {
                current.lines.push(line.clone());
                continue;
            }
        }
        let kind = if line.is_header() {
            classify_header(lines, index)
        } else {
            SectionKind::Unknown
        };
        match sections.last_mut() {
            Some(current) if current.kind == kind => current.lines.push(line.clone()),
            _ => {
                log::debug!("Line {}: {} section starts with {:?}", line.number, kind, line.text);
                sections.push(Section {
                    kind,
                    lines: vec![line.clone()],
                });
            }
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::qif::lines::normalize;

    fn kinds(sections: &[Section]) -> Vec<SectionKind> {
        sections.iter().map(|section| section.kind).collect()
    }

    #[rstest]
    #[case("!Type:Cat", SectionKind::Category)]
    #[case("!Type:Category", SectionKind::Category)]
    #[case("!Type:Tag", SectionKind::Tag)]
    #[case("!Type:Memorized", SectionKind::Memorized)]
    #[case("!Type:Memorized Payee", SectionKind::Memorized)]
    #[case("!Type:Security", SectionKind::Security)]
    #[case("!Type:Class", SectionKind::Class)]
    #[case("!Type:Payee", SectionKind::Payee)]
    #[case("!Type:Bank", SectionKind::Transaction)]
    #[case("!type:CASH", SectionKind::Transaction)]
    #[case("!Type:CCard", SectionKind::Transaction)]
    #[case("!Type:Oth A", SectionKind::Transaction)]
    #[case("!Type:Oth L", SectionKind::Transaction)]
    #[case("!Type:Invst", SectionKind::Transaction)]
    #[case("!Type:Prices", SectionKind::Unknown)]
    #[case("!Clear:AutoSwitch", SectionKind::Account)]
    fn classify_single_header(#[case] header: &str, #[case] expected: SectionKind) {
        let lines = normalize(header);
        assert_eq!(expected, classify_header(&lines, 0));
    }

    #[test]
    fn account_header_with_type_header_ahead_is_a_transaction_preamble() {
        let lines = normalize("!Account\nNChecking\nTBank\n^\n!Type:Bank\nD1/2'25\nT1\n^");
        assert_eq!(SectionKind::Transaction, classify_header(&lines, 0));
    }

    #[test]
    fn account_header_without_type_header_ahead_is_an_account_list() {
        let lines = normalize("!Account\nNChecking\nTBank\n^\nNSavings\nTBank\n^");
        assert_eq!(SectionKind::Account, classify_header(&lines, 0));
    }

    #[test]
    fn option_autoswitch_takes_the_kind_of_the_next_header() {
        let lines = normalize("!Option:AutoSwitch\n!Account\nNChecking\nTBank\n^\n!Clear:AutoSwitch");
        assert_eq!(SectionKind::Account, classify_header(&lines, 0));

        let lines = normalize("!Option:AutoSwitch\n!Type:Cat\nNFood\n^");
        assert_eq!(SectionKind::Category, classify_header(&lines, 0));

        let lines = normalize("!Option:AutoSwitch\nNFood");
        assert_eq!(SectionKind::Unknown, classify_header(&lines, 0));
    }

    #[test]
    fn sections_collapse_repeated_kinds() {
        let text = "!Type:Tag\nNTrip\n^\n!Type:Cat\nNFood\n^\n\
            !Option:AutoSwitch\n!Account\nNChecking\nTBank\n^\n!Clear:AutoSwitch\n\
            !Account\nNChecking\nTBank\n^\n!Type:Bank\nD1/2'25\nT1\n^\n\
            !Account\nNVisa\nTCCard\n^\n!Type:CCard\nD1/3'25\nT-2\n^";
        let sections = break_into_sections(&normalize(text));
        assert_eq!(
            vec![
                SectionKind::Tag,
                SectionKind::Category,
                SectionKind::Account,
                SectionKind::Transaction,
            ],
            kinds(&sections)
        );
        assert_eq!(16, sections[3].lines.len());
    }

    #[test]
    fn unknown_sections_are_kept() {
        let text = "junk before\n!Type:Prices\n\"ABC\",1.5,\"1/2/25\"\n^\n!Type:Tag\nNTrip\n^";
        let sections = break_into_sections(&normalize(text));
        assert_eq!(
            vec![SectionKind::Unknown, SectionKind::Tag],
            kinds(&sections)
        );
        assert_eq!(4, sections[0].lines.len());
    }

    #[test]
    fn content_drops_headers() {
        let sections = break_into_sections(&normalize("!Option:AutoSwitch\n!Account\nNA\nTBank\n^\n!Clear:AutoSwitch"));
        let content: Vec<_> = sections[0].content().into_iter().map(|l| l.text).collect();
        assert_eq!(vec!["NA", "TBank", "^"], content);
    }
}
