/// A non-empty, whitespace-normalized input line together with its 1-based
/// position in the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    pub fn is_header(&self) -> bool {
        self.text.starts_with('!')
    }

    pub fn is_record_end(&self) -> bool {
        self.text == RECORD_END
    }

    /// Splits a field line into its one-character code and the trimmed value.
    pub fn code_and_value(&self) -> Option<(char, &str)> {
        let mut chars = self.text.chars();
        let code = chars.next()?;
        Some((code, chars.as_str().trim()))
    }
}

pub const RECORD_END: &str = "^";

/// Normalizes line endings, collapses whitespace runs within each line and drops
/// lines that end up empty.
pub fn normalize(text: &str) -> Vec<Line> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .enumerate()
        .filter_map(|(index, line)| {
            let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed.is_empty() {
                None
            } else {
                Some(Line::new(index + 1, collapsed))
            }
        })
        .collect()
}

/// Splits lines into records at every line that is exactly `^`. Empty records
/// (leading, doubled or trailing carets) are dropped.
pub fn split_on_caret(lines: &[Line]) -> Vec<&[Line]> {
    lines
        .split(|line| line.is_record_end())
        .filter(|record| !record.is_empty())
        .collect()
}

/// The original text of a record, one line per line, for error messages.
pub fn record_text(record: &[Line]) -> String {
    record
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|line| line.text.as_str()).collect()
    }

    #[test]
    fn normalize_collapses_whitespace_and_drops_empty_lines() {
        let lines = normalize("!Type:Bank\r\n\r\nD8/ 1'25\r  PAcme   Corp  \n\t\n^");
        assert_eq!(vec!["!Type:Bank", "D8/ 1'25", "PAcme Corp", "^"], texts(&lines));
    }

    #[test]
    fn normalize_keeps_source_line_numbers() {
        let lines = normalize("a\n\nb\r\n\r\nc");
        let numbers: Vec<_> = lines.iter().map(|line| line.number).collect();
        assert_eq!(vec![1, 3, 5], numbers);
    }

    #[test]
    fn split_on_caret_drops_empty_records() {
        let lines = normalize("^\nNa\n^\n^\nNb\nDc\n^");
        let records = split_on_caret(&lines);
        assert_eq!(2, records.len());
        assert_eq!(vec!["Na"], texts(records[0]));
        assert_eq!(vec!["Nb", "Dc"], texts(records[1]));
    }

    #[test]
    fn split_on_caret_keeps_unterminated_last_record() {
        let lines = normalize("Na\n^\nNb");
        let records = split_on_caret(&lines);
        assert_eq!(vec!["Nb"], texts(records[1]));
    }

    #[test]
    fn code_and_value() {
        assert_eq!(Some(('P', "Acme")), Line::new(1, "P Acme").code_and_value());
        assert_eq!(Some(('E', "")), Line::new(1, "E").code_and_value());
    }
}
