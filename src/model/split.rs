use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One category allocation of a split transaction.
///
/// Field order matters: the derived ordering sorts by category, tag, amount, then memo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Split {
    pub category: String,
    #[serde(default)]
    pub tag: String,
    pub amount: Decimal,
    #[serde(default)]
    pub memo: String,
}

impl Split {
    pub fn new(category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            category: category.into(),
            tag: String::new(),
            amount,
            memo: String::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_category_tag_amount_memo() {
        let mut splits = vec![
            Split::new("Food", Decimal::new(500, 2)).with_memo("b"),
            Split::new("Food", Decimal::new(500, 2)).with_memo("a"),
            Split::new("Food", Decimal::new(100, 2)),
            Split::new("Auto", Decimal::new(900, 2)),
            Split::new("Food", Decimal::new(100, 2)).with_tag("Trip"),
        ];
        splits.sort();
        assert_eq!(
            vec![
                Split::new("Auto", Decimal::new(900, 2)),
                Split::new("Food", Decimal::new(100, 2)),
                Split::new("Food", Decimal::new(500, 2)).with_memo("a"),
                Split::new("Food", Decimal::new(500, 2)).with_memo("b"),
                Split::new("Food", Decimal::new(100, 2)).with_tag("Trip"),
            ],
            splits
        );
    }
}
