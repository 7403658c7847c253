use rust_decimal::Decimal;
use serde::Serialize;

/// Investment details attached to a transaction in an investment account.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Security {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub commission: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub transfer_amount: Decimal,
}

impl Security {
    /// True if no field carries a value, so the QIF form has no security lines.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.price.is_zero()
            && self.quantity.is_zero()
            && self.commission.is_zero()
            && self.transfer_amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_security() {
        assert!(Security::default().is_empty());
        let with_quantity = Security {
            quantity: Decimal::new(5, 0),
            ..Security::default()
        };
        assert!(!with_quantity.is_empty());
        let named = Security {
            name: "ACME".to_string(),
            ..Security::default()
        };
        assert!(!named.is_empty());
    }
}
