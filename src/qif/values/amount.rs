use chumsky::{
    error::Simple,
    prelude::{filter, just, one_of},
    Parser as _,
};
use rust_decimal::Decimal;

/// Parses a signed decimal amount such as `-1,234.56`, `$12.00` or `.5`.
pub fn amount() -> impl chumsky::Parser<char, Decimal, Error = Simple<char>> {
    let sign = || one_of("+-").or_not();
    let integer = filter(|c: &char| c.is_ascii_digit() || *c == ',')
        .repeated()
        .collect::<String>();
    let fraction = just('.')
        .ignore_then(filter(char::is_ascii_digit).repeated().collect::<String>())
        .or_not();
    sign()
        .then_ignore(just('$').or_not())
        .then(sign())
        .then(integer)
        .then(fraction)
        .try_map(|(((outer_sign, inner_sign), integer), fraction), span| {
            if integer.starts_with(',') {
                return Err(Simple::custom(span, "Amount can't start with a separator"));
            }
            let integer = integer.replace(',', "");
            let fraction = fraction.unwrap_or_default();
            if integer.is_empty() && fraction.is_empty() {
                return Err(Simple::custom(span, "Amount has no digits"));
            }
            let content = if fraction.is_empty() {
                integer
            } else {
                format!("{}.{}", integer, fraction)
            };
            let amount = Decimal::from_str_exact(&content)
                .map_err(|_err| Simple::custom(span, "Failed to parse amount"))?;
            let negative = [outer_sign, inner_sign]
                .iter()
                .filter(|sign| **sign == Some('-'))
                .count()
                % 2
                == 1;
            Ok(if negative { -amount } else { amount })
        })
        .labelled("amount")
}
