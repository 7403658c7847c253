use chumsky::{
    error::Simple,
    prelude::{end, just},
    Parser as _,
};

#[track_caller]
pub fn test_parser<T>(
    input: &str,
    parser: impl chumsky::Parser<char, T, Error = Simple<char>>,
    expected: T,
    rest: &str,
) where
    T: std::fmt::Debug + Eq + PartialEq,
{
    let parser = parser.then_ignore(just(rest)).then_ignore(end());
    let parsed = parser.parse(input).unwrap();
    assert_eq!(expected, parsed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_without_rest() {
        let parser = chumsky::primitive::just::<char, _, Simple<char>>('a');
        test_parser("a", parser, 'a', "");
    }

    #[test]
    fn success_with_rest() {
        let parser = chumsky::primitive::just::<char, _, Simple<char>>('a');
        test_parser("abc", parser, 'a', "bc");
    }

    #[test]
    #[should_panic]
    fn expected_no_rest_but_has_rest() {
        let parser = chumsky::primitive::just::<char, _, Simple<char>>('a');
        test_parser("abc", parser, 'a', "");
    }
}
