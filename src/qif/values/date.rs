use std::{ops::Range, str::FromStr};

use chrono::{Datelike as _, NaiveDate};
use chumsky::{
    error::Simple,
    prelude::{choice, filter, just, one_of},
    Parser as _,
};

/// Two-digit years below this are in the 2000s, the rest in the 1900s.
const TWO_DIGIT_YEAR_PIVOT: i32 = 69;

const SEPARATORS: &str = "/-.";
/// Quicken writes `'`; some exporters write a typographic or a back quote instead.
const YEAR_QUOTES: &str = "'\u{2019}`";

/// Parses the date notations found in QIF files and in the exports people
/// convert them from: `8/1'25`, `8/ 1' 5`, `12/31’24`, `08/01/25`,
/// `8-1-2025`, `12.31.2024`, day-first `31/12/2024`, `2024-12-31`,
/// `2024/12/31`, `2024.12.31`, `20241231` and ISO datetimes such as
/// `2024-12-31T23:59:59Z`, whose time is ignored.
pub fn date() -> impl chumsky::Parser<char, NaiveDate, Error = Simple<char>> {
    choice((year_first_date(), compact_date(), month_first_date())).labelled("date")
}

fn digits(min: usize, max: usize) -> impl chumsky::Parser<char, Vec<char>, Error = Simple<char>> {
    filter(char::is_ascii_digit).repeated().at_least(min).at_most(max)
}

fn number<N: FromStr>(min: usize, max: usize) -> impl chumsky::Parser<char, N, Error = Simple<char>> {
    digits(min, max).try_map(parse_number::<N>)
}

fn padding() -> impl chumsky::Parser<char, (), Error = Simple<char>> {
    just(' ').repeated().ignored()
}

/// `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYY.MM.DD`, optionally followed by an ISO time.
fn year_first_date() -> impl chumsky::Parser<char, NaiveDate, Error = Simple<char>> {
    let time = just('T')
        .then(
            filter(|c: &char| c.is_ascii_digit() || ":.+-Z".contains(*c))
                .repeated()
                .at_least(1),
        )
        .ignored();
    number::<i32>(4, 4)
        .then(one_of(SEPARATORS))
        .then(number::<u32>(1, 2))
        .then(one_of(SEPARATORS))
        .then(number::<u32>(1, 2))
        .then_ignore(time.or_not())
        .try_map(|((((year, first_sep), month), second_sep), day), span| {
            if first_sep != second_sep {
                return Err(Simple::custom(span, "Mixed date separators"));
            }
            make_date(year, month, day, span)
        })
}

/// `YYYYMMDD`
fn compact_date() -> impl chumsky::Parser<char, NaiveDate, Error = Simple<char>> {
    number::<i32>(4, 4)
        .then(number::<u32>(2, 2))
        .then(number::<u32>(2, 2))
        .try_map(|((year, month), day), span| make_date(year, month, day, span))
}

fn padded_component() -> impl chumsky::Parser<char, u32, Error = Simple<char>> {
    padding().ignore_then(number::<u32>(1, 2))
}

fn padded_year() -> impl chumsky::Parser<char, i32, Error = Simple<char>> {
    padding().ignore_then(digits(1, 4).try_map(|content, span: Range<usize>| {
        let len = content.len();
        let year = parse_number::<i32>(content, span.clone())?;
        match len {
            1 | 2 => Ok(expand_two_digit_year(year)),
            4 => Ok(year),
            _ => Err(Simple::custom(span, "Year must have two or four digits")),
        }
    }))
}

/// Month, day and year, separated by `/`, `-` or `.`, with a quote before a
/// QIF year. Unless the year is quoted, day and month swap places when only
/// that reading is valid.
fn month_first_date() -> impl chumsky::Parser<char, NaiveDate, Error = Simple<char>> {
    padded_component()
        .then_ignore(one_of(SEPARATORS))
        .then(padded_component())
        .then(one_of(SEPARATORS).or(one_of(YEAR_QUOTES)))
        .then(padded_year())
        .try_map(|(((first, second), year_sep), year), span| {
            if first > 12 && second <= 12 && SEPARATORS.contains(year_sep) {
                make_date(year, second, first, span)
            } else {
                make_date(year, first, second, span)
            }
        })
}

fn expand_two_digit_year(year: i32) -> i32 {
    if year < TWO_DIGIT_YEAR_PIVOT {
        2000 + year
    } else {
        1900 + year
    }
}

fn make_date(year: i32, month: u32, day: u32, span: Range<usize>) -> Result<NaiveDate, Simple<char>> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| Simple::custom(span, "Invalid date"))
}

fn parse_number<N: FromStr>(content: Vec<char>, span: Range<usize>) -> Result<N, Simple<char>> {
    content
        .into_iter()
        .collect::<String>()
        .parse()
        .map_err(|_err| Simple::custom(span, "Failed to parse number"))
}

/// Renders a date the way QIF writes it: `M/D'YY`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{}/{}'{:02}",
        date.month(),
        date.day(),
        date.year().rem_euclid(100)
    )
}

#[cfg(test)]
mod tests {
    use chumsky::prelude::end;
    use rstest::rstest;

    use super::*;
    use crate::qif::values::testutils::test_parser;

    #[rstest]
    #[case("8/1'25", 2025, 8, 1)]
    #[case("8/ 1'25", 2025, 8, 1)]
    #[case("12/31'99", 1999, 12, 31)]
    #[case("1/2'68", 2068, 1, 2)]
    #[case("1/2'69", 1969, 1, 2)]
    #[case("08/01/25", 2025, 8, 1)]
    #[case("8/1/2025", 2025, 8, 1)]
    #[case("8/1'2025", 2025, 8, 1)]
    #[case("8-1-2025", 2025, 8, 1)]
    #[case("2025-08-01", 2025, 8, 1)]
    #[case("2024-2-29", 2024, 2, 29)]
    #[case("2024/12/31", 2024, 12, 31)]
    #[case("2024.12.31", 2024, 12, 31)]
    #[case("12-31-2024", 2024, 12, 31)]
    #[case("12.31.2024", 2024, 12, 31)]
    #[case("8.1.25", 2025, 8, 1)]
    #[case("20241231", 2024, 12, 31)]
    #[case("31/12/2024", 2024, 12, 31)]
    #[case("13.1.2025", 2025, 1, 13)]
    #[case("25/12/24", 2024, 12, 25)]
    #[case("12/31\u{2019}24", 2024, 12, 31)]
    #[case("12/31`24", 2024, 12, 31)]
    #[case("1/ 5' 5", 2005, 1, 5)]
    #[case("2024-12-31T23:59:59Z", 2024, 12, 31)]
    #[case("2024-12-31T08:15:00+02:00", 2024, 12, 31)]
    fn valid_dates(#[case] input: &str, #[case] year: i32, #[case] month: u32, #[case] day: u32) {
        test_parser(
            input,
            date(),
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            "",
        );
    }

    #[rstest]
    #[case("2/30'25")]
    #[case("13/1'25")]
    #[case("0/1'25")]
    #[case("2023-02-29")]
    #[case("8/1'202")]
    #[case("13/13/2025")]
    #[case("2024/12-31")]
    #[case("20241301")]
    #[case("2024-12-31T")]
    #[case("")]
    fn invalid_dates(#[case] input: &str) {
        assert!(date().then_ignore(end()).parse(input).is_err());
    }

    #[test]
    fn date_stops_before_rest() {
        test_parser(
            "8/1'25 rest",
            date(),
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            " rest",
        );
    }

    #[rstest]
    #[case(2025, 8, 1, "8/1'25")]
    #[case(2003, 12, 31, "12/31'03")]
    #[case(1999, 1, 9, "1/9'99")]
    fn formats_dates(#[case] year: i32, #[case] month: u32, #[case] day: u32, #[case] expected: &str) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        assert_eq!(expected, format_date(date));
    }
}
