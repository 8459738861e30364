//! EDTF parsing with level detection and fallback.
//!
//! Each level has its own grammar (`level0`, `level1`, `level2`); none
//! of them retries anything. [`parse`] is the single place that picks a
//! grammar, and when auto-detecting it falls back from Level 2 to Level 1 to
//! Level 0. Input detected as Level 1 is parsed by the Level 1 grammar alone
//! and its error is returned as is.

mod atom;
mod cursor;
mod detect;
mod level0;
mod level1;
mod level2;

use std::str::FromStr;

use tracing::debug;

pub use atom::MAX_EXPONENT;
pub use detect::detect_level;
pub use level2::MAX_RANGE_EXPANSION;

use crate::ast::{Edtf, Level};
use crate::error::{ErrorCode, ParseError, ParseFailure, Result};

/// Parse an EDTF string.
///
/// With `level` set, only that level's grammar is tried. With `None`, the
/// level is detected first and the grammars fall back as described in the
/// module docs. Leading and trailing whitespace is ignored.
///
/// The level of a parsed value is [`Edtf::level`]: the minimum level needed
/// to express it, which may be lower than the grammar that accepted it.
///
/// # Errors
///
/// Returns a [`ParseFailure`] holding at least one [`ParseError`]:
/// - `EMPTY_INPUT` for a blank string
/// - `INVALID_DATE` for impossible calendar values (`1985-04-31`)
/// - `INVALID_SEASON` for season codes not allowed at the level
/// - `INVALID_RANGE` for mismatched or reversed ranges and intervals
/// - `INVALID_FORMAT` for anything else the grammar does not accept
///
/// # Examples
///
/// ```
/// use edtf_engine::{parse, Level};
///
/// let value = parse("1984?/2004-06~", None).unwrap();
/// assert!(value.is_interval());
/// assert_eq!(value.level(), Level::One);
///
/// assert!(parse("1984?", Some(Level::Zero)).is_err());
/// ```
pub fn parse(input: &str, level: Option<Level>) -> Result<Edtf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new(ErrorCode::EmptyInput, "input is empty").into());
    }
    let offset = input.len() - input.trim_start().len();
    match level {
        Some(level) => parse_level(trimmed, offset, level),
        None => parse_detected(trimmed, offset),
    }
}

/// Whether `input` parses at `level` (or at any level when `None`).
pub fn is_valid(input: &str, level: Option<Level>) -> bool {
    parse(input, level).is_ok()
}

fn parse_level(input: &str, offset: usize, level: Level) -> Result<Edtf> {
    match level {
        Level::Zero => level0::parse(input, offset),
        Level::One => level1::parse(input, offset),
        Level::Two => level2::parse(input, offset),
    }
}

fn parse_detected(input: &str, offset: usize) -> Result<Edtf> {
    match detect_level(input) {
        Level::Two => {
            let error = match level2::parse(input, offset) {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            debug!(input, %error, "level 2 parse failed, trying lower levels");
            level1::parse(input, offset)
                .or_else(|_| level0::parse(input, offset))
                .map_err(|_| error)
        }
        // detection only picks Level 1 on Level 1 markers, which the Level 0
        // grammar never accepts
        Level::One => level1::parse(input, offset),
        Level::Zero => level0::parse(input, offset),
    }
}

/// Error for a value whose minimum level is above the grammar being used.
pub(crate) fn above_level(text: &str, required: Level, requested: Level) -> ParseError {
    ParseError::format(format!(
        "'{text}' requires EDTF Level {required}, above the requested Level {requested}"
    ))
    .with_suggestion(format!(
        "parse at Level {required}, or omit the level to detect it"
    ))
}

impl FromStr for Edtf {
    type Err = ParseFailure;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse(s, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    // ── orchestration ───────────────────────────────────────────────────

    #[test]
    fn test_empty_input() {
        for input in ["", "   ", "\t\n"] {
            let err = parse(input, None).unwrap_err();
            assert_eq!(err.first_code(), Some(ErrorCode::EmptyInput));
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let value = parse("  1985-04 ", None).unwrap();
        assert_eq!(value.to_string(), "1985-04");
        let err = parse("  1985-13", None).unwrap_err();
        assert_eq!(err.errors[0].position, Some(Span::new(7, 9)));
    }

    #[test]
    fn test_auto_detection_picks_the_grammar() {
        assert_eq!(parse("1985", None).unwrap().level(), Level::Zero);
        assert_eq!(parse("1985~", None).unwrap().level(), Level::One);
        assert_eq!(parse("[1985,1986]", None).unwrap().level(), Level::Two);
    }

    #[test]
    fn test_explicit_level_does_not_fall_back() {
        assert!(parse("2004?-06", Some(Level::One)).is_err());
        assert!(parse("2004?-06", Some(Level::Two)).is_ok());
        // a higher grammar accepts lower-level input
        assert_eq!(parse("1985", Some(Level::Two)).unwrap().level(), Level::Zero);
    }

    #[test]
    fn test_level2_error_is_kept_when_fallback_fails() {
        let err = parse("[1667..1669-02]", None).unwrap_err();
        assert_eq!(err.first_code(), Some(ErrorCode::InvalidRange));
    }

    #[test]
    fn test_level1_error_is_authoritative() {
        let err = parse("1985-04-31?", None).unwrap_err();
        assert_eq!(err.first_code(), Some(ErrorCode::InvalidDate));
        let err = parse("-1985-13", None).unwrap_err();
        assert_eq!(err.first_code(), Some(ErrorCode::InvalidDate));
    }

    #[test]
    fn test_year_sign_and_prefix_are_level1_syntax() {
        for input in ["-0000", "Y00001"] {
            let err = parse(input, Some(Level::Zero)).unwrap_err();
            assert_eq!(err.first_code(), Some(ErrorCode::InvalidFormat), "{input}");
            // accepted once detected, though the value itself needs only Level 0
            assert_eq!(parse(input, None).unwrap().level(), Level::Zero, "{input}");
        }
    }

    #[test]
    fn test_offset_without_colon() {
        let value = parse("1985-04-12T10:00+0530", None).unwrap();
        assert_eq!(value.level(), Level::Zero);
        assert_eq!(value.to_string(), "1985-04-12T10:00+0530");
        assert!(parse("1985-04-12T10:00+0530", Some(Level::Zero)).is_ok());
    }

    #[test]
    fn test_is_valid_and_from_str() {
        assert!(is_valid("1985-04-12", None));
        assert!(!is_valid("1985-04-12?", Some(Level::Zero)));
        assert!(!is_valid("not a date", None));
        let value: Edtf = "2001-21".parse().unwrap();
        assert!(value.is_season());
        assert!("".parse::<Edtf>().is_err());
    }
}
