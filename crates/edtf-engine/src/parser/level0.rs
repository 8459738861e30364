//! Level 0: calendar dates, date-times, and `start/end` intervals with both
//! ends given.

use super::atom::parse_atom;
use crate::ast::{Edtf, Interval, Level, Terminal};
use crate::error::{ErrorCode, ParseError, Result, Span};
use crate::normalize::{atom_member, NormalizeOptions};

/// How one side of an interval is read at a given level.
pub(super) type TerminalParser =
    fn(&str, usize, Level) -> std::result::Result<Terminal, ParseError>;

pub(crate) fn parse(input: &str, offset: usize) -> Result<Edtf> {
    parse_with(input, offset, Level::Zero, concrete_terminal)
}

/// Shared driver for the value-or-interval grammars of levels 0 and 1.
pub(super) fn parse_with(
    input: &str,
    offset: usize,
    level: Level,
    terminal: TerminalParser,
) -> Result<Edtf> {
    let full = Span::new(offset, offset + input.len());
    let value = match input.split_once('/') {
        None => Edtf::from(parse_atom(input, offset, level)?),
        Some((start, end)) => {
            if let Some(extra) = end.find('/') {
                let at = offset + start.len() + 1 + extra;
                return Err(ParseError::format("an interval has exactly one '/'")
                    .at(Span::new(at, at + 1))
                    .into());
            }
            let start = terminal(start, offset, level)?;
            let end = terminal(end, offset + input.len() - end.len(), level)?;
            Edtf::Interval(build_interval(start, end, full)?)
        }
    };
    let required = value.level();
    if required > level {
        return Err(super::above_level(input, required, level).at(full).into());
    }
    Ok(value)
}

fn concrete_terminal(
    text: &str,
    offset: usize,
    level: Level,
) -> std::result::Result<Terminal, ParseError> {
    if text.is_empty() || text == ".." {
        let what = if text.is_empty() { "unknown" } else { "open" };
        return Err(
            ParseError::format(format!("an {what} interval end requires EDTF Level 1"))
                .at(Span::new(offset, offset + text.len()))
                .with_suggestion("parse at Level 1"),
        );
    }
    parse_atom(text, offset, level).map(Terminal::Value)
}

/// Assemble an interval, refusing one whose start lies entirely after its end.
pub(super) fn build_interval(
    start: Terminal,
    end: Terminal,
    span: Span,
) -> std::result::Result<Interval, ParseError> {
    let (Some(first), Some(last)) = (start.value(), end.value()) else {
        if start.value().is_none() && end.value().is_none() {
            return Err(ParseError::format("an interval needs at least one concrete end").at(span));
        }
        return Ok(Interval::new(start, end));
    };
    let options = NormalizeOptions::default();
    let earliest_start = atom_member(first, &options).s_min;
    let latest_end = atom_member(last, &options).e_max;
    if let (Some(s), Some(e)) = (earliest_start, latest_end) {
        if s > e {
            return Err(ParseError::new(
                ErrorCode::InvalidRange,
                format!("interval starts ({first}) after it ends ({last})"),
            )
            .at(span));
        }
    }
    Ok(Interval::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_and_intervals() {
        assert!(parse("1985-04-12", 0).unwrap().is_date());
        assert!(parse("1985-04-12T23:20:30", 0).unwrap().is_date_time());
        let value = parse("1964/2008", 0).unwrap();
        let interval = value.as_interval().unwrap();
        assert!(!interval.open_start() && !interval.open_end());
        assert_eq!(value.to_string(), "1964/2008");
        assert!(parse("2004-02-01/2005-02-08", 0).is_ok());
    }

    #[test]
    fn test_rejects_level1_syntax() {
        let inputs = [
            "1984?", "201X", "1985/..", "/1985", "-1985", "2001-21", "-0000", "Y00001",
            "1964/-0000",
        ];
        for input in inputs {
            assert!(parse(input, 0).is_err(), "{input}");
        }
        let err = parse("1985/", 0).unwrap_err();
        assert_eq!(err.errors[0].suggestion.as_deref(), Some("parse at Level 1"));
    }

    #[test]
    fn test_reversed_interval() {
        let err = parse("2008/1964", 0).unwrap_err();
        assert_eq!(err.first_code(), Some(ErrorCode::InvalidRange));
        assert!(parse("1985-04/1985", 0).is_ok());
    }

    #[test]
    fn test_extra_separator() {
        let err = parse("1964/2008/2010", 0).unwrap_err();
        assert_eq!(err.errors[0].position, Some(Span::new(9, 10)));
    }
}
