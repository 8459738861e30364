//! Level 2: sets `[...]`, lists `{...}` and everything the atom grammar
//! accepts at its top level (partial qualification, masks anywhere,
//! exponential years, significant digits, seasons 25-41).

use super::atom::parse_atom;
use super::level1;
use crate::ast::{Atom, Date, DatePoint, Edtf, Level, List, Set};
use crate::calendar;
use crate::error::{ErrorCode, ParseError, Result, Span};

/// Most members a set or list may hold once its ranges are expanded.
pub const MAX_RANGE_EXPANSION: usize = 10_000;

pub(crate) fn parse(input: &str, offset: usize) -> Result<Edtf> {
    match input.as_bytes().first() {
        Some(b'[') => {
            let m = members(input, offset, ']')?;
            Ok(Edtf::Set(Set {
                values: m.values,
                earlier: m.earlier,
                later: m.later,
            }))
        }
        Some(b'{') => {
            let m = members(input, offset, '}')?;
            Ok(Edtf::List(List {
                values: m.values,
                earlier: m.earlier,
                later: m.later,
            }))
        }
        _ => level1::parse_at(input, offset, Level::Two),
    }
}

struct Members {
    values: Vec<Atom>,
    earlier: bool,
    later: bool,
}

fn members(input: &str, offset: usize, close: char) -> std::result::Result<Members, ParseError> {
    let end = offset + input.len();
    let Some(inner) = input[1..].strip_suffix(close) else {
        return Err(
            ParseError::format(format!("expected closing '{close}'")).at(Span::new(end, end))
        );
    };

    let mut entries = Vec::new();
    let mut pos = offset + 1;
    for raw in inner.split(',') {
        let lead = raw.len() - raw.trim_start().len();
        entries.push((raw.trim(), pos + lead));
        pos += raw.len() + 1;
    }

    let mut out = Members {
        values: Vec::new(),
        earlier: false,
        later: false,
    };
    let last = entries.len() - 1;
    for (i, (mut text, mut at)) in entries.into_iter().enumerate() {
        if i == 0 {
            if let Some(rest) = text.strip_prefix("..") {
                out.earlier = true;
                text = rest;
                at += 2;
            }
        }
        if i == last {
            if let Some(rest) = text.strip_suffix("..") {
                out.later = true;
                text = rest;
            }
        }
        if text.is_empty() {
            return Err(ParseError::format("empty member").at(Span::new(at, at)));
        }
        match text.split_once("..") {
            Some((lo, hi)) => expand_range(lo, hi, at, &mut out.values)?,
            None => out.values.push(parse_atom(text, at, Level::Two)?),
        }
        if out.values.len() > MAX_RANGE_EXPANSION {
            return Err(too_many(Span::new(at, at + text.len())));
        }
    }
    Ok(out)
}

/// Expand `first..last` into one date per year, month or day, inclusive.
fn expand_range(
    first: &str,
    last: &str,
    offset: usize,
    values: &mut Vec<Atom>,
) -> std::result::Result<(), ParseError> {
    let span = Span::new(offset, offset + first.len() + 2 + last.len());
    let start = range_end(first, offset)?;
    let end = range_end(last, offset + first.len() + 2)?;
    if start.precision() != end.precision() {
        return Err(ParseError::new(
            ErrorCode::InvalidRange,
            format!(
                "range ends differ in precision ({} vs {})",
                start.precision(),
                end.precision()
            ),
        )
        .at(span)
        .with_suggestion("write both ends to the same precision"));
    }
    if start.start_millis() > end.start_millis() {
        return Err(ParseError::new(
            ErrorCode::InvalidRange,
            format!("range {first}..{last} runs backwards"),
        )
        .at(span));
    }

    let mut current = start;
    loop {
        if values.len() >= MAX_RANGE_EXPANSION {
            return Err(too_many(span));
        }
        values.push(Atom::Date(point_date(&current)));
        if current == end {
            return Ok(());
        }
        current = step(&current);
    }
}

/// A range end: a plain calendar date with no qualifier or placeholder.
fn range_end(text: &str, offset: usize) -> std::result::Result<DatePoint, ParseError> {
    let span = Span::new(offset, offset + text.len());
    let date = match parse_atom(text, offset, Level::Two)? {
        Atom::Date(date)
            if date.is_plain() && date.exponential.is_none() && date.significant_digits.is_none() =>
        {
            date
        }
        _ => {
            return Err(ParseError::format(format!(
                "range end '{text}' must be a plain calendar date"
            ))
            .at(span))
        }
    };
    date.extremes().map(|(lo, _)| lo).ok_or_else(|| {
        ParseError::new(ErrorCode::InvalidDate, format!("'{text}' is not a date")).at(span)
    })
}

fn step(point: &DatePoint) -> DatePoint {
    match (point.month, point.day) {
        (Some(m), Some(d)) => {
            let (year, month, day) = calendar::next_day(&point.year, m, d);
            DatePoint {
                year,
                month: Some(month),
                day: Some(day),
            }
        }
        (Some(m), None) => {
            let (year, month) = calendar::next_month(&point.year, m);
            DatePoint {
                year,
                month: Some(month),
                day: None,
            }
        }
        _ => DatePoint {
            year: &point.year + 1u32,
            month: None,
            day: None,
        },
    }
}

fn point_date(point: &DatePoint) -> Date {
    let year = point.year.clone();
    match (point.month, point.day) {
        (Some(m), Some(d)) => Date::from_ymd(year, m, d),
        (Some(m), None) => Date::from_ym(year, m),
        _ => Date::from_year(year),
    }
}

fn too_many(span: Span) -> ParseError {
    ParseError::new(
        ErrorCode::InvalidRange,
        format!("expansion exceeds {MAX_RANGE_EXPANSION} members"),
    )
    .at(span)
}
