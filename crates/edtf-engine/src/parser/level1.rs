//! Level 1: qualified and partly unspecified values, extended and negative
//! years, seasons 21-24, and intervals with open (`..`) or unknown (empty)
//! sides.

use super::atom::parse_atom;
use super::level0;
use crate::ast::{Edtf, Level, Terminal};
use crate::error::{ParseError, Result};

pub(crate) fn parse(input: &str, offset: usize) -> Result<Edtf> {
    parse_at(input, offset, Level::One)
}

/// The Level 1 value-or-interval grammar with atoms read at `level`.
pub(super) fn parse_at(input: &str, offset: usize, level: Level) -> Result<Edtf> {
    level0::parse_with(input, offset, level, terminal)
}

fn terminal(text: &str, offset: usize, level: Level) -> std::result::Result<Terminal, ParseError> {
    match text {
        "" => Ok(Terminal::Unknown),
        ".." => Ok(Terminal::Open),
        _ => parse_atom(text, offset, level).map(Terminal::Value),
    }
}
