//! Error types for edtf-engine operations.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Machine-readable classification of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The input does not match the attempted grammar.
    InvalidFormat,
    /// The input matches the grammar but names an impossible calendar date or time.
    InvalidDate,
    /// A numeric code in the season position that is not a season at this level.
    InvalidSeason,
    /// A range or interval whose ends are mismatched or out of order.
    InvalidRange,
    /// Blank input.
    EmptyInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidSeason => "INVALID_SEASON",
            Self::InvalidRange => "INVALID_RANGE",
            Self::EmptyInput => "EMPTY_INPUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte offsets `[start, end)` into the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A single structured parse diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{code}: {message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            position: None,
            suggestion: None,
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    pub fn at(mut self, span: Span) -> Self {
        self.position = Some(span);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// The failure side of a parse: one or more diagnostics, never empty.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}", render_errors(.errors))]
pub struct ParseFailure {
    pub errors: Vec<ParseError>,
}

impl ParseFailure {
    pub fn first_code(&self) -> Option<ErrorCode> {
        self.errors.first().map(|e| e.code)
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl From<ParseError> for ParseFailure {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

fn render_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from the lossy fixed-width projection of normalized bounds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("Bound out of storage range: {value} ms is outside [{min}, {max}]")]
    OutOfRange { value: String, min: i64, max: i64 },
}

/// A relation name that is not one of the 13 base or 5 derived relations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown relation: '{0}'")]
pub struct UnknownRelation(pub String);

pub type Result<T> = std::result::Result<T, ParseFailure>;
