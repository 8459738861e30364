use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::{Atom, Level, Precision, Qualification};

/// One side of an interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Value(Atom),
    /// `..` on that side: the interval extends without limit.
    Open,
    /// Empty side: the bound exists but is not known.
    Unknown,
}

impl Terminal {
    pub fn value(&self) -> Option<&Atom> {
        match self {
            Terminal::Value(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Terminal::Open)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Terminal::Unknown)
    }
}

impl From<Atom> for Terminal {
    fn from(atom: Atom) -> Self {
        Terminal::Value(atom)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Value(atom) => atom.fmt(f),
            Terminal::Open => f.write_str(".."),
            Terminal::Unknown => Ok(()),
        }
    }
}

/// `start/end`. At least one side is a concrete value when produced by the
/// parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub start: Terminal,
    pub end: Terminal,
    /// Qualification of the interval as a whole. EDTF has no syntax for it,
    /// so it is never rendered; it exists for values built in code.
    pub qualification: Option<Qualification>,
}

impl Interval {
    pub fn new(start: Terminal, end: Terminal) -> Self {
        Self {
            start,
            end,
            qualification: None,
        }
    }

    pub fn open_start(&self) -> bool {
        self.start.is_open()
    }

    pub fn open_end(&self) -> bool {
        self.end.is_open()
    }

    pub fn unknown_start(&self) -> bool {
        self.start.is_unknown()
    }

    pub fn unknown_end(&self) -> bool {
        self.end.is_unknown()
    }

    pub fn level(&self) -> Level {
        let mut level = [&self.start, &self.end]
            .into_iter()
            .filter_map(Terminal::value)
            .map(Atom::level)
            .max()
            .unwrap_or_default();
        if !matches!(self.start, Terminal::Value(_)) || !matches!(self.end, Terminal::Value(_)) {
            level = level.max(Level::One);
        }
        if self.qualification.is_some() {
            level = Level::Two;
        }
        level
    }

    /// Shared precision of the concrete sides; `Unknown` with none.
    pub fn precision(&self) -> Precision {
        match (self.start.value(), self.end.value()) {
            (Some(a), Some(b)) => a.precision().merge(b.precision()),
            (Some(a), None) | (None, Some(a)) => a.precision(),
            (None, None) => Precision::Unknown,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Interval", 7)?;
        state.serialize_field("start", &self.start.value())?;
        state.serialize_field("end", &self.end.value())?;
        state.serialize_field("open_start", &self.open_start())?;
        state.serialize_field("open_end", &self.open_end())?;
        state.serialize_field("unknown_start", &self.unknown_start())?;
        state.serialize_field("unknown_end", &self.unknown_end())?;
        state.serialize_field("qualification", &self.qualification)?;
        state.end()
    }
}
