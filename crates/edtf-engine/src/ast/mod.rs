//! The EDTF abstract syntax tree.
//!
//! A parsed value is an [`Edtf`]: a closed sum over the six variants the
//! grammars produce. Set and list members, and concrete interval endpoints,
//! are [`Atom`]s, so an interval inside a set is unrepresentable.
//!
//! Every node renders its canonical string through `Display`; re-parsing that
//! string yields a structurally equal node. The JSON projection comes from
//! `serde` with a `type` discriminant field.

mod collection;
mod date;
mod interval;

use std::fmt;

use serde::{Serialize, Serializer};

pub use collection::{List, Set};
pub use date::{Date, DatePoint, DateTime, PartValue, Season, UnspecifiedDigits, YearValue};
pub use interval::{Interval, Terminal};

// ── Level ───────────────────────────────────────────────────────────────────

/// EDTF conformance level. Ordered: `Zero < One < Two`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    #[default]
    Zero,
    One,
    Two,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Zero, Level::One, Level::Two];

    pub fn as_u8(self) -> u8 {
        match self {
            Level::Zero => 0,
            Level::One => 1,
            Level::Two => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Level> {
        match value {
            0 => Some(Level::Zero),
            1 => Some(Level::One),
            2 => Some(Level::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl TryFrom<u8> for Level {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::from_u8(value).ok_or(value)
    }
}

// ── Precision ───────────────────────────────────────────────────────────────

/// Granularity of a value or normalized member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Second,
    Minute,
    Day,
    Month,
    Subyear,
    Year,
    Mixed,
    Unknown,
}

impl Precision {
    /// Numeric rank for storage, finest first.
    pub fn rank(self) -> u8 {
        match self {
            Precision::Second => 1,
            Precision::Minute => 2,
            Precision::Day => 3,
            Precision::Month => 4,
            Precision::Subyear => 5,
            Precision::Year => 6,
            Precision::Mixed => 7,
            Precision::Unknown => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Second => "second",
            Precision::Minute => "minute",
            Precision::Day => "day",
            Precision::Month => "month",
            Precision::Subyear => "subyear",
            Precision::Year => "year",
            Precision::Mixed => "mixed",
            Precision::Unknown => "unknown",
        }
    }

    /// The shared precision of two values, or `Mixed` when they differ.
    pub fn merge(self, other: Precision) -> Precision {
        if self == other {
            self
        } else {
            Precision::Mixed
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Qualification ───────────────────────────────────────────────────────────

/// Uncertainty (`?`), approximation (`~`) or both (`%`).
///
/// The parser sets exactly one flag per qualifier; `%` sets only
/// `uncertain_approximate`, which [`Qualification::is_uncertain`] and
/// [`Qualification::is_approximate`] both honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Qualification {
    pub uncertain: bool,
    pub approximate: bool,
    pub uncertain_approximate: bool,
}

impl Qualification {
    pub const UNCERTAIN: Qualification = Qualification {
        uncertain: true,
        approximate: false,
        uncertain_approximate: false,
    };
    pub const APPROXIMATE: Qualification = Qualification {
        uncertain: false,
        approximate: true,
        uncertain_approximate: false,
    };
    pub const UNCERTAIN_APPROXIMATE: Qualification = Qualification {
        uncertain: false,
        approximate: false,
        uncertain_approximate: true,
    };

    pub fn from_symbol(symbol: char) -> Option<Qualification> {
        match symbol {
            '?' => Some(Self::UNCERTAIN),
            '~' => Some(Self::APPROXIMATE),
            '%' => Some(Self::UNCERTAIN_APPROXIMATE),
            _ => None,
        }
    }

    /// The canonical symbol; `None` when no flag is set.
    pub fn symbol(&self) -> Option<char> {
        if self.uncertain_approximate || (self.uncertain && self.approximate) {
            Some('%')
        } else if self.uncertain {
            Some('?')
        } else if self.approximate {
            Some('~')
        } else {
            None
        }
    }

    pub fn is_uncertain(&self) -> bool {
        self.uncertain || self.uncertain_approximate
    }

    pub fn is_approximate(&self) -> bool {
        self.approximate || self.uncertain_approximate
    }

    pub fn is_empty(&self) -> bool {
        self.symbol().is_none()
    }
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(c) => write!(f, "{c}"),
            None => Ok(()),
        }
    }
}

/// Per-component qualification (Level 2), e.g. `2004-?06-11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PartialQualification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Qualification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Qualification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Qualification>,
}

impl PartialQualification {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = Qualification> {
        [self.year, self.month, self.day].into_iter().flatten()
    }
}

// ── Atom ────────────────────────────────────────────────────────────────────

/// A single calendar value: the member type of sets and lists and the
/// concrete form of an interval endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Atom {
    Date(Date),
    DateTime(DateTime),
    Season(Season),
}

impl Atom {
    pub fn level(&self) -> Level {
        match self {
            Atom::Date(d) => d.level(),
            Atom::DateTime(dt) => dt.level(),
            Atom::Season(s) => s.level(),
        }
    }

    pub fn precision(&self) -> Precision {
        match self {
            Atom::Date(d) => d.precision(),
            Atom::DateTime(dt) => dt.precision(),
            Atom::Season(_) => Precision::Subyear,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Date(d) => d.fmt(f),
            Atom::DateTime(dt) => dt.fmt(f),
            Atom::Season(s) => s.fmt(f),
        }
    }
}

impl From<Atom> for Edtf {
    fn from(atom: Atom) -> Self {
        match atom {
            Atom::Date(d) => Edtf::Date(d),
            Atom::DateTime(dt) => Edtf::DateTime(dt),
            Atom::Season(s) => Edtf::Season(s),
        }
    }
}

// ── Edtf ────────────────────────────────────────────────────────────────────

/// A parsed EDTF value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Edtf {
    Date(Date),
    DateTime(DateTime),
    Interval(Interval),
    Season(Season),
    Set(Set),
    List(List),
}

impl Edtf {
    /// The minimum conformance level needed to express this value.
    pub fn level(&self) -> Level {
        match self {
            Edtf::Date(d) => d.level(),
            Edtf::DateTime(dt) => dt.level(),
            Edtf::Interval(i) => i.level(),
            Edtf::Season(s) => s.level(),
            Edtf::Set(s) => s.level(),
            Edtf::List(l) => l.level(),
        }
    }

    pub fn precision(&self) -> Precision {
        match self {
            Edtf::Date(d) => d.precision(),
            Edtf::DateTime(dt) => dt.precision(),
            Edtf::Interval(i) => i.precision(),
            Edtf::Season(_) => Precision::Subyear,
            Edtf::Set(s) => collection::values_precision(&s.values),
            Edtf::List(l) => collection::values_precision(&l.values),
        }
    }

    /// Variant name as used in the JSON `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Edtf::Date(_) => "Date",
            Edtf::DateTime(_) => "DateTime",
            Edtf::Interval(_) => "Interval",
            Edtf::Season(_) => "Season",
            Edtf::Set(_) => "Set",
            Edtf::List(_) => "List",
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Edtf::Date(_))
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, Edtf::DateTime(_))
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, Edtf::Interval(_))
    }

    pub fn is_season(&self) -> bool {
        matches!(self, Edtf::Season(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Edtf::Set(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Edtf::List(_))
    }

    pub fn as_date(&self) -> Option<&Date> {
        match self {
            Edtf::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime> {
        match self {
            Edtf::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_interval(&self) -> Option<&Interval> {
        match self {
            Edtf::Interval(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_season(&self) -> Option<&Season> {
        match self {
            Edtf::Season(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Edtf::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Edtf::List(l) => Some(l),
            _ => None,
        }
    }

    /// JSON projection: the serde form plus the canonical `edtf` string,
    /// `level` and `precision` at the top level.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert("edtf".to_string(), self.to_string().into());
            map.insert("level".to_string(), self.level().as_u8().into());
            map.insert("precision".to_string(), self.precision().as_str().into());
        }
        Ok(value)
    }
}

impl fmt::Display for Edtf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edtf::Date(d) => d.fmt(f),
            Edtf::DateTime(dt) => dt.fmt(f),
            Edtf::Interval(i) => i.fmt(f),
            Edtf::Season(s) => s.fmt(f),
            Edtf::Set(s) => s.fmt(f),
            Edtf::List(l) => l.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn year(y: i64) -> Date {
        Date::from_year(BigInt::from(y))
    }

    #[test]
    fn test_level_ordering_and_conversion() {
        assert!(Level::Zero < Level::One && Level::One < Level::Two);
        assert_eq!(Level::try_from(2), Ok(Level::Two));
        assert_eq!(Level::try_from(3), Err(3));
        assert_eq!(serde_json::to_string(&Level::One).unwrap(), "1");
    }

    #[test]
    fn test_qualification_symbols() {
        assert_eq!(Qualification::from_symbol('?'), Some(Qualification::UNCERTAIN));
        assert_eq!(Qualification::UNCERTAIN_APPROXIMATE.symbol(), Some('%'));
        assert!(Qualification::UNCERTAIN_APPROXIMATE.is_uncertain());
        assert!(Qualification::UNCERTAIN_APPROXIMATE.is_approximate());
        let both = Qualification {
            uncertain: true,
            approximate: true,
            uncertain_approximate: false,
        };
        assert_eq!(both.to_string(), "%");
        assert!(Qualification::default().is_empty());
        assert_eq!(Qualification::from_symbol('!'), None);
    }

    #[test]
    fn test_type_guards() {
        let value = Edtf::Date(year(1985));
        assert!(value.is_date());
        assert!(!value.is_interval());
        assert!(!value.is_set());
        assert_eq!(value.type_name(), "Date");
        assert!(value.as_date().is_some());
        assert!(value.as_season().is_none());
    }

    #[test]
    fn test_precision_merge_and_rank() {
        assert_eq!(Precision::Day.merge(Precision::Day), Precision::Day);
        assert_eq!(Precision::Day.merge(Precision::Year), Precision::Mixed);
        assert!(Precision::Minute.rank() < Precision::Year.rank());
    }

    #[test]
    fn test_to_json_has_common_fields() {
        let json = Edtf::Date(year(1985)).to_json().unwrap();
        assert_eq!(json["type"], "Date");
        assert_eq!(json["edtf"], "1985");
        assert_eq!(json["level"], 0);
        assert_eq!(json["precision"], "year");
        assert_eq!(json["year"], 1985);
    }
}
