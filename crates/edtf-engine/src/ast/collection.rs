use std::fmt;

use serde::Serialize;

use super::{Atom, Level, Precision};

/// `[a, b, ...]`: exactly one of the members applies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Set {
    pub values: Vec<Atom>,
    /// Leading `..`: the set continues with unlisted earlier values.
    pub earlier: bool,
    /// Trailing `..`: the set continues with unlisted later values.
    pub later: bool,
}

/// `{a, b, ...}`: every member applies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct List {
    pub values: Vec<Atom>,
    pub earlier: bool,
    pub later: bool,
}

impl Set {
    pub fn new(values: Vec<Atom>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn level(&self) -> Level {
        Level::Two
    }
}

impl List {
    pub fn new(values: Vec<Atom>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn level(&self) -> Level {
        Level::Two
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_members(f, ('[', ']'), &self.values, self.earlier, self.later)
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_members(f, ('{', '}'), &self.values, self.earlier, self.later)
    }
}

fn write_members(
    f: &mut fmt::Formatter<'_>,
    (open, close): (char, char),
    values: &[Atom],
    earlier: bool,
    later: bool,
) -> fmt::Result {
    write!(f, "{open}")?;
    if earlier {
        f.write_str("..")?;
    }
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{value}")?;
    }
    if later {
        f.write_str("..")?;
    }
    write!(f, "{close}")
}

/// Shared precision of all members; `Mixed` when they differ, `Unknown` when empty.
pub(crate) fn values_precision(values: &[Atom]) -> Precision {
    values
        .iter()
        .map(Atom::precision)
        .reduce(Precision::merge)
        .unwrap_or(Precision::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Date;
    use num_bigint::BigInt;

    fn year(y: i64) -> Atom {
        Atom::Date(Date::from_year(BigInt::from(y)))
    }

    #[test]
    fn test_set_rendering_with_markers() {
        let mut set = Set::new(vec![year(1667), year(1668)]);
        assert_eq!(set.to_string(), "[1667,1668]");
        set.earlier = true;
        set.later = true;
        assert_eq!(set.to_string(), "[..1667,1668..]");
    }

    #[test]
    fn test_list_rendering() {
        let list = List::new(vec![year(1667), Atom::Date(Date::from_ym(BigInt::from(1668), 12))]);
        assert_eq!(list.to_string(), "{1667,1668-12}");
        assert_eq!(list.level(), Level::Two);
    }

    #[test]
    fn test_values_precision() {
        assert_eq!(values_precision(&[year(1), year(2)]), Precision::Year);
        let mixed = [year(1), Atom::Date(Date::from_ym(BigInt::from(2), 3))];
        assert_eq!(values_precision(&mixed), Precision::Mixed);
        assert_eq!(values_precision(&[]), Precision::Unknown);
    }

    #[test]
    fn test_set_json_has_values() {
        let json = serde_json::to_value(Set::new(vec![year(1667)])).unwrap();
        assert_eq!(json["values"][0]["type"], "Date");
        assert_eq!(json["earlier"], false);
    }
}
