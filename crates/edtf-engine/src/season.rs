//! Season codes and their calendar spans.
//!
//! Codes 21-24 are the Level 1 seasons; 25-41 are the Level 2 extensions
//! (hemispheric seasons, quarters, quadrimesters and semesters).

use serde::Serialize;

use crate::ast::Level;

pub const FIRST_SEASON: u32 = 21;
pub const LAST_LEVEL1_SEASON: u32 = 24;
pub const LAST_SEASON: u32 = 41;

/// Whether `code` names any season (21-41).
pub fn is_season_code(code: u32) -> bool {
    (FIRST_SEASON..=LAST_SEASON).contains(&code)
}

/// Minimum conformance level at which `code` is legal, or `None` if it is
/// not a season code.
pub fn season_level(code: u32) -> Option<Level> {
    match code {
        FIRST_SEASON..=LAST_LEVEL1_SEASON => Some(Level::One),
        25..=LAST_SEASON => Some(Level::Two),
        _ => None,
    }
}

/// Human-readable name of a season code.
pub fn season_name(code: u32) -> Option<&'static str> {
    let name = match code {
        21 => "Spring",
        22 => "Summer",
        23 => "Autumn",
        24 => "Winter",
        25 => "Spring (Northern Hemisphere)",
        26 => "Summer (Northern Hemisphere)",
        27 => "Autumn (Northern Hemisphere)",
        28 => "Winter (Northern Hemisphere)",
        29 => "Spring (Southern Hemisphere)",
        30 => "Summer (Southern Hemisphere)",
        31 => "Autumn (Southern Hemisphere)",
        32 => "Winter (Southern Hemisphere)",
        33 => "Quarter 1",
        34 => "Quarter 2",
        35 => "Quarter 3",
        36 => "Quarter 4",
        37 => "Quadrimester 1",
        38 => "Quadrimester 2",
        39 => "Quadrimester 3",
        40 => "Semester 1",
        41 => "Semester 2",
        _ => return None,
    };
    Some(name)
}

/// Inclusive month span of a season. When `end_month < start_month` the
/// span crosses into the following year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthSpan {
    pub start_month: u32,
    pub end_month: u32,
}

impl MonthSpan {
    pub const fn new(start_month: u32, end_month: u32) -> Self {
        Self {
            start_month,
            end_month,
        }
    }

    pub fn crosses_year(&self) -> bool {
        self.end_month < self.start_month
    }
}

/// Lookup table from season code (21-41) to calendar month span.
///
/// The default follows northern-hemisphere meteorological seasons for the
/// unqualified codes. Callers who need a different convention can override
/// individual entries with [`SeasonTable::with_span`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonTable {
    spans: [MonthSpan; (LAST_SEASON - FIRST_SEASON + 1) as usize],
}

impl Default for SeasonTable {
    fn default() -> Self {
        let spring = MonthSpan::new(3, 5);
        let summer = MonthSpan::new(6, 8);
        let autumn = MonthSpan::new(9, 11);
        let winter = MonthSpan::new(12, 2);
        Self {
            spans: [
                // 21-24
                spring,
                summer,
                autumn,
                winter,
                // 25-28 northern hemisphere
                spring,
                summer,
                autumn,
                winter,
                // 29-32 southern hemisphere
                autumn,
                winter,
                spring,
                summer,
                // 33-36 quarters
                MonthSpan::new(1, 3),
                MonthSpan::new(4, 6),
                MonthSpan::new(7, 9),
                MonthSpan::new(10, 12),
                // 37-39 quadrimesters
                MonthSpan::new(1, 4),
                MonthSpan::new(5, 8),
                MonthSpan::new(9, 12),
                // 40-41 semesters
                MonthSpan::new(1, 6),
                MonthSpan::new(7, 12),
            ],
        }
    }
}

impl SeasonTable {
    pub fn span(&self, code: u32) -> Option<MonthSpan> {
        if !is_season_code(code) {
            return None;
        }
        self.spans.get((code - FIRST_SEASON) as usize).copied()
    }

    /// Replace the span for one code. Codes outside 21-41 are ignored.
    pub fn with_span(mut self, code: u32, span: MonthSpan) -> Self {
        if is_season_code(code) {
            self.spans[(code - FIRST_SEASON) as usize] = span;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_levels() {
        assert_eq!(season_level(21), Some(Level::One));
        assert_eq!(season_level(24), Some(Level::One));
        assert_eq!(season_level(25), Some(Level::Two));
        assert_eq!(season_level(41), Some(Level::Two));
        assert_eq!(season_level(20), None);
        assert_eq!(season_level(42), None);
    }

    #[test]
    fn test_default_table_spans() {
        let table = SeasonTable::default();
        assert_eq!(table.span(21), Some(MonthSpan::new(3, 5)));
        assert_eq!(table.span(24), Some(MonthSpan::new(12, 2)));
        assert!(table.span(24).unwrap().crosses_year());
        assert_eq!(table.span(29), Some(MonthSpan::new(9, 11)));
        assert_eq!(table.span(30), Some(MonthSpan::new(12, 2)));
        assert_eq!(table.span(36), Some(MonthSpan::new(10, 12)));
        assert_eq!(table.span(39), Some(MonthSpan::new(9, 12)));
        assert_eq!(table.span(41), Some(MonthSpan::new(7, 12)));
        assert_eq!(table.span(13), None);
    }

    #[test]
    fn test_table_override() {
        let table = SeasonTable::default().with_span(21, MonthSpan::new(4, 6));
        assert_eq!(table.span(21), Some(MonthSpan::new(4, 6)));
        assert_eq!(table.span(22), Some(MonthSpan::new(6, 8)));
        let unchanged = SeasonTable::default().with_span(99, MonthSpan::new(1, 1));
        assert_eq!(unchanged, SeasonTable::default());
    }

    #[test]
    fn test_season_names() {
        assert_eq!(season_name(23), Some("Autumn"));
        assert_eq!(season_name(34), Some("Quarter 2"));
        assert_eq!(season_name(50), None);
    }
}
