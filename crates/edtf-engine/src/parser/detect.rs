//! Level detection: a cheap pattern scan that guesses the lowest level whose
//! grammar should accept the input. The parser itself stays authoritative.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::ast::Level;

static LEVEL2_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        // set or list
        r"^\s*[\[{]",
        // exponential year
        r"Y-?\d+E\d",
        // significant digits
        r"\dS\d",
        // seasons 25-41
        r"(?:^|/)(?:Y-?\d+|-?\d{4})-(?:2[5-9]|3\d|4[01])[?~%]?(?:/|$)",
        // qualifier attached to a component rather than the whole value
        r"[?~%]-|-[?~%]|^[?~%]|/[?~%]",
        // placeholder followed by a concrete digit or component
        r"X\d|X-\d",
        // placeholder in the leading year digits
        r"(?:^|/|,)-?(?:\dX{3}|X{4})",
        // partly masked month or day
        r"-\dX(?:$|[^X])",
    ])
});

static LEVEL1_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"[?~%]",
        r"X",
        // extended year
        r"Y-?\d",
        // seasons 21-24
        r"(?:^|/)(?:Y-?\d+|-?\d{4})-2[1-4][?~%]?(?:/|$)",
        // negative year
        r"(?:^|/)-",
    ])
});

/// Panics on a pattern that does not compile; the tables are fixed.
fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid level pattern '{p}': {e}")))
        .collect()
}

/// Guess the conformance level of `input` without parsing it.
///
/// Checks Level 2 triggers first, then Level 1, defaulting to Level 0.
///
/// # Examples
///
/// ```
/// use edtf_engine::{detect_level, Level};
///
/// assert_eq!(detect_level("1985-04-12"), Level::Zero);
/// assert_eq!(detect_level("1984?"), Level::One);
/// assert_eq!(detect_level("[1667,1668]"), Level::Two);
/// ```
pub fn detect_level(input: &str) -> Level {
    let level = if has_level2_features(input) {
        Level::Two
    } else if has_level1_features(input) {
        Level::One
    } else {
        Level::Zero
    };
    debug!(input, %level, "detected EDTF level");
    level
}

fn has_level2_features(input: &str) -> bool {
    LEVEL2_PATTERNS.iter().any(|re| re.is_match(input))
}

/// Level 1 markers: qualifiers, placeholders, extended or negative years,
/// seasons 21-24, and open or unknown interval sides.
fn has_level1_features(input: &str) -> bool {
    LEVEL1_PATTERNS.iter().any(|re| re.is_match(input)) || has_open_or_unknown_side(input)
}

fn has_open_or_unknown_side(input: &str) -> bool {
    match input.split_once('/') {
        Some((start, end)) => [start, end]
            .iter()
            .any(|side| matches!(side.trim(), "" | "..")),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert_eq!(LEVEL2_PATTERNS.len(), 8);
        assert_eq!(LEVEL1_PATTERNS.len(), 5);
    }

    #[test]
    #[should_panic(expected = "invalid level pattern '(?:'")]
    fn test_broken_pattern_panics() {
        compile(&[r"\d", "(?:"]);
    }

    #[test]
    fn test_level0_inputs() {
        let inputs = [
            "1985",
            "1985-04",
            "1985-04-12",
            "1985-04-12T23:20:30Z",
            "1964/2008",
            "2004-06-24",
        ];
        for input in inputs {
            assert_eq!(detect_level(input), Level::Zero, "{input}");
        }
    }

    #[test]
    fn test_level1_inputs() {
        for input in [
            "1984?", "2004-06~", "201X", "1985-XX-XX", "Y170000002", "-1985", "2001-21",
            "1985/..", "../1985", "1985/", "/1985", "2001-24~",
        ] {
            assert_eq!(detect_level(input), Level::One, "{input}");
        }
    }

    #[test]
    fn test_level2_inputs() {
        for input in [
            "[1667,1668]", "{1667,1668}", "Y-17E7", "1950S2", "2001-33", "2004?-06-11",
            "2004-?06", "?2004", "156X-12-25", "1XXX", "XXXX", "1985-1X", "2004-06-11/2004-?07",
        ] {
            assert_eq!(detect_level(input), Level::Two, "{input}");
        }
    }
}
