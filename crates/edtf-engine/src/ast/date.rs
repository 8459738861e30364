//! Date, DateTime and Season nodes.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::{Serialize, Serializer};

use super::{Level, PartialQualification, Precision, Qualification};
use crate::calendar;
use crate::season;

/// Placeholder for an unspecified digit.
pub const MASK: char = 'X';

// ── Component values ────────────────────────────────────────────────────────

/// A year: a concrete (possibly huge) integer, or four digits some of which
/// are `X`, with an optional leading `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum YearValue {
    Known(BigInt),
    Masked(String),
}

impl YearValue {
    pub fn known(&self) -> Option<&BigInt> {
        match self {
            YearValue::Known(v) => Some(v),
            YearValue::Masked(_) => None,
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(self, YearValue::Masked(_))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            YearValue::Known(v) => v.is_negative(),
            YearValue::Masked(p) => p.starts_with('-'),
        }
    }

    /// Whether the year needs the `Y` prefix (more than four digits).
    pub fn is_extended(&self) -> bool {
        match self {
            YearValue::Known(v) => v.abs() > BigInt::from(9999),
            YearValue::Masked(_) => false,
        }
    }

    /// Digit positions (0-based, sign excluded) holding a placeholder.
    pub fn mask_positions(&self) -> Vec<usize> {
        match self {
            YearValue::Known(_) => Vec::new(),
            YearValue::Masked(p) => mask_positions(p.trim_start_matches('-')),
        }
    }

    /// Every concrete year this value can stand for, ascending.
    pub fn candidates(&self) -> Vec<BigInt> {
        match self {
            YearValue::Known(v) => vec![v.clone()],
            YearValue::Masked(p) => {
                let negative = p.starts_with('-');
                let digits = p.trim_start_matches('-');
                let mut years: Vec<BigInt> = expand_mask(digits)
                    .into_iter()
                    .map(|n| {
                        let n = BigInt::from(n);
                        if negative {
                            -n
                        } else {
                            n
                        }
                    })
                    .collect();
                years.sort();
                years.dedup();
                years
            }
        }
    }
}

impl Serialize for YearValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearValue::Known(v) => crate::bignum::serialize(v, serializer),
            YearValue::Masked(p) => serializer.serialize_str(p),
        }
    }
}

/// A two-digit month or day, concrete or with `X` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartValue {
    Known(u32),
    Masked(String),
}

impl PartValue {
    pub fn known(&self) -> Option<u32> {
        match self {
            PartValue::Known(v) => Some(*v),
            PartValue::Masked(_) => None,
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(self, PartValue::Masked(_))
    }

    /// Every placeholder position is masked (`XX`).
    pub fn is_fully_masked(&self) -> bool {
        match self {
            PartValue::Known(_) => false,
            PartValue::Masked(p) => p.chars().all(|c| c == MASK),
        }
    }

    pub fn mask_positions(&self) -> Vec<usize> {
        match self {
            PartValue::Known(_) => Vec::new(),
            PartValue::Masked(p) => mask_positions(p),
        }
    }

    /// Values within `range` this component can stand for, ascending.
    pub fn candidates(&self, range: std::ops::RangeInclusive<u32>) -> Vec<u32> {
        match self {
            PartValue::Known(v) => range.filter(|n| n == v).collect(),
            PartValue::Masked(p) => range.filter(|n| matches_mask(p, *n)).collect(),
        }
    }
}

impl fmt::Display for PartValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartValue::Known(v) => write!(f, "{v:02}"),
            PartValue::Masked(p) => f.write_str(p),
        }
    }
}

impl Serialize for PartValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PartValue::Known(v) => serializer.serialize_u32(*v),
            PartValue::Masked(p) => serializer.serialize_str(p),
        }
    }
}

fn mask_positions(digits: &str) -> Vec<usize> {
    digits
        .chars()
        .enumerate()
        .filter(|(_, c)| *c == MASK)
        .map(|(i, _)| i)
        .collect()
}

fn matches_mask(pattern: &str, value: u32) -> bool {
    let digits = format!("{value:0width$}", width = pattern.len());
    digits.len() == pattern.len()
        && pattern
            .chars()
            .zip(digits.chars())
            .all(|(p, d)| p == MASK || p == d)
}

/// All non-negative integers matching a digit pattern with `X` placeholders.
fn expand_mask(pattern: &str) -> Vec<u64> {
    let mut values = vec![0u64];
    for c in pattern.chars() {
        let digits: Vec<u64> = match c.to_digit(10) {
            Some(d) => vec![u64::from(d)],
            None => (0..10).collect(),
        };
        values = values
            .iter()
            .flat_map(|v| digits.iter().map(move |d| v * 10 + d))
            .collect();
    }
    values
}

/// Which digit positions of each component were given as `X`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct UnspecifiedDigits {
    pub year: Vec<usize>,
    pub month: Vec<usize>,
    pub day: Vec<usize>,
}

impl UnspecifiedDigits {
    /// The mask record for the given components, or `None` when nothing is masked.
    pub fn scan(
        year: &YearValue,
        month: Option<&PartValue>,
        day: Option<&PartValue>,
    ) -> Option<UnspecifiedDigits> {
        let record = UnspecifiedDigits {
            year: year.mask_positions(),
            month: month.map(PartValue::mask_positions).unwrap_or_default(),
            day: day.map(PartValue::mask_positions).unwrap_or_default(),
        };
        (!record.is_empty()).then_some(record)
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_empty() && self.month.is_empty() && self.day.is_empty()
    }
}

// ── DatePoint ───────────────────────────────────────────────────────────────

/// One concrete resolution of a date at its own precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatePoint {
    pub year: BigInt,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DatePoint {
    pub fn start_millis(&self) -> BigInt {
        match (self.month, self.day) {
            (Some(m), Some(d)) => calendar::day_start_millis(&self.year, m, d),
            (Some(m), None) => calendar::month_start_millis(&self.year, m),
            _ => calendar::year_start_millis(&self.year),
        }
    }

    pub fn end_millis(&self) -> BigInt {
        match (self.month, self.day) {
            (Some(m), Some(d)) => calendar::day_end_millis(&self.year, m, d),
            (Some(m), None) => calendar::month_end_millis(&self.year, m),
            _ => calendar::year_end_millis(&self.year),
        }
    }

    pub fn precision(&self) -> Precision {
        match (self.month, self.day) {
            (Some(_), Some(_)) => Precision::Day,
            (Some(_), None) => Precision::Month,
            _ => Precision::Year,
        }
    }
}

// ── Date ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Date {
    pub year: YearValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<PartValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<PartValue>,
    /// Whole-value qualifier, e.g. `1984?`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<Qualification>,
    /// Per-component qualifiers, e.g. `2004-?06-11`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<PartialQualification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unspecified: Option<UnspecifiedDigits>,
    /// Power-of-ten exponent of a `Y17E7` style year. `year` already holds
    /// the multiplied value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponential: Option<u32>,
    /// Significant-digits hint (`1950S2`); does not change the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant_digits: Option<u32>,
}

impl Date {
    pub fn new(year: YearValue, month: Option<PartValue>, day: Option<PartValue>) -> Self {
        let unspecified = UnspecifiedDigits::scan(&year, month.as_ref(), day.as_ref());
        Self {
            year,
            month,
            day,
            qualification: None,
            partial: None,
            unspecified,
            exponential: None,
            significant_digits: None,
        }
    }

    pub fn from_year(year: BigInt) -> Self {
        Self::new(YearValue::Known(year), None, None)
    }

    pub fn from_ym(year: BigInt, month: u32) -> Self {
        Self::new(YearValue::Known(year), Some(PartValue::Known(month)), None)
    }

    pub fn from_ymd(year: BigInt, month: u32, day: u32) -> Self {
        Self::new(
            YearValue::Known(year),
            Some(PartValue::Known(month)),
            Some(PartValue::Known(day)),
        )
    }

    pub fn with_qualification(mut self, qualification: Qualification) -> Self {
        self.qualification = Some(qualification);
        self
    }

    pub fn precision(&self) -> Precision {
        if self.day.is_some() {
            Precision::Day
        } else if self.month.is_some() {
            Precision::Month
        } else {
            Precision::Year
        }
    }

    pub fn is_masked(&self) -> bool {
        self.year.is_masked()
            || self.month.as_ref().is_some_and(PartValue::is_masked)
            || self.day.as_ref().is_some_and(PartValue::is_masked)
    }

    pub fn has_partial_qualification(&self) -> bool {
        self.partial.is_some_and(|p| !p.is_empty())
    }

    /// A plain calendar date: no placeholders and no qualifiers of any kind.
    pub fn is_plain(&self) -> bool {
        !self.is_masked() && self.qualification.is_none() && !self.has_partial_qualification()
    }

    pub fn level(&self) -> Level {
        if self.exponential.is_some()
            || self.significant_digits.is_some()
            || self.has_partial_qualification()
            || !self.masks_read_right_to_left()
        {
            return Level::Two;
        }
        if self.qualification.is_some()
            || self.is_masked()
            || self.year.is_negative()
            || self.year.is_extended()
        {
            return Level::One;
        }
        Level::Zero
    }

    /// Level 1 placeholders: at most the last two year digits, whole `XX`
    /// months or days, and nothing concrete to the right of a placeholder.
    fn masks_read_right_to_left(&self) -> bool {
        let mut masked_seen = match &self.year {
            YearValue::Known(_) => false,
            YearValue::Masked(p) => {
                let digits = p.trim_start_matches('-');
                let trailing = digits.chars().rev().take_while(|c| *c == MASK).count();
                let total = digits.chars().filter(|c| *c == MASK).count();
                if trailing != total || total > 2 {
                    return false;
                }
                true
            }
        };
        for part in [self.month.as_ref(), self.day.as_ref()].into_iter().flatten() {
            match part {
                PartValue::Known(_) if masked_seen => return false,
                PartValue::Known(_) => {}
                PartValue::Masked(_) if !part.is_fully_masked() => return false,
                PartValue::Masked(_) => masked_seen = true,
            }
        }
        true
    }

    /// The earliest and latest concrete resolutions of this date, or `None`
    /// when no combination of its placeholders yields a real calendar date.
    pub fn extremes(&self) -> Option<(DatePoint, DatePoint)> {
        let years = self.year.candidates();
        let months = self.month.as_ref().map(|m| m.candidates(1..=12));
        let days = self.day.as_ref().map(|d| d.candidates(1..=31));
        if years.is_empty()
            || months.as_ref().is_some_and(Vec::is_empty)
            || days.as_ref().is_some_and(Vec::is_empty)
        {
            return None;
        }
        let earliest = first_valid(years.iter(), months.clone(), days.clone())?;
        let reversed = |v: Option<Vec<u32>>| {
            v.map(|mut v| {
                v.reverse();
                v
            })
        };
        let latest = first_valid(years.iter().rev(), reversed(months), reversed(days))?;
        Some((earliest, latest))
    }
}

fn first_valid<'a>(
    years: impl Iterator<Item = &'a BigInt>,
    months: Option<Vec<u32>>,
    days: Option<Vec<u32>>,
) -> Option<DatePoint> {
    for year in years {
        let Some(months) = months.as_ref() else {
            return Some(DatePoint {
                year: year.clone(),
                month: None,
                day: None,
            });
        };
        for &month in months {
            let Some(days) = days.as_ref() else {
                return Some(DatePoint {
                    year: year.clone(),
                    month: Some(month),
                    day: None,
                });
            };
            let limit = calendar::days_in_month(year, month);
            if let Some(&day) = days.iter().find(|d| **d <= limit) {
                return Some(DatePoint {
                    year: year.clone(),
                    month: Some(month),
                    day: Some(day),
                });
            }
        }
    }
    None
}

/// Render a concrete year in canonical form: four digits with sign, a `Y`
/// prefix beyond four digits, and the exponential / significant-digit suffixes.
pub(crate) fn write_year(
    f: &mut fmt::Formatter<'_>,
    year: &BigInt,
    exponential: Option<u32>,
    significant_digits: Option<u32>,
) -> fmt::Result {
    match exponential {
        Some(e) => {
            let mantissa = year / num_traits::pow(BigInt::from(10), e as usize);
            write!(f, "Y{mantissa}E{e}")?;
        }
        None if year.abs() > BigInt::from(9999) => write!(f, "Y{year}")?,
        None if year.is_negative() => write!(f, "-{:04}", year.abs())?,
        None => write!(f, "{year:04}")?,
    }
    if let Some(s) = significant_digits {
        write!(f, "S{s}")?;
    }
    Ok(())
}

fn write_symbol(f: &mut fmt::Formatter<'_>, q: Option<Qualification>) -> fmt::Result {
    match q.and_then(|q| q.symbol()) {
        Some(c) => write!(f, "{c}"),
        None => Ok(()),
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let partial = self.partial.unwrap_or_default();
        if self.month.is_none() {
            // a lone year has no component boundary, so its partial
            // qualifier can only be written in front
            write_symbol(f, partial.year)?;
        }
        match &self.year {
            YearValue::Known(v) => write_year(f, v, self.exponential, self.significant_digits)?,
            YearValue::Masked(p) => f.write_str(p)?,
        }
        if let Some(month) = &self.month {
            write_symbol(f, partial.year)?;
            f.write_str("-")?;
            write_symbol(f, partial.month)?;
            write!(f, "{month}")?;
        }
        if let Some(day) = &self.day {
            f.write_str("-")?;
            write_symbol(f, partial.day)?;
            write!(f, "{day}")?;
        }
        write_symbol(f, self.qualification)
    }
}

// ── DateTime ────────────────────────────────────────────────────────────────

/// A calendar date with time of day. Always fully specified and unqualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<u32>,
    /// Offset tag as written: `Z`, `+05:30`, `-04`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl DateTime {
    pub fn level(&self) -> Level {
        if self.year < 0 {
            Level::One
        } else {
            Level::Zero
        }
    }

    pub fn precision(&self) -> Precision {
        if self.second.is_some() {
            Precision::Second
        } else {
            Precision::Minute
        }
    }

    /// First millisecond of the minute this value falls in. The offset tag
    /// is not applied.
    pub fn minute_start_millis(&self) -> BigInt {
        calendar::day_start_millis(&BigInt::from(self.year), self.month, self.day)
            + i64::from(self.hour) * calendar::MILLIS_PER_HOUR
            + i64::from(self.minute) * calendar::MILLIS_PER_MINUTE
    }

    /// Conversion to chrono's naive representation.
    pub fn to_naive(&self) -> Option<chrono::NaiveDateTime> {
        chrono::NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
            self.hour,
            self.minute,
            self.second.unwrap_or(0),
        )
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}", self.year.unsigned_abs())?;
        } else {
            write!(f, "{:04}", self.year)?;
        }
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}",
            self.month, self.day, self.hour, self.minute
        )?;
        if let Some(second) = self.second {
            write!(f, ":{second:02}")?;
        }
        if let Some(tz) = &self.timezone {
            f.write_str(tz)?;
        }
        Ok(())
    }
}

// ── Season ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    #[serde(serialize_with = "crate::bignum::serialize")]
    pub year: BigInt,
    /// Season code, 21-41.
    pub season: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<Qualification>,
}

impl Season {
    pub fn new(year: BigInt, season: u32) -> Self {
        Self {
            year,
            season,
            qualification: None,
        }
    }

    pub fn level(&self) -> Level {
        let base = season::season_level(self.season).unwrap_or(Level::Two);
        let qualified = self.qualification.is_some()
            || self.year.is_negative()
            || self.year.abs() > BigInt::from(9999);
        if qualified {
            base.max(Level::One)
        } else {
            base
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        season::season_name(self.season)
    }

    /// The year as `i64`, when it fits.
    pub fn year_i64(&self) -> Option<i64> {
        self.year.to_i64()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_year(f, &self.year, None, None)?;
        write!(f, "-{:02}", self.season)?;
        write_symbol(f, self.qualification)
    }
}
