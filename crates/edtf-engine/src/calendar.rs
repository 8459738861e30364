//! Proleptic Gregorian calendar arithmetic on arbitrary-precision years.
//!
//! EDTF admits years such as `Y-17E7`, far outside what `chrono` or any
//! 64-bit timestamp can hold, so every day count and millisecond instant in
//! this module is a [`BigInt`]. Conversion to `chrono` is offered only as an
//! explicitly lossy helper ([`millis_to_datetime`]).

use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Whether `year` is a leap year in the proleptic Gregorian calendar.
///
/// Year 0 (1 BCE) is a leap year; negative years follow the same rule.
pub fn is_leap_year(year: &BigInt) -> bool {
    let divisible = |n: u32| year.mod_floor(&BigInt::from(n)).is_zero();
    divisible(4) && (!divisible(100) || divisible(400))
}

/// Number of days in `month` (1-12) of `year`. Returns 0 for an invalid month.
pub fn days_in_month(year: &BigInt, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Whether `year-month-day` names a real calendar day.
pub fn is_valid_date(year: &BigInt, month: u32, day: u32) -> bool {
    (1..=12).contains(&month) && day >= 1 && day <= days_in_month(year, month)
}

/// Days from 1970-01-01 to `year-month-day` (negative before the epoch).
///
/// Uses the era-based civil-from-days inversion: shifting the year to start
/// in March puts the leap day last, so each 400-year era has a fixed length.
pub fn days_from_civil(year: &BigInt, month: u32, day: u32) -> BigInt {
    let y = if month <= 2 { year - 1u32 } else { year.clone() };
    let (era, yoe) = y.div_mod_floor(&BigInt::from(400));
    // yoe is in [0, 399]
    let yoe = yoe.to_i64().unwrap_or_default();
    let m = i64::from(month);
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097i64 + doe - 719_468i64
}

/// Millisecond instant of `year-month-day` at 00:00:00.000 UTC.
pub fn day_start_millis(year: &BigInt, month: u32, day: u32) -> BigInt {
    days_from_civil(year, month, day) * MILLIS_PER_DAY
}

/// Last millisecond of `year-month-day`.
pub fn day_end_millis(year: &BigInt, month: u32, day: u32) -> BigInt {
    day_start_millis(year, month, day) + (MILLIS_PER_DAY - 1)
}

/// First millisecond of `month` in `year`.
pub fn month_start_millis(year: &BigInt, month: u32) -> BigInt {
    day_start_millis(year, month, 1)
}

/// Last millisecond of `month` in `year`.
pub fn month_end_millis(year: &BigInt, month: u32) -> BigInt {
    day_end_millis(year, month, days_in_month(year, month))
}

/// First millisecond of `year`.
pub fn year_start_millis(year: &BigInt) -> BigInt {
    day_start_millis(year, 1, 1)
}

/// Last millisecond of `year`.
pub fn year_end_millis(year: &BigInt) -> BigInt {
    year_start_millis(&(year + 1u32)) - 1i64
}

/// The calendar day following `year-month-day`.
pub fn next_day(year: &BigInt, month: u32, day: u32) -> (BigInt, u32, u32) {
    if day < days_in_month(year, month) {
        (year.clone(), month, day + 1)
    } else if month < 12 {
        (year.clone(), month + 1, 1)
    } else {
        (year + 1u32, 1, 1)
    }
}

/// The month following `year-month`.
pub fn next_month(year: &BigInt, month: u32) -> (BigInt, u32) {
    if month < 12 {
        (year.clone(), month + 1)
    } else {
        (year + 1u32, 1)
    }
}

/// Lossy conversion of a millisecond instant to `chrono`.
///
/// Returns `None` when the instant lies outside chrono's representable range.
pub fn millis_to_datetime(millis: &BigInt) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis.to_i64()?)
}
