//! Grammar of a single calendar value (date, date-time or season).
//!
//! One scanner serves every level. Syntax that only exists at a higher level
//! is either refused as it is read (leading qualifiers, season codes) or
//! caught afterwards by comparing the node's own level with the level being
//! parsed.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::cursor::Cursor;
use crate::ast::{
    Atom, Date, DateTime, Level, PartValue, PartialQualification, Qualification, Season, YearValue,
};
use crate::error::{ErrorCode, ParseError, Span};
use crate::season;

/// Largest accepted power-of-ten exponent on a `Y` year.
pub const MAX_EXPONENT: u32 = 1_000;

struct YearToken {
    value: YearValue,
    exponential: Option<u32>,
    significant_digits: Option<u32>,
    /// Written with the `Y` prefix.
    prefixed: bool,
}

/// Parse the whole of `input` as one value at `level`.
pub(crate) fn parse_atom(input: &str, offset: usize, level: Level) -> Result<Atom, ParseError> {
    let mut parser = AtomParser {
        cur: Cursor::new(input, offset),
        level,
    };
    let atom = parser.atom()?;
    let required = atom.level();
    if required > level {
        return Err(super::above_level(input, required, level).at(parser.cur.full_span()));
    }
    Ok(atom)
}

struct AtomParser<'a> {
    cur: Cursor<'a>,
    level: Level,
}

impl AtomParser<'_> {
    fn atom(&mut self) -> Result<Atom, ParseError> {
        if self.cur.is_eof() {
            return Err(self.cur.error("expected a date"));
        }
        let lead_start = self.cur.pos();
        let lead = self.qualifier();
        if lead.is_some() && self.level < Level::Two {
            return Err(ParseError::format("a leading qualifier requires EDTF Level 2")
                .at(self.cur.span_from(lead_start))
                .with_suggestion("put the qualifier at the end of the value"));
        }

        let year = self.year()?;
        let year_q = self.qualifier();
        if !self.cur.eat(b'-') {
            let whole = self.single(lead, year_q)?;
            self.expect_end()?;
            return self.date(year, None, None, whole, PartialQualification::default());
        }

        let month_start = self.cur.pos();
        let month_q = self.qualifier();
        let month = self.two_digits("month")?;
        let month_span = self.cur.span_from(month_start);
        let after_month_q = self.qualifier();

        if let PartValue::Known(code) = month {
            if code > 12 && self.cur.peek() != Some(b'-') {
                if month_q.is_some() || year_q.is_some() {
                    return Err(ParseError::format("a season takes only a whole-value qualifier")
                        .at(month_span));
                }
                let whole = self.single(lead, after_month_q)?;
                self.expect_end()?;
                return self.season(year, code, whole, month_span);
            }
        }

        let mut partial = PartialQualification {
            year: self.single(lead, year_q)?,
            month: month_q,
            day: None,
        };
        let (day, whole) = if self.cur.eat(b'-') {
            partial.month = self.single(month_q, after_month_q)?;
            let day_start = self.cur.pos();
            partial.day = self.qualifier();
            let day = self.two_digits("day")?;
            check_range(&day, 31, "day", self.cur.span_from(day_start))?;
            (Some(day), self.qualifier())
        } else {
            (None, after_month_q)
        };
        check_range(&month, 12, "month", month_span)?;

        if self.cur.peek() == Some(b'T') {
            let Some(day) = day else {
                return Err(self.cur.error("a time of day needs a complete date"));
            };
            return self.date_time(year, month, day, partial, whole);
        }
        self.expect_end()?;
        self.date(year, Some(month), day, whole, partial)
    }

    // ── components ──────────────────────────────────────────────────────

    fn year(&mut self) -> Result<YearToken, ParseError> {
        let start = self.cur.pos();
        if self.cur.eat(b'Y') {
            self.require_level1("the 'Y' year prefix", start)?;
            let negative = self.cur.eat(b'-');
            let digits = self.cur.take_while(|b| b.is_ascii_digit());
            if digits.is_empty() {
                return Err(self.cur.error("expected digits after 'Y'"));
            }
            let mut value = decimal(digits);
            let exponential = if self.cur.eat(b'E') {
                Some(self.number("exponent")?)
            } else {
                None
            };
            match exponential {
                Some(e) if e > MAX_EXPONENT => {
                    return Err(ParseError::format(format!("exponent {e} is too large"))
                        .at(self.cur.span_from(start)));
                }
                Some(e) => value *= num_traits::pow(BigInt::from(10), e as usize),
                None if digits.len() <= 4 => {
                    let sign = if negative { "-" } else { "" };
                    return Err(ParseError::format(
                        "the 'Y' prefix is for years of more than four digits",
                    )
                    .at(self.cur.span_from(start))
                    .with_suggestion(format!("write {sign}{digits:0>4}")));
                }
                None => {}
            }
            if negative {
                value = -value;
            }
            let significant_digits = self.significant()?;
            return Ok(YearToken {
                value: YearValue::Known(value),
                exponential,
                significant_digits,
                prefixed: true,
            });
        }

        let negative = self.cur.eat(b'-');
        if negative {
            self.require_level1("a negative year", start)?;
        }
        let body = self.cur.take_while(|b| b.is_ascii_digit() || b == b'X');
        let sign = if negative { "-" } else { "" };
        if body.len() > 4 {
            return Err(
                ParseError::format("years of more than four digits need the 'Y' prefix")
                    .at(self.cur.span_from(start))
                    .with_suggestion(format!("write Y{sign}{body}")),
            );
        }
        if body.len() < 4 {
            return Err(
                ParseError::format("expected a four-digit year").at(self.cur.span_from(start))
            );
        }
        let significant_digits = self.significant()?;
        let value = if body.contains('X') {
            if significant_digits.is_some() {
                return Err(ParseError::format("significant digits need a fully specified year")
                    .at(self.cur.span_from(start)));
            }
            YearValue::Masked(format!("{sign}{body}"))
        } else {
            let n = decimal(body);
            YearValue::Known(if negative { -n } else { n })
        };
        Ok(YearToken {
            value,
            exponential: None,
            significant_digits,
            prefixed: false,
        })
    }

    fn require_level1(&self, what: &str, start: usize) -> Result<(), ParseError> {
        if self.level >= Level::One {
            return Ok(());
        }
        Err(ParseError::format(format!("{what} requires EDTF Level 1"))
            .at(self.cur.span_from(start))
            .with_suggestion("parse at Level 1, or omit the level to detect it"))
    }

    fn significant(&mut self) -> Result<Option<u32>, ParseError> {
        if self.cur.eat(b'S') {
            self.number("significant digits").map(Some)
        } else {
            Ok(None)
        }
    }

    fn number(&mut self, what: &str) -> Result<u32, ParseError> {
        let start = self.cur.pos();
        let digits = self.cur.take_while(|b| b.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.cur.error(format!("expected {what}")));
        }
        digits.parse().map_err(|_| {
            ParseError::format(format!("{what} value is too large")).at(self.cur.span_from(start))
        })
    }

    fn two_digits(&mut self, what: &str) -> Result<PartValue, ParseError> {
        let start = self.cur.pos();
        let text = self.cur.take_while(|b| b.is_ascii_digit() || b == b'X');
        if text.len() != 2 {
            return Err(ParseError::format(format!("expected a two-digit {what}"))
                .at(self.cur.span_from(start)));
        }
        Ok(if text.contains('X') {
            PartValue::Masked(text.to_string())
        } else {
            PartValue::Known(small(text))
        })
    }

    fn fixed(&mut self, what: &str) -> Result<u32, ParseError> {
        let start = self.cur.pos();
        let digits = self.cur.take_while(|b| b.is_ascii_digit());
        if digits.len() != 2 {
            return Err(ParseError::format(format!("expected two-digit {what}"))
                .at(self.cur.span_from(start)));
        }
        Ok(small(digits))
    }

    /// Exactly two digits; any digits after them are left in place.
    fn leading_pair(&mut self, what: &str) -> Result<u32, ParseError> {
        let start = self.cur.pos();
        let mut value = 0;
        for _ in 0..2 {
            match self.cur.peek() {
                Some(b) if b.is_ascii_digit() => {
                    self.cur.bump();
                    value = value * 10 + u32::from(b - b'0');
                }
                _ => {
                    return Err(ParseError::format(format!("expected two-digit {what}"))
                        .at(self.cur.span_from(start)));
                }
            }
        }
        Ok(value)
    }

    fn qualifier(&mut self) -> Option<Qualification> {
        let q = Qualification::from_symbol(char::from(self.cur.peek()?))?;
        self.cur.bump();
        Some(q)
    }

    fn single(
        &self,
        a: Option<Qualification>,
        b: Option<Qualification>,
    ) -> Result<Option<Qualification>, ParseError> {
        match (a, b) {
            (Some(_), Some(_)) => Err(ParseError::format("a component takes only one qualifier")
                .at(self.cur.span_here())
                .with_suggestion("use '%' for uncertain and approximate")),
            (a, b) => Ok(a.or(b)),
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.cur.is_eof() {
            Ok(())
        } else {
            Err(self.cur.unexpected())
        }
    }

    // ── nodes ───────────────────────────────────────────────────────────

    fn date(
        &self,
        year: YearToken,
        month: Option<PartValue>,
        day: Option<PartValue>,
        whole: Option<Qualification>,
        partial: PartialQualification,
    ) -> Result<Atom, ParseError> {
        let mut date = Date::new(year.value, month, day);
        date.qualification = whole;
        date.partial = (!partial.is_empty()).then_some(partial);
        date.exponential = year.exponential;
        date.significant_digits = year.significant_digits;
        if date.extremes().is_none() {
            return Err(ParseError::new(
                ErrorCode::InvalidDate,
                format!("'{}' does not name a calendar date", self.cur.input()),
            )
            .at(self.cur.full_span()));
        }
        Ok(Atom::Date(date))
    }

    fn season(
        &self,
        year: YearToken,
        code: u32,
        qualification: Option<Qualification>,
        span: Span,
    ) -> Result<Atom, ParseError> {
        let Some(required) = season::season_level(code) else {
            let error = if code < season::FIRST_SEASON {
                ParseError::new(ErrorCode::InvalidDate, format!("month {code} is out of range"))
            } else {
                ParseError::new(
                    ErrorCode::InvalidSeason,
                    format!("{code} is not a season code (21-41)"),
                )
            };
            return Err(error.at(span));
        };
        if required > self.level {
            return Err(ParseError::new(
                ErrorCode::InvalidSeason,
                format!("season {code} requires EDTF Level {required}"),
            )
            .at(span)
            .with_suggestion(format!("parse at Level {required}")));
        }
        let YearValue::Known(value) = year.value else {
            return Err(ParseError::format("a season needs a fully specified year").at(span));
        };
        if year.exponential.is_some() || year.significant_digits.is_some() {
            return Err(ParseError::format(
                "a season year cannot be exponential or carry significant digits",
            )
            .at(span));
        }
        Ok(Atom::Season(Season {
            year: value,
            season: code,
            qualification,
        }))
    }

    fn date_time(
        &mut self,
        year: YearToken,
        month: PartValue,
        day: PartValue,
        partial: PartialQualification,
        whole: Option<Qualification>,
    ) -> Result<Atom, ParseError> {
        let t_span = self.cur.span_here();
        self.cur.bump();
        if whole.is_some() || !partial.is_empty() {
            return Err(
                ParseError::format("a date with a time of day cannot be qualified").at(t_span)
            );
        }
        let (YearValue::Known(y), PartValue::Known(month), PartValue::Known(day)) =
            (&year.value, month, day)
        else {
            return Err(
                ParseError::format("a date with a time of day cannot have unspecified digits")
                    .at(t_span),
            );
        };
        let year_value = match y.to_i32() {
            Some(v) if !year.prefixed && year.significant_digits.is_none() => v,
            _ => {
                return Err(
                    ParseError::format("a date with a time of day needs a four-digit year")
                        .at(t_span),
                )
            }
        };

        let hour = self.fixed("hour")?;
        if !self.cur.eat(b':') {
            return Err(self.cur.error("expected ':' after the hour"));
        }
        let minute = self.fixed("minute")?;
        let second = if self.cur.eat(b':') {
            Some(self.fixed("second")?)
        } else {
            None
        };
        let timezone = self.timezone()?;
        self.expect_end()?;

        let valid = chrono::NaiveDate::from_ymd_opt(year_value, month, day).is_some()
            && chrono::NaiveTime::from_hms_opt(hour, minute, second.unwrap_or(0)).is_some();
        if !valid {
            return Err(ParseError::new(
                ErrorCode::InvalidDate,
                format!("'{}' is not a valid date and time", self.cur.input()),
            )
            .at(self.cur.full_span()));
        }
        Ok(Atom::DateTime(DateTime {
            year: year_value,
            month,
            day,
            hour,
            minute,
            second,
            timezone,
        }))
    }

    fn timezone(&mut self) -> Result<Option<String>, ParseError> {
        let start = self.cur.pos();
        match self.cur.peek() {
            Some(b'Z') => {
                self.cur.bump();
                Ok(Some("Z".to_string()))
            }
            Some(b'+' | b'-') => {
                self.cur.bump();
                let hours = self.leading_pair("offset hours")?;
                let colon = self.cur.eat(b':');
                let minutes = if colon || self.cur.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.fixed("offset minutes")?
                } else {
                    0
                };
                if hours > 23 || minutes > 59 {
                    return Err(ParseError::new(
                        ErrorCode::InvalidDate,
                        format!("'{}' is not a valid UTC offset", self.cur.slice(start)),
                    )
                    .at(self.cur.span_from(start)));
                }
                Ok(Some(self.cur.slice(start).to_string()))
            }
            _ => Ok(None),
        }
    }
}

fn check_range(value: &PartValue, max: u32, what: &str, span: Span) -> Result<(), ParseError> {
    match value.known() {
        Some(v) if v == 0 || v > max => Err(ParseError::new(
            ErrorCode::InvalidDate,
            format!("{what} {v:02} is out of range"),
        )
        .at(span)),
        _ => Ok(()),
    }
}

/// Value of an ASCII digit string.
fn decimal(digits: &str) -> BigInt {
    digits
        .bytes()
        .fold(BigInt::from(0), |acc, b| acc * 10u32 + u32::from(b - b'0'))
}

/// Value of a one- or two-digit ASCII string.
fn small(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(input: &str) -> Atom {
        parse_atom(input, 0, Level::Two).unwrap_or_else(|e| panic!("{input}: {e}"))
    }

    fn err(input: &str, level: Level) -> ParseError {
        parse_atom(input, 0, level).expect_err(input)
    }

    fn date(input: &str) -> Date {
        match ok(input) {
            Atom::Date(d) => d,
            other => panic!("{input} parsed as {other:?}"),
        }
    }

    // ── dates ───────────────────────────────────────────────────────────

    #[test]
    fn test_plain_dates() {
        let d = date("1985-04-12");
        assert_eq!(d.year, YearValue::Known(BigInt::from(1985)));
        assert_eq!(d.month, Some(PartValue::Known(4)));
        assert_eq!(d.day, Some(PartValue::Known(12)));
        assert!(d.qualification.is_none() && d.partial.is_none() && d.unspecified.is_none());
        assert_eq!(date("-0044").year, YearValue::Known(BigInt::from(-44)));
    }

    #[test]
    fn test_whole_qualifiers() {
        assert_eq!(date("1984?").qualification, Some(Qualification::UNCERTAIN));
        assert_eq!(date("2004-06~").qualification, Some(Qualification::APPROXIMATE));
        assert_eq!(date("2004-06-11%").qualification, Some(Qualification::UNCERTAIN_APPROXIMATE));
        // a leading qualifier on a lone year covers the whole value
        assert_eq!(date("?1984").qualification, Some(Qualification::UNCERTAIN));
    }

    #[test]
    fn test_partial_qualifiers() {
        let d = date("2004?-06-~11");
        let partial = d.partial.unwrap();
        assert_eq!(partial.year, Some(Qualification::UNCERTAIN));
        assert_eq!(partial.month, None);
        assert_eq!(partial.day, Some(Qualification::APPROXIMATE));
        assert!(d.qualification.is_none());

        assert_eq!(date("2004-?06").partial.unwrap().month, Some(Qualification::UNCERTAIN));
        assert_eq!(
            date("2004-06%-11").partial.unwrap().month,
            Some(Qualification::UNCERTAIN_APPROXIMATE)
        );
        assert_eq!(date("?2004-06").partial.unwrap().year, Some(Qualification::UNCERTAIN));
    }

    #[test]
    fn test_masked_dates() {
        let d = date("198X");
        assert_eq!(d.year, YearValue::Masked("198X".into()));
        assert_eq!(d.unspecified.unwrap().year, vec![3]);
        let d = date("1985-XX-XX");
        assert_eq!(d.month, Some(PartValue::Masked("XX".into())));
        assert_eq!(date("156X-12-25").level(), Level::Two);
        assert_eq!(date("-XXXX").year, YearValue::Masked("-XXXX".into()));
    }

    #[test]
    fn test_extended_years() {
        assert_eq!(date("Y170000002").year, YearValue::Known(BigInt::from(170_000_002)));
        let d = date("Y-17E7");
        assert_eq!(d.year, YearValue::Known(BigInt::from(-170_000_000)));
        assert_eq!(d.exponential, Some(7));
        let d = date("1950S2");
        assert_eq!(d.significant_digits, Some(2));
        assert_eq!(d.year, YearValue::Known(BigInt::from(1950)));
        assert_eq!(date("Y3388E2S3").significant_digits, Some(3));
    }

    // ── seasons and times ───────────────────────────────────────────────

    #[test]
    fn test_seasons() {
        let Atom::Season(s) = ok("2001-21") else { panic!("not a season") };
        assert_eq!((s.season, s.qualification), (21, None));
        let Atom::Season(s) = ok("2001-24~") else { panic!("not a season") };
        assert_eq!(s.qualification, Some(Qualification::APPROXIMATE));
        assert!(matches!(ok("2001-33"), Atom::Season(_)));
    }

    #[test]
    fn test_date_times() {
        let Atom::DateTime(dt) = ok("1985-04-12T23:20:30Z") else { panic!("not a datetime") };
        assert_eq!((dt.hour, dt.minute, dt.second), (23, 20, Some(30)));
        assert_eq!(dt.timezone.as_deref(), Some("Z"));
        let Atom::DateTime(dt) = ok("2004-01-01T10:10-05:30") else { panic!("not a datetime") };
        assert_eq!(dt.second, None);
        assert_eq!(dt.timezone.as_deref(), Some("-05:30"));
    }

    #[test]
    fn test_offsets_without_colon() {
        let Atom::DateTime(dt) = ok("1985-04-12T10:00+0530") else { panic!("not a datetime") };
        assert_eq!(dt.timezone.as_deref(), Some("+0530"));
        assert_eq!(dt.to_string(), "1985-04-12T10:00+0530");
        let Atom::DateTime(dt) = ok("1985-04-12T10:00-04") else { panic!("not a datetime") };
        assert_eq!(dt.timezone.as_deref(), Some("-04"));

        for input in ["1985-04-12T10:00+5", "1985-04-12T10:00+053", "1985-04-12T10:00+05300"] {
            assert_eq!(err(input, Level::Two).code, ErrorCode::InvalidFormat, "{input}");
        }
        assert_eq!(err("1985-04-12T10:00+2400", Level::Two).code, ErrorCode::InvalidDate);
    }

    // ── errors ──────────────────────────────────────────────────────────

    #[test]
    fn test_calendar_errors() {
        assert_eq!(err("1985-13", Level::Two).code, ErrorCode::InvalidDate);
        assert_eq!(err("1985-00", Level::Two).code, ErrorCode::InvalidDate);
        assert_eq!(err("1985-04-31", Level::Two).code, ErrorCode::InvalidDate);
        assert_eq!(err("2023-02-29", Level::Two).code, ErrorCode::InvalidDate);
        assert_eq!(err("1985-2X", Level::Two).code, ErrorCode::InvalidDate);
        assert_eq!(err("1985-04-12T25:00", Level::Two).code, ErrorCode::InvalidDate);
    }

    #[test]
    fn test_season_errors() {
        assert_eq!(err("2001-42", Level::Two).code, ErrorCode::InvalidSeason);
        assert_eq!(err("2001-25", Level::One).code, ErrorCode::InvalidSeason);
        assert_eq!(err("2001-21", Level::Zero).code, ErrorCode::InvalidSeason);
    }

    #[test]
    fn test_format_errors() {
        let inputs = [
            "198", "19850", "1985-4", "1985-04-12T", "1985?~", "Y1985", "abc", "1985-04-12x",
        ];
        for input in inputs {
            assert_eq!(err(input, Level::Two).code, ErrorCode::InvalidFormat, "{input}");
        }
        let e = err("12345", Level::Two);
        assert_eq!(e.suggestion.as_deref(), Some("write Y12345"));
    }

    #[test]
    fn test_level_gating() {
        let e = err("1985?", Level::Zero);
        assert_eq!(e.code, ErrorCode::InvalidFormat);
        assert!(e.suggestion.is_some());
        assert!(parse_atom("1985?", 0, Level::One).is_ok());
        assert!(parse_atom("?1985", 0, Level::One).is_err());
        assert!(parse_atom("1XXX", 0, Level::One).is_err());
        assert!(parse_atom("-1985", 0, Level::Zero).is_err());
    }

    #[test]
    fn test_sign_and_prefix_need_level1() {
        // both have a Level 0 value once parsed, so the syntax itself is gated
        for input in ["-0000", "Y00001", "-0000-01-01T00:00"] {
            let e = err(input, Level::Zero);
            assert_eq!(e.code, ErrorCode::InvalidFormat, "{input}");
            assert!(e.message.contains("requires EDTF Level 1"), "{input}");
            assert!(parse_atom(input, 0, Level::One).is_ok(), "{input}");
        }
        assert_eq!(date("Y00001").year, YearValue::Known(BigInt::from(1)));
    }

    #[test]
    fn test_error_positions_are_offset() {
        let e = parse_atom("1985-13", 5, Level::Two).unwrap_err();
        assert_eq!(e.position, Some(Span::new(10, 12)));
    }
}
