//! Parsing of the report's `M/D/YYYY HH:MM` start/end columns.
//!
//! The vendor export is loose about its dates, so a few components are
//! repaired before the calendar sees them:
//!
//! * a year below 1999 (two-digit years included) gets 2000 added,
//! * a month of 0 or of 32 and above becomes January,
//! * a non-positive day becomes the 1st.
//!
//! Extra spaces between the date and the time are accepted, and components
//! past the minute (seconds) are ignored, but any further space-separated
//! token after the time is rejected.
//!
//! Nothing else is corrected. A month of 13..=31, or a day past the end of
//! its month, is handed to `chrono` as-is and rejected there.

use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A parsed interval endpoint. Empty cells parse to [`IntervalStamp::EMPTY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct IntervalStamp(Option<NaiveDateTime>);

impl IntervalStamp {
    pub const EMPTY: IntervalStamp = IntervalStamp(None);

    pub fn new(at: NaiveDateTime) -> Self {
        Self(Some(at))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        self.0
    }

    /// Hours from `self` to `end`, negative if `end` comes first. Zero when
    /// either side is empty.
    pub fn hours_until(&self, end: &IntervalStamp) -> f64 {
        match (self.0, end.0) {
            (Some(start), Some(end)) => (end - start).num_seconds() as f64 / 3600.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for IntervalStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(at) => write!(f, "{}", at.format(TIMESTAMP_FORMAT)),
            None => Ok(()),
        }
    }
}

pub fn parse_interval(input: &str) -> Result<IntervalStamp> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(IntervalStamp::EMPTY);
    }

    let fail = |reason: String| EtlError::DateParseError {
        input: input.to_string(),
        reason,
    };

    let (date_part, time_part) = trimmed
        .split_once(' ')
        .ok_or_else(|| fail("missing time part".to_string()))?;

    let mut date = date_part.trim().split('/');
    let mut month = next_component(&mut date, "month").map_err(&fail)?;
    let mut day = next_component(&mut date, "day").map_err(&fail)?;
    let mut year = next_component(&mut date, "year").map_err(&fail)?;

    // Runs of spaces between date and time are tolerated; a token after the
    // time (such as an AM/PM marker) is not, since it would change the hour.
    let time_part = time_part.trim();
    if time_part.contains(char::is_whitespace) {
        return Err(fail(format!("unexpected text after time '{}'", time_part)));
    }

    let mut time = time_part.split(':');
    let hour = next_component(&mut time, "hour").map_err(&fail)?;
    let minute = next_component(&mut time, "minute").map_err(&fail)?;

    if year <= 0 || year < 1999 {
        year += 2000;
    }
    if month <= 0 || month >= 32 {
        month = 1;
    }
    if day <= 0 {
        day = 1;
    }

    let date = NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .ok_or_else(|| fail(format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day)))?;
    let at = u32::try_from(hour)
        .ok()
        .zip(u32::try_from(minute).ok())
        .and_then(|(h, m)| date.and_hms_opt(h, m, 0))
        .ok_or_else(|| fail(format!("{:02}:{:02} is not a time of day", hour, minute)))?;

    Ok(IntervalStamp::new(at))
}

fn next_component<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    name: &str,
) -> std::result::Result<i32, String> {
    let raw = parts.next().ok_or_else(|| format!("missing {}", name))?;
    raw.trim()
        .parse::<i32>()
        .map_err(|_| format!("{} '{}' is not a number", name, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn at(input: &str) -> NaiveDateTime {
        parse_interval(input).unwrap().datetime().unwrap()
    }

    #[test]
    fn test_parses_exact_components() {
        for month in 1..=12u32 {
            for day in [1u32, 9, 15, 28] {
                let stamp = at(&format!("{}/{}/2021 13:45", month, day));
                assert_eq!((stamp.year(), stamp.month(), stamp.day()), (2021, month, day));
                assert_eq!((stamp.hour(), stamp.minute()), (13, 45));
            }
        }
        assert_eq!(at("1/31/2021 00:00").day(), 31);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(at("  3/4/2021 05:06 "), at("3/4/2021 05:06"));
    }

    #[test]
    fn test_two_digit_years_are_moved_into_2000s() {
        assert_eq!(at("3/4/21 05:06").year(), 2021);
        assert_eq!(at("3/4/0 05:06").year(), 2000);
        assert_eq!(at("3/4/1998 05:06").year(), 3998);
        assert_eq!(at("3/4/1999 05:06").year(), 1999);
        assert_eq!(at("3/4/2024 05:06").year(), 2024);
    }

    #[test]
    fn test_out_of_range_month_and_day_are_repaired() {
        assert_eq!(at("0/4/2021 05:06").month(), 1);
        assert_eq!(at("32/4/2021 05:06").month(), 1);
        assert_eq!(at("-5/4/2021 05:06").month(), 1);
        assert_eq!(at("3/0/2021 05:06").day(), 1);
        assert_eq!(at("3/-2/2021 05:06").day(), 1);
    }

    #[test]
    fn test_unrepaired_impossible_dates_fail() {
        assert!(parse_interval("13/4/2021 05:06").is_err());
        assert!(parse_interval("2/30/2021 05:06").is_err());
        assert!(parse_interval("3/4/2021 24:00").is_err());
    }

    #[test]
    fn test_empty_input_is_the_sentinel() {
        assert_eq!(parse_interval("").unwrap(), IntervalStamp::EMPTY);
        assert_eq!(parse_interval("   ").unwrap(), IntervalStamp::EMPTY);
        assert_eq!(IntervalStamp::EMPTY.to_string(), "");
    }

    #[test]
    fn test_malformed_input_fails() {
        for input in ["3/4/2021", "3/4 05:06", "3/x/2021 05:06", "3/4/2021 05", "garbage"] {
            let err = parse_interval(input).unwrap_err();
            assert!(matches!(err, EtlError::DateParseError { .. }), "{}", input);
        }
    }

    #[test]
    fn test_extra_spaces_before_time_are_accepted() {
        assert_eq!(at("3/4/2021  05:06"), at("3/4/2021 05:06"));
    }

    #[test]
    fn test_token_after_time_is_rejected() {
        for input in ["3/4/2021 05:06 PM", "3/4/2021 05:06 AM", "3/4/2021 05:06 x 1"] {
            match parse_interval(input) {
                Err(EtlError::DateParseError { reason, .. }) => {
                    assert!(reason.contains("unexpected text after time"), "{}", reason)
                }
                other => panic!("{} parsed as {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_trailing_components_are_ignored() {
        assert_eq!(at("3/4/2021 05:06:59").second(), 0);
    }

    #[test]
    fn test_display_and_hours() {
        let start = parse_interval("3/4/2021 05:06").unwrap();
        let end = parse_interval("3/4/2021 06:36").unwrap();
        assert_eq!(start.to_string(), "2021-03-04 05:06:00");
        assert_eq!(start.hours_until(&end), 1.5);
        assert_eq!(end.hours_until(&start), -1.5);
        assert_eq!(start.hours_until(&IntervalStamp::EMPTY), 0.0);
    }
}
