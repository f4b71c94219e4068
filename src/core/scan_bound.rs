use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

pub const DEFAULT_LOOKBACK: usize = 2;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// How many leading data rows of the report a run transforms.
///
/// The bound is derived from a "scan since" date as a whole number of days,
/// but it is consumed one row at a time by the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScanBound(usize);

impl ScanBound {
    pub fn new(rows: usize) -> Self {
        Self(rows.max(1))
    }

    pub fn rows(&self) -> usize {
        self.0
    }

    /// Whole days between `since` and `now`, never less than one.
    pub fn since(since: NaiveDateTime, now: NaiveDateTime) -> Self {
        let days = (now - since).num_days();
        Self::new(usize::try_from(days).unwrap_or(0))
    }

    /// Resolves an answer to the scan-date question. Only the empty answer
    /// selects `default_lookback`; anything else, whitespace included, must
    /// be an ISO date or date-time.
    pub fn from_answer(answer: &str, now: NaiveDateTime, default_lookback: usize) -> Result<Self> {
        if answer.is_empty() {
            return Ok(Self::new(default_lookback));
        }
        let since = parse_iso(answer).ok_or_else(|| EtlError::InvalidScanDate {
            input: answer.to_string(),
        })?;
        Ok(Self::since(since, now))
    }

    /// Same as [`ScanBound::from_answer`] for the `--since` flag, where a bad
    /// date is a configuration error instead of a reason to ask again.
    pub fn from_flag(since: &str, now: NaiveDateTime, default_lookback: usize) -> Result<Self> {
        Self::from_answer(since, now, default_lookback).map_err(|e| match e {
            EtlError::InvalidScanDate { input } => EtlError::InvalidConfigValueError {
                field: "--since".to_string(),
                value: input,
                reason: "expected YYYY-MM-DD".to_string(),
            },
            other => other,
        })
    }
}

impl Default for ScanBound {
    fn default() -> Self {
        Self(DEFAULT_LOOKBACK)
    }
}

impl fmt::Display for ScanBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_iso(input: &str) -> Option<NaiveDateTime> {
    if input.trim() != input {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 10)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_blank_answer_selects_default_lookback() {
        assert_eq!(ScanBound::from_answer("", now(), DEFAULT_LOOKBACK).unwrap().rows(), 2);
        assert_eq!(ScanBound::from_answer("", now(), 5).unwrap().rows(), 5);
    }

    #[test]
    fn test_whitespace_is_not_a_blank_answer() {
        for answer in ["   ", "\t", " 2021-03-01", "2021-03-01 "] {
            let err = ScanBound::from_answer(answer, now(), 2).unwrap_err();
            assert!(matches!(err, EtlError::InvalidScanDate { .. }), "{:?}", answer);
        }
    }

    #[test]
    fn test_flag_accepts_iso_date() {
        let bound = ScanBound::from_flag("2021-03-01", now(), DEFAULT_LOOKBACK).unwrap();
        assert_eq!(bound.rows(), 9);
        assert_eq!(ScanBound::from_flag("", now(), 3).unwrap().rows(), 3);
    }

    #[test]
    fn test_invalid_flag_is_a_configuration_error() {
        let err = ScanBound::from_flag("03/01/2021", now(), DEFAULT_LOOKBACK).unwrap_err();
        match &err {
            EtlError::InvalidConfigValueError { field, value, .. } => {
                assert_eq!(field, "--since");
                assert_eq!(value, "03/01/2021");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_past_date_counts_whole_days() {
        let bound = ScanBound::from_answer("2021-03-01", now(), DEFAULT_LOOKBACK).unwrap();
        assert_eq!(bound.rows(), 9);
        let bound = ScanBound::from_answer("2021-03-01T18:00", now(), DEFAULT_LOOKBACK).unwrap();
        assert_eq!(bound.rows(), 8);
    }

    #[test]
    fn test_bound_is_at_least_one() {
        // Earlier today: less than a full day back.
        assert_eq!(ScanBound::from_answer("2021-03-10", now(), 2).unwrap().rows(), 1);
        // Future dates.
        assert_eq!(ScanBound::from_answer("2022-01-01", now(), 2).unwrap().rows(), 1);
        assert_eq!(ScanBound::new(0).rows(), 1);
    }

    #[test]
    fn test_unparsable_answer_is_rejected() {
        for answer in ["yesterday", "03/01/2021", "2021-13-01", "2021-03-01x"] {
            let err = ScanBound::from_answer(answer, now(), 2).unwrap_err();
            assert!(matches!(err, EtlError::InvalidScanDate { .. }), "{}", answer);
        }
    }
}
