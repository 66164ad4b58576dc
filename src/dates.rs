//! Calendar helpers for `YYYY-MM-DD` trip ranges.

use crate::error::Result;
use crate::PlannerError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shape of a wire date. Calendar validity is checked separately.
pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATE_PATTERN).expect("static regex"));

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    if !is_iso_date_shape(s) {
        return Err(PlannerError::InvalidRequest(format!(
            "date '{}' is not in YYYY-MM-DD format",
            s
        )));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| PlannerError::InvalidRequest(format!("date '{}' is not a calendar date: {}", s, e)))
}

/// Number of calendar days in `[start, end]`, both ends included.
///
/// Fails when either date is malformed or `end` precedes `start`.
pub fn days_inclusive(start: &str, end: &str) -> Result<usize> {
    let s = parse_date(start)?;
    let e = parse_date(end)?;
    if e < s {
        return Err(PlannerError::InvalidRequest(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok((e - s).num_days() as usize + 1)
}

/// Every date in `[start, end]`, in order.
pub fn enumerate_days(start: &str, end: &str) -> Result<Vec<NaiveDate>> {
    let count = days_inclusive(start, end)?;
    let first = parse_date(start)?;
    Ok(first.iter_days().take(count).collect())
}

/// Shape-only check: four digits, dash, two digits, dash, two digits.
pub(crate) fn is_iso_date_shape(s: &str) -> bool {
    DATE_SHAPE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_inclusive_same_day() {
        assert_eq!(days_inclusive("2024-06-01", "2024-06-01").unwrap(), 1);
    }

    #[test]
    fn test_days_inclusive_across_month_and_leap_day() {
        assert_eq!(days_inclusive("2024-02-27", "2024-03-02").unwrap(), 5);
    }

    #[test]
    fn test_days_inclusive_reversed_range() {
        let err = days_inclusive("2024-06-10", "2024-06-01").unwrap_err();
        assert!(matches!(err, PlannerError::InvalidRequest(_)));
    }

    #[test]
    fn test_enumerate_days_crosses_year_end() {
        let days: Vec<String> = enumerate_days("2023-12-30", "2024-01-02")
            .unwrap()
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();
        assert_eq!(days, vec!["2023-12-30", "2023-12-31", "2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn test_enumerate_days_reversed_range() {
        assert!(enumerate_days("2024-06-02", "2024-06-01").is_err());
    }

    #[test]
    fn test_parse_date_rejects_loose_formats() {
        assert!(parse_date("2024-6-1").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("20240601").is_err());
    }
}
