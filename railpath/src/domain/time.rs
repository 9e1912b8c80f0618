//! Time handling for rail query data.
//!
//! The reservation service reports departure clock times as "HH:MM" strings
//! alongside a separately supplied date, and schedule dates as compact
//! "YYYYMMDD" strings. This module parses both and provides the calendar
//! date enumeration used to turn a transfer window into query dates.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Error returned when parsing an invalid time or date string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a clock time in "HH:MM" format and attach it to `date`.
///
/// # Examples
///
/// ```
/// use railpath::domain::parse_clock_time;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
///
/// let dt = parse_clock_time("14:30", date).unwrap();
/// assert_eq!(dt.to_string(), "2024-03-15 14:30:00");
///
/// assert!(parse_clock_time("1430", date).is_err());
/// assert!(parse_clock_time("14:3", date).is_err());
/// assert!(parse_clock_time("25:00", date).is_err());
/// ```
pub fn parse_clock_time(s: &str, date: NaiveDate) -> Result<NaiveDateTime, TimeError> {
    if s.len() != 5 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    let bytes = s.as_bytes();

    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute =
        parse_digits(&bytes[3..5]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    let time =
        NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))?;

    Ok(date.and_time(time))
}

/// Parse a compact "YYYYMMDD" date.
///
/// ```
/// use railpath::domain::parse_compact_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     parse_compact_date("20240301").unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
/// );
/// assert!(parse_compact_date("2024-03-01").is_err());
/// assert!(parse_compact_date("20240231").is_err());
/// ```
pub fn parse_compact_date(s: &str) -> Result<NaiveDate, TimeError> {
    if s.len() != 8 {
        return Err(TimeError::new("expected YYYYMMDD format"));
    }

    let bytes = s.as_bytes();
    let year = parse_digits(&bytes[0..4]).ok_or_else(|| TimeError::new("invalid year digits"))?;
    let month =
        parse_digits(&bytes[4..6]).ok_or_else(|| TimeError::new("invalid month digits"))?;
    let day = parse_digits(&bytes[6..8]).ok_or_else(|| TimeError::new("invalid day digits"))?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| TimeError::new("date does not exist"))
}

/// Format a date as "YYYY-MM-DD", the form the query endpoints expect.
pub fn format_query_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Every calendar date touched by the interval `[start, end]`, ascending.
///
/// Both endpoints' dates are included. A transfer window that straddles
/// midnight therefore yields two dates. Returns an empty list when `end`
/// is before `start`.
///
/// # Examples
///
/// ```
/// use railpath::domain::dates_between;
/// use chrono::NaiveDate;
///
/// let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
///
/// let start = d1.and_hms_opt(23, 50, 0).unwrap();
/// let end = d2.and_hms_opt(1, 10, 0).unwrap();
/// assert_eq!(dates_between(start, end), vec![d1, d2]);
/// ```
pub fn dates_between(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }

    start
        .date()
        .iter_days()
        .take_while(|date| *date <= end.date())
        .collect()
}

/// Render a duration as "3h05m" for logs and terminal output.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_minutes();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{sign}{}h{:02}m", total / 60, total % 60)
}

/// Parse ASCII digit bytes into a u32.
fn parse_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() {
        return None;
    }
    bytes.iter().try_fold(0u32, |acc, &b| {
        let digit = (b as char).to_digit(10)?;
        acc.checked_mul(10)?.checked_add(digit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let d = date(2024, 3, 15);

        assert_eq!(parse_clock_time("00:00", d).unwrap(), at(d, 0, 0));
        assert_eq!(parse_clock_time("23:59", d).unwrap(), at(d, 23, 59));
        assert_eq!(parse_clock_time("07:05", d).unwrap(), at(d, 7, 5));
    }

    #[test]
    fn parse_invalid_times() {
        let d = date(2024, 3, 15);

        assert!(parse_clock_time("1430", d).is_err());
        assert!(parse_clock_time("14-30", d).is_err());
        assert!(parse_clock_time("24:00", d).is_err());
        assert!(parse_clock_time("12:60", d).is_err());
        assert!(parse_clock_time("ab:cd", d).is_err());
        assert!(parse_clock_time("", d).is_err());
    }

    #[test]
    fn parse_compact_dates() {
        assert_eq!(parse_compact_date("20141231").unwrap(), date(2014, 12, 31));
        assert!(parse_compact_date("2014123").is_err());
        assert!(parse_compact_date("2014AB31").is_err());
        assert!(parse_compact_date("20141301").is_err());
    }

    #[test]
    fn query_date_format() {
        assert_eq!(format_query_date(date(2024, 1, 5)), "2024-01-05");
    }

    #[test]
    fn dates_between_straddles_midnight() {
        let start = at(date(2024, 1, 1), 23, 50);
        let end = at(date(2024, 1, 2), 1, 10);
        assert_eq!(
            dates_between(start, end),
            vec![date(2024, 1, 1), date(2024, 1, 2)]
        );
    }

    #[test]
    fn dates_between_same_day() {
        let start = at(date(2024, 1, 1), 8, 0);
        let end = at(date(2024, 1, 1), 10, 0);
        assert_eq!(dates_between(start, end), vec![date(2024, 1, 1)]);
    }

    #[test]
    fn dates_between_single_instant() {
        let start = at(date(2024, 1, 1), 8, 0);
        assert_eq!(dates_between(start, start), vec![date(2024, 1, 1)]);
    }

    #[test]
    fn dates_between_multi_day() {
        let start = at(date(2024, 2, 28), 12, 0);
        let end = at(date(2024, 3, 1), 0, 5);
        assert_eq!(
            dates_between(start, end),
            vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
    }

    #[test]
    fn dates_between_inverted_is_empty() {
        let start = at(date(2024, 1, 2), 0, 0);
        let end = at(date(2024, 1, 1), 0, 0);
        assert!(dates_between(start, end).is_empty());
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::minutes(185)), "3h05m");
        assert_eq!(format_duration(Duration::minutes(0)), "0h00m");
        assert_eq!(format_duration(Duration::minutes(-30)), "-0h30m");
    }
}
