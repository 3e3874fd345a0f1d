//! ISO 8601 validity intervals as used in gridpoint `validTime` values
//!
//! The upstream writes intervals as `start/duration`, e.g.
//! `2024-07-04T18:00:00+00:00/PT3H`. The `start/end` form is accepted too.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("interval has no '/' separator")]
    MissingSeparator,
    #[error("invalid interval start '{0}'")]
    InvalidStart(String),
    #[error("invalid interval duration '{0}'")]
    InvalidDuration(String),
    #[error("interval must have a positive length")]
    Empty,
    #[error("interval end '{0}' is out of range")]
    OutOfRange(String),
}

/// Parse a timestamp, assuming UTC when no offset is given
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Parse an ISO 8601 duration such as `PT1H`, `P1DT6H` or `P2W`
///
/// Years and months have no fixed length and are rejected.
#[must_use]
pub fn parse_iso8601_duration(s: &str) -> Option<TimeDelta> {
    let body = s.strip_prefix('P')?;
    if body.is_empty() {
        return None;
    }

    let mut total = TimeDelta::zero();
    let mut in_time = false;
    let mut number = String::new();
    let mut seen_component = false;

    for c in body.chars() {
        match c {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' | '.' => number.push(c),
            unit => {
                if number.is_empty() {
                    return None;
                }
                let part = match (in_time, unit) {
                    (false, 'W') => TimeDelta::try_weeks(number.parse().ok()?)?,
                    (false, 'D') => TimeDelta::try_days(number.parse().ok()?)?,
                    (true, 'H') => TimeDelta::try_hours(number.parse().ok()?)?,
                    (true, 'M') => TimeDelta::try_minutes(number.parse().ok()?)?,
                    (true, 'S') => {
                        let seconds: f64 = number.parse().ok()?;
                        if !seconds.is_finite() || seconds < 0.0 {
                            return None;
                        }
                        TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)?
                    }
                    _ => return None,
                };
                total = total.checked_add(&part)?;
                number.clear();
                seen_component = true;
            }
        }
    }

    // trailing digits without a designator, or a bare "PT"
    if !number.is_empty() || !seen_component {
        return None;
    }

    Some(total)
}

/// Split a `validTime` value into its start instant and length
pub fn parse_valid_time(token: &str) -> Result<(DateTime<Utc>, TimeDelta), IntervalError> {
    let (start, rest) = token
        .trim()
        .split_once('/')
        .ok_or(IntervalError::MissingSeparator)?;

    let start =
        parse_timestamp(start).ok_or_else(|| IntervalError::InvalidStart(start.to_string()))?;

    let duration = if rest.starts_with('P') {
        parse_iso8601_duration(rest).ok_or_else(|| IntervalError::InvalidDuration(rest.to_string()))?
    } else {
        let end =
            parse_timestamp(rest).ok_or_else(|| IntervalError::InvalidDuration(rest.to_string()))?;
        end - start
    };

    if duration <= TimeDelta::zero() {
        return Err(IntervalError::Empty);
    }

    if start.checked_add_signed(duration).is_none() {
        return Err(IntervalError::OutOfRange(rest.to_string()));
    }

    Ok((start, duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PT1H", TimeDelta::hours(1))]
    #[case("PT30M", TimeDelta::minutes(30))]
    #[case("P1DT6H", TimeDelta::hours(30))]
    #[case("P7D", TimeDelta::days(7))]
    #[case("P1W", TimeDelta::days(7))]
    #[case("PT1H30M15S", TimeDelta::seconds(5415))]
    #[case("PT0.5S", TimeDelta::milliseconds(500))]
    fn test_parse_duration(#[case] input: &str, #[case] expected: TimeDelta) {
        assert_eq!(parse_iso8601_duration(input), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("P")]
    #[case("PT")]
    #[case("1H")]
    #[case("PT1")]
    #[case("P1Y")]
    #[case("P1M")]
    #[case("PTH")]
    #[case("P1H")]
    #[case("PT1D")]
    fn test_parse_duration_rejects(#[case] input: &str) {
        assert_eq!(parse_iso8601_duration(input), None);
    }

    #[test]
    fn test_parse_valid_time() {
        let (start, duration) = parse_valid_time("2024-07-04T18:00:00+00:00/PT3H").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 7, 4, 18, 0, 0).unwrap());
        assert_eq!(duration, TimeDelta::hours(3));
    }

    #[test]
    fn test_parse_valid_time_with_offset_and_end() {
        let (start, duration) =
            parse_valid_time("2024-07-04T13:00:00-05:00/2024-07-04T20:00:00+00:00").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 7, 4, 18, 0, 0).unwrap());
        assert_eq!(duration, TimeDelta::hours(2));
    }

    #[test]
    fn test_parse_valid_time_errors() {
        assert_eq!(
            parse_valid_time("2024-07-04T18:00:00+00:00"),
            Err(IntervalError::MissingSeparator)
        );
        assert!(matches!(
            parse_valid_time("yesterday/PT1H"),
            Err(IntervalError::InvalidStart(_))
        ));
        assert!(matches!(
            parse_valid_time("2024-07-04T18:00:00+00:00/PT1X"),
            Err(IntervalError::InvalidDuration(_))
        ));
        assert_eq!(
            parse_valid_time("2024-07-04T18:00:00+00:00/PT0H"),
            Err(IntervalError::Empty)
        );
    }

    #[rstest]
    #[case("2024-07-04T18:00:00+00:00/P100000000D")]
    #[case("2024-07-04T18:00:00+00:00/PT9000000000000S")]
    fn test_parse_valid_time_rejects_unrepresentable_end(#[case] token: &str) {
        assert!(matches!(
            parse_valid_time(token),
            Err(IntervalError::OutOfRange(_))
        ));
    }
}
