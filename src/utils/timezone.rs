use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;

/// Maximum absolute UTC offset accepted for fixed-offset timezones, in hours
const MAX_OFFSET_HOURS: i32 = 14;

/// Error types for timezone operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimezoneError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// A user's timezone: either an IANA zone or a fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl UserTimezone {
    /// Calendar date at `instant` as seen in this timezone
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            UserTimezone::Named(tz) => instant.with_timezone(tz).date_naive(),
            UserTimezone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}

/// Parse a timezone string
///
/// Accepts IANA names (`Europe/Paris`, `UTC`) and fixed offsets written as
/// `UTC+10`, `GMT-3`, `UTC+05:30` or `UTC+0530`.
pub fn parse_timezone(tz_str: &str) -> Result<UserTimezone, TimezoneError> {
    let trimmed = tz_str.trim();

    if let Ok(tz) = trimmed.parse::<Tz>() {
        return Ok(UserTimezone::Named(tz));
    }

    parse_fixed_offset(trimmed)
        .map(UserTimezone::Fixed)
        .ok_or_else(|| TimezoneError::InvalidTimezone(tz_str.to_string()))
}

/// Parse the `UTC+HH[:MM]` family of offsets
fn parse_fixed_offset(text: &str) -> Option<FixedOffset> {
    let upper = text.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))?;

    let (sign, digits) = if let Some(d) = rest.strip_prefix('+') {
        (1, d)
    } else if let Some(d) = rest.strip_prefix('-') {
        (-1, d)
    } else {
        return None;
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };

    if hours.is_empty() || hours.len() > 2 || minutes.is_empty() || minutes.len() > 2 {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > MAX_OFFSET_HOURS || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("UTC").is_ok());
        assert!(parse_timezone("Europe/Paris").is_ok());
        assert!(parse_timezone("America/New_York").is_ok());
        assert!(parse_timezone("Invalid/Timezone").is_err());
        assert!(parse_timezone("").is_err());
    }

    #[test]
    fn test_parse_fixed_offsets() {
        let east = |secs| UserTimezone::Fixed(FixedOffset::east_opt(secs).unwrap());

        assert_eq!(parse_timezone("UTC+10"), Ok(east(10 * 3600)));
        assert_eq!(parse_timezone("utc-3"), Ok(east(-3 * 3600)));
        assert_eq!(parse_timezone("GMT+05:30"), Ok(east(5 * 3600 + 30 * 60)));
        assert_eq!(parse_timezone("UTC+0545"), Ok(east(5 * 3600 + 45 * 60)));
    }

    #[test]
    fn test_parse_fixed_offsets_rejects_garbage() {
        assert!(parse_timezone("UTC+").is_err());
        assert!(parse_timezone("UTC10").is_err());
        assert!(parse_timezone("UTC+15").is_err());
        assert!(parse_timezone("UTC+05:60").is_err());
        assert!(parse_timezone("UTC+1a").is_err());
        assert!(parse_timezone("UTC+a€").is_err());
        assert!(parse_timezone("UTC+123").is_err());
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 14, 20, 0, 0).unwrap();

        let tokyo = parse_timezone("Asia/Tokyo").unwrap();
        assert_eq!(
            tokyo.local_date(instant),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );

        let plus_ten = parse_timezone("UTC+10").unwrap();
        assert_eq!(
            plus_ten.local_date(instant),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );

        let new_york = parse_timezone("America/New_York").unwrap();
        assert_eq!(
            new_york.local_date(instant),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
    }
}
