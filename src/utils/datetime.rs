/// Pure date/time utility functions (Discord-agnostic)
use chrono::{Datelike, NaiveDate};

/// Leap year used to validate birthdays so that 29 February is accepted
const REFERENCE_LEAP_YEAR: i32 = 2000;

/// Check if a date matches month and day (ignoring year)
pub fn matches_birthday(month: u32, day: u32, date: NaiveDate) -> bool {
    date.month() == month && date.day() == day
}

/// Validate if a month/day combination is a real calendar date
pub fn is_valid_date(month: u32, day: u32) -> bool {
    NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, day).is_some()
}

/// Whether a grant stamped at `granted_at` has been held for at least `hold_secs`
pub fn hold_elapsed(granted_at: i64, now: i64, hold_secs: i64) -> bool {
    now - granted_at >= hold_secs
}

/// Get month name from month number (1-12)
pub fn get_month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_birthday() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert!(matches_birthday(3, 15, date));

        assert!(!matches_birthday(3, 16, date));
        assert!(!matches_birthday(4, 15, date));
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date(1, 31));
        assert!(is_valid_date(2, 29)); // Leap day allowed
        assert!(is_valid_date(4, 30));
        assert!(is_valid_date(12, 31));

        assert!(!is_valid_date(0, 15));
        assert!(!is_valid_date(13, 15));
        assert!(!is_valid_date(2, 30));
        assert!(!is_valid_date(4, 31));
        assert!(!is_valid_date(6, 0));
        assert!(!is_valid_date(6, 32));
    }

    #[test]
    fn test_hold_elapsed() {
        assert!(!hold_elapsed(1_000, 1_000, 86_400));
        assert!(!hold_elapsed(1_000, 87_399, 86_400));
        assert!(hold_elapsed(1_000, 87_400, 86_400));
        assert!(hold_elapsed(1_000, 200_000, 86_400));
    }

    #[test]
    fn test_get_month_name() {
        assert_eq!(get_month_name(1), "January");
        assert_eq!(get_month_name(6), "June");
        assert_eq!(get_month_name(12), "December");
        assert_eq!(get_month_name(0), "Unknown");
        assert_eq!(get_month_name(13), "Unknown");
    }
}
