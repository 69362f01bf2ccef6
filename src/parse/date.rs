use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Dates in the inventory are written day-first (`D/M/YYYY`), never month-first.
static DAY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());

/// Parses a day-first date like `3/11/2025` (the 3rd of November).
///
/// No bounds checking is done on the day or month: out-of-range components roll over into the
/// neighbouring months/years, so `32/12/2024` is the 1st of January 2025 and `0/3/2025` is the
/// last day of February. Anything that doesn't have the right shape (or rolls somewhere chrono
/// can't represent) gives `None`.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let caps = DAY_FIRST.captures(raw)?;
    let day: i64 = caps[1].parse().ok()?;
    let month: i32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    // Months are zero-indexed from here so month 0 lands in December of the previous year
    let month0 = month - 1;
    let first_of_month =
        NaiveDate::from_ymd_opt(year + month0.div_euclid(12), month0.rem_euclid(12) as u32 + 1, 1)?;
    first_of_month.checked_add_signed(Duration::days(day - 1))
}

/// Renders a date in long form, like `January 5, 2026`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first() {
        assert_eq!(parse_day_first("3/11/2025"), Some(ymd(2025, 11, 3)));
        assert_eq!(parse_day_first("03/11/2025"), Some(ymd(2025, 11, 3)));
        assert_eq!(parse_day_first("25/12/2024"), Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn test_roll_over() {
        assert_eq!(parse_day_first("32/12/2024"), Some(ymd(2025, 1, 1)));
        assert_eq!(parse_day_first("1/13/2024"), Some(ymd(2025, 1, 1)));
        assert_eq!(parse_day_first("32/13/2024"), Some(ymd(2025, 2, 1)));
        assert_eq!(parse_day_first("0/3/2024"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_day_first("1/0/2024"), Some(ymd(2023, 12, 1)));
        assert_eq!(parse_day_first("31/2/2025"), Some(ymd(2025, 3, 3)));
    }

    #[test]
    fn test_not_dates() {
        assert_eq!(parse_day_first("TBD"), None);
        assert_eq!(parse_day_first("Signups are closed"), None);
        assert_eq!(parse_day_first("2025-11-03"), None);
        assert_eq!(parse_day_first("3/11/25"), None);
        assert_eq!(parse_day_first("123/1/2025"), None);
        assert_eq!(parse_day_first("on 3/11/2025"), None);
        assert_eq!(parse_day_first(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(display_date(ymd(2099, 1, 1)), "January 1, 2099");
        assert_eq!(display_date(ymd(2025, 11, 23)), "November 23, 2025");
    }
}
