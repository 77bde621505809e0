use chrono::{Datelike as _, NaiveDate, Weekday};

/// Parses a `HH:MM` clock string into minutes since midnight.
pub fn parse_clock(clock: &str) -> Option<i64> {
    let (hour, minute) = clock.split_once(':')?;

    let hour: i64 = hour.parse().ok()?;
    let minute: i64 = minute.parse().ok()?;

    if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
        return None;
    }

    Some(hour * 60 + minute)
}

/// Formats minutes since midnight back into `HH:MM`.
pub fn format_clock(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(24 * 60);

    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Renders a minute count as `"X jam Y menit"`, dropping zero components.
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let remainder = minutes % 60;

    match (hours, remainder) {
        (0, m) => format!("{m} menit"),
        (h, 0) => format!("{h} jam"),
        (h, m) => format!("{h} jam {m} menit"),
    }
}

/// Resolves a `YYYY-MM` period into its first and last calendar day.
pub fn period_range(periode: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (year, month) = periode.split_once('-')?;

    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((first, next_month.pred_opt()?))
}

/// The `YYYY-MM` period a date falls in.
pub fn period_of(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Monday through Friday. Public holidays are out of scope.
pub fn is_working_day(date: NaiveDate) -> bool {
    date.weekday() != Weekday::Sat && date.weekday() != Weekday::Sun
}

pub fn count_working_days(mut start: NaiveDate, end: NaiveDate) -> i64 {
    let mut working_days = 0;

    while start <= end {
        if is_working_day(start) {
            working_days += 1;
        }

        start = start.succ_opt().unwrap();
    }

    working_days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("08:00"), Some(480));
        assert_eq!(parse_clock("23:59"), Some(1439));
        assert_eq!(parse_clock("00:00"), Some(0));
        assert_eq!(parse_clock("24:00"), None);
        assert_eq!(parse_clock("8am"), None);
        assert_eq!(parse_clock(""), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(480), "08:00");
        assert_eq!(format_clock(1439), "23:59");

        // Wraps around midnight in both directions
        assert_eq!(format_clock(-60), "23:00");
        assert_eq!(format_clock(25 * 60), "01:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(15), "15 menit");
        assert_eq!(format_duration(60), "1 jam");
        assert_eq!(format_duration(75), "1 jam 15 menit");
    }

    #[test]
    fn test_period_range() {
        assert_eq!(
            period_range("2024-06"),
            Some((
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
            ))
        );
        assert_eq!(
            period_range("2024-12"),
            Some((
                NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
            ))
        );
        assert_eq!(period_range("2024-13"), None);
        assert_eq!(period_range("junk"), None);
    }

    #[test]
    fn test_period_of() {
        assert_eq!(period_of(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), "2024-06");
    }

    #[test]
    fn test_is_working_day() {
        // 2024-06-07 is a Friday
        assert!(is_working_day(NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()));
        assert!(!is_working_day(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()));
        assert!(!is_working_day(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()));
    }

    #[test]
    fn test_count_working_days() {
        let period_start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let period_end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        assert_eq!(count_working_days(period_start, period_end), 20);
    }
}
