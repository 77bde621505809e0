use crate::{consts, utils};

/// The effective working window for one employee on one day, in minutes
/// since midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start_minutes: i64,
    pub end_minutes: Option<i64>,
    /// Earliest allowed check-in. One hour before start for assigned
    /// schedules, 06:00 for the fallback window.
    pub earliest_minutes: i64,
}

impl ScheduleWindow {
    /// Builds a window from `HH:MM` strings, falling back to the default
    /// window when the start time is unparseable.
    pub fn from_times(start_time: &str, end_time: Option<&str>) -> Self {
        let Some(start_minutes) = utils::parse_clock(start_time) else {
            return Self::default();
        };

        Self {
            start_minutes,
            end_minutes: end_time.and_then(utils::parse_clock),
            // Wraps below midnight for very early shifts
            earliest_minutes: (start_minutes - consts::EARLIEST_CHECK_IN_OFFSET_MINUTES)
                .rem_euclid(24 * 60),
        }
    }

    /// Whether the too-early rejection applies. Morning shifts whose
    /// earliest check-in wrapped past midnight into the previous evening
    /// cannot be meaningfully gated, so the check is skipped for them.
    pub fn enforces_earliest(&self) -> bool {
        let start_hour = self.start_minutes / 60;
        let earliest_hour = self.earliest_minutes / 60;

        !(start_hour < 12 && earliest_hour > 12)
    }

    /// Minutes remaining until the earliest allowed check-in, when the gate
    /// applies and `now` is still before it.
    pub fn minutes_until_open(&self, now_minutes: i64) -> Option<i64> {
        if !self.enforces_earliest() {
            return None;
        }

        (now_minutes < self.earliest_minutes).then_some(self.earliest_minutes - now_minutes)
    }
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self {
            start_minutes: utils::parse_clock(consts::DEFAULT_START_TIME).unwrap(),
            end_minutes: None,
            earliest_minutes: utils::parse_clock(consts::DEFAULT_EARLIEST_CHECK_IN).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let window = ScheduleWindow::default();

        assert_eq!(window.start_minutes, 8 * 60);
        assert_eq!(utils::format_clock(window.earliest_minutes), "06:00");
        assert!(window.enforces_earliest());
    }

    #[test]
    fn test_from_times() {
        let window = ScheduleWindow::from_times("09:00", Some("17:00"));

        assert_eq!(window.start_minutes, 9 * 60);
        assert_eq!(window.end_minutes, Some(17 * 60));
        assert_eq!(utils::format_clock(window.earliest_minutes), "08:00");

        // Garbage start falls back to the default window
        assert_eq!(ScheduleWindow::from_times("garbage", None), ScheduleWindow::default());
    }

    #[test]
    fn test_earliest_wraps_below_midnight() {
        let window = ScheduleWindow::from_times("00:30", None);

        assert_eq!(utils::format_clock(window.earliest_minutes), "23:30");
        assert!(!window.enforces_earliest());
    }

    #[test]
    fn test_minutes_until_open() {
        let window = ScheduleWindow::from_times("08:00", None);

        assert_eq!(window.minutes_until_open(6 * 60 + 45), Some(15));
        assert_eq!(window.minutes_until_open(7 * 60), None);
        assert_eq!(window.minutes_until_open(9 * 60), None);

        // Early shift: the gate is skipped entirely
        let early = ScheduleWindow::from_times("00:30", None);
        assert_eq!(early.minutes_until_open(0), None);
    }
}
