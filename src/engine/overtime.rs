use crate::consts;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OvertimeComputation {
    pub minutes: i64,
    /// Decimal hours, rounded to 2 places.
    pub hours: f64,
    pub bonus_per_hour: i64,
    pub total_bonus: i64,
}

/// Detects overtime from a checkout against the scheduled end. Checkouts
/// less than 30 minutes past the end do not count.
pub fn detect_overtime(scheduled_end_minutes: i64, checkout_minutes: i64) -> Option<OvertimeComputation> {
    let minutes = checkout_minutes - scheduled_end_minutes;

    if minutes < consts::MIN_OVERTIME_MINUTES {
        return None;
    }

    let hours = (minutes as f64 / 60.0 * 100.0).round() / 100.0;
    let total_bonus = (hours * consts::BONUS_PER_HOUR as f64).round() as i64;

    Some(OvertimeComputation {
        minutes,
        hours,
        bonus_per_hour: consts::BONUS_PER_HOUR,
        total_bonus,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_threshold() {
        assert_eq!(detect_overtime(17 * 60, 17 * 60 + 29), None);
        assert_eq!(detect_overtime(17 * 60, 17 * 60), None);
        assert_eq!(detect_overtime(17 * 60, 16 * 60), None);
    }

    #[test]
    fn test_threshold_boundary() {
        let result = detect_overtime(17 * 60, 17 * 60 + 30).unwrap();

        assert_eq!(result.minutes, 30);
        assert_eq!(result.hours, 0.5);
        assert_eq!(result.total_bonus, 25_000);
    }

    #[test]
    fn test_forty_five_minutes() {
        // Checkout 18:45 against an 18:00 end
        let result = detect_overtime(18 * 60, 18 * 60 + 45).unwrap();

        assert_eq!(result.hours, 0.75);
        assert_eq!(result.total_bonus, 37_500);
    }

    #[test]
    fn test_rounding() {
        // 100 minutes = 1.6666… hours, rounds to 1.67
        let result = detect_overtime(17 * 60, 18 * 60 + 40).unwrap();

        assert_eq!(result.hours, 1.67);
        assert_eq!(result.total_bonus, 83_500);
    }
}
