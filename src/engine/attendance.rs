use crate::{entity::sea_orm_active_enums::AttendanceStatus, utils};

/// Outcome of classifying a check-in time against the schedule start.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckInClassification {
    pub status: AttendanceStatus,
    pub keterangan: String,
    /// Minutes past the schedule start; zero when on time or early.
    pub late_minutes: i64,
}

impl CheckInClassification {
    pub fn is_late(&self) -> bool {
        self.late_minutes > 0
    }
}

/// Late iff the check-in is strictly after the schedule start. Arriving at
/// the exact start minute counts as on time.
pub fn classify_check_in(now_minutes: i64, start_minutes: i64) -> CheckInClassification {
    if now_minutes > start_minutes {
        let late_minutes = now_minutes - start_minutes;

        CheckInClassification {
            status: AttendanceStatus::Terlambat,
            keterangan: format!(
                "Terlambat {} (Jadwal: {}, Check-in: {})",
                utils::format_duration(late_minutes),
                utils::format_clock(start_minutes),
                utils::format_clock(now_minutes),
            ),
            late_minutes,
        }
    } else {
        let early_minutes = start_minutes - now_minutes;

        let keterangan = if early_minutes > 0 {
            format!("Check-in lebih awal {early_minutes} menit dari jadwal")
        } else {
            "Check-in tepat waktu".to_string()
        };

        CheckInClassification {
            status: AttendanceStatus::Hadir,
            keterangan,
            late_minutes: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_check_in() {
        // 09:15 against a 09:00 start
        let result = classify_check_in(9 * 60 + 15, 9 * 60);

        assert_eq!(result.status, AttendanceStatus::Terlambat);
        assert!(result.is_late());
        assert_eq!(result.late_minutes, 15);
        assert_eq!(result.keterangan, "Terlambat 15 menit (Jadwal: 09:00, Check-in: 09:15)");
    }

    #[test]
    fn test_late_over_an_hour() {
        let result = classify_check_in(9 * 60 + 20, 8 * 60);

        assert_eq!(result.keterangan, "Terlambat 1 jam 20 menit (Jadwal: 08:00, Check-in: 09:20)");
    }

    #[test]
    fn test_exactly_on_time() {
        let result = classify_check_in(8 * 60, 8 * 60);

        assert_eq!(result.status, AttendanceStatus::Hadir);
        assert!(!result.is_late());
        assert_eq!(result.keterangan, "Check-in tepat waktu");
    }

    #[test]
    fn test_early_check_in() {
        let result = classify_check_in(7 * 60 + 40, 8 * 60);

        assert_eq!(result.status, AttendanceStatus::Hadir);
        assert_eq!(result.keterangan, "Check-in lebih awal 20 menit dari jadwal");
    }
}
