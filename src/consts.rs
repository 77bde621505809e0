//! Business constants. Amounts are in whole rupiah.

/// Flat deduction applied once per late check-in.
pub const POTONGAN_TERLAMBAT: i64 = 25_000;
/// Per-day deduction for an unexcused absence.
pub const POTONGAN_ALPA: i64 = 100_000;
/// Per-day deduction for approved personal leave.
pub const POTONGAN_IZIN: i64 = 50_000;
/// Sick leave carries no deduction.
pub const POTONGAN_SAKIT: i64 = 0;

/// Overtime bonus rate per decimal hour.
pub const BONUS_PER_HOUR: i64 = 50_000;
/// Checkouts closer than this to schedule end do not count as overtime.
pub const MIN_OVERTIME_MINUTES: i64 = 30;

pub const DEFAULT_START_TIME: &str = "08:00";
pub const DEFAULT_EARLIEST_CHECK_IN: &str = "06:00";
/// Earliest check-in opens this many minutes before schedule start.
pub const EARLIEST_CHECK_IN_OFFSET_MINUTES: i64 = 60;
/// Check-ins at or after this local hour are rejected outright.
pub const ATTENDANCE_CLOSE_HOUR: u32 = 23;

pub const DEFAULT_GAJI_POKOK: i64 = 5_000_000;
