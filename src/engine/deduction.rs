use chrono::NaiveDate;

use crate::{
    consts,
    entity::{
        attendance, leave_request,
        sea_orm_active_enums::{ApprovalStatus, AttendanceStatus, LeaveType},
    },
    utils,
};

/// Per-event deduction rates. A single instance backs both the persisted
/// payroll ledger and the on-demand period report.
#[derive(Clone, Copy, Debug)]
pub struct DeductionRates {
    pub terlambat: i64,
    pub alpa: i64,
    pub izin: i64,
    pub sakit: i64,
}

impl Default for DeductionRates {
    fn default() -> Self {
        Self {
            terlambat: consts::POTONGAN_TERLAMBAT,
            alpa: consts::POTONGAN_ALPA,
            izin: consts::POTONGAN_IZIN,
            sakit: consts::POTONGAN_SAKIT,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeductionBreakdown {
    pub terlambat_count: i64,
    pub alpa_days: i64,
    pub izin_days: i64,
    pub sakit_days: i64,
    pub potongan_terlambat: i64,
    pub potongan_alpa: i64,
    pub potongan_izin: i64,
    pub potongan_sakit: i64,
    pub total: i64,
    pub alasan: String,
}

/// Inclusive day count of a leave request. A one-day leave counts as one
/// day; the `+ 1` also means a leave crossing a period boundary contributes
/// its full length to both periods.
pub fn leave_days(tanggal_mulai: NaiveDate, tanggal_selesai: NaiveDate) -> i64 {
    (tanggal_selesai - tanggal_mulai).num_days().abs() + 1
}

/// Whether a leave touches the period: starts in it, ends in it, or spans it.
pub fn leave_overlaps(
    tanggal_mulai: NaiveDate,
    tanggal_selesai: NaiveDate,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> bool {
    (tanggal_mulai >= period_start && tanggal_mulai <= period_end)
        || (tanggal_selesai >= period_start && tanggal_selesai <= period_end)
        || (tanggal_mulai < period_start && tanggal_selesai > period_end)
}

/// Prices one employee's attendance and approved leaves for a period.
///
/// Explicit statuses are counted directly. Rows with no stored status are
/// historical data from before classification existed; for those, anything
/// checked in after the fixed 08:00 threshold counts as late.
pub fn compute_deductions(
    attendances: &[attendance::Model],
    leaves: &[leave_request::Model],
    rates: &DeductionRates,
) -> DeductionBreakdown {
    let fixed_threshold = utils::parse_clock(consts::DEFAULT_START_TIME).unwrap();

    let mut breakdown = DeductionBreakdown::default();

    for row in attendances {
        match &row.status {
            Some(AttendanceStatus::Terlambat) => breakdown.terlambat_count += 1,
            Some(AttendanceStatus::Alpa) => breakdown.alpa_days += 1,
            Some(AttendanceStatus::Izin) => breakdown.izin_days += 1,
            Some(AttendanceStatus::Sakit) => breakdown.sakit_days += 1,
            Some(_) => {}
            None => {
                let late = row.jam_masuk.as_deref()
                    .and_then(utils::parse_clock)
                    .is_some_and(|masuk| masuk > fixed_threshold);

                if late {
                    breakdown.terlambat_count += 1;
                }
            }
        }
    }

    for leave in leaves {
        if leave.status != ApprovalStatus::Approved {
            continue;
        }

        let days = leave_days(leave.tanggal_mulai, leave.tanggal_selesai);

        match leave.jenis_pengajuan {
            LeaveType::Sakit => breakdown.sakit_days += days,
            LeaveType::Izin | LeaveType::Cuti => breakdown.izin_days += days,
        }
    }

    breakdown.potongan_terlambat = breakdown.terlambat_count * rates.terlambat;
    breakdown.potongan_alpa = breakdown.alpa_days * rates.alpa;
    breakdown.potongan_izin = breakdown.izin_days * rates.izin;
    breakdown.potongan_sakit = breakdown.sakit_days * rates.sakit;
    breakdown.total = breakdown.potongan_terlambat
        + breakdown.potongan_alpa
        + breakdown.potongan_izin
        + breakdown.potongan_sakit;
    breakdown.alasan = render_alasan(&breakdown);

    breakdown
}

pub fn net_salary(gaji_pokok: i64, tunjangan: i64, total_potongan: i64) -> i64 {
    gaji_pokok + tunjangan - total_potongan
}

fn render_alasan(breakdown: &DeductionBreakdown) -> String {
    let mut parts = Vec::new();

    if breakdown.terlambat_count > 0 {
        parts.push(format!(
            "Terlambat {}x (Rp {})",
            breakdown.terlambat_count, breakdown.potongan_terlambat
        ));
    }
    if breakdown.alpa_days > 0 {
        parts.push(format!(
            "Alpa {} hari (Rp {})",
            breakdown.alpa_days, breakdown.potongan_alpa
        ));
    }
    if breakdown.izin_days > 0 {
        parts.push(format!(
            "Izin {} hari (Rp {})",
            breakdown.izin_days, breakdown.potongan_izin
        ));
    }
    if breakdown.sakit_days > 0 {
        parts.push(format!("Sakit {} hari (tanpa potongan)", breakdown.sakit_days));
    }

    if parts.is_empty() {
        "Tidak ada potongan".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use uuid::Uuid;

    use crate::entity::sea_orm_active_enums::WorkType;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn attendance_row(status: Option<AttendanceStatus>, jam_masuk: Option<&str>) -> attendance::Model {
        attendance::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id: Uuid::new_v4(),
            tanggal: date(2024, 6, 3),
            jam_masuk: jam_masuk.map(str::to_string),
            jam_pulang: None,
            status,
            tipe_kerja: WorkType::Wfo,
            keterangan: None,
            lokasi_masuk: None,
            lokasi_pulang: None,
            akurasi_masuk: None,
            akurasi_pulang: None,
            approval_status: None,
            approved_by: None,
            approval_notes: None,
            approval_date: None,
            recorded_by_role: None,
        }
    }

    fn leave_row(
        jenis: LeaveType,
        status: ApprovalStatus,
        mulai: NaiveDate,
        selesai: NaiveDate,
    ) -> leave_request::Model {
        leave_request::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id: Uuid::new_v4(),
            tanggal_pengajuan: mulai,
            tanggal_mulai: mulai,
            tanggal_selesai: selesai,
            jenis_pengajuan: jenis,
            alasan: "tes".to_string(),
            status,
            approved_by: None,
            approval_notes: None,
            approval_date: None,
        }
    }

    #[test]
    fn test_leave_days_inclusive() {
        assert_eq!(leave_days(date(2024, 6, 3), date(2024, 6, 3)), 1);
        assert_eq!(leave_days(date(2024, 6, 3), date(2024, 6, 7)), 5);
    }

    #[test]
    fn test_leave_overlaps() {
        let (start, end) = (date(2024, 6, 1), date(2024, 6, 30));

        assert!(leave_overlaps(date(2024, 6, 28), date(2024, 7, 2), start, end));
        assert!(leave_overlaps(date(2024, 5, 28), date(2024, 6, 2), start, end));
        assert!(leave_overlaps(date(2024, 5, 1), date(2024, 7, 31), start, end));
        assert!(!leave_overlaps(date(2024, 7, 1), date(2024, 7, 5), start, end));
    }

    #[test]
    fn test_compute_deductions_counts_statuses() {
        let attendances = vec![
            attendance_row(Some(AttendanceStatus::Terlambat), Some("09:15")),
            attendance_row(Some(AttendanceStatus::Terlambat), Some("08:10")),
            attendance_row(Some(AttendanceStatus::Hadir), Some("07:55")),
            attendance_row(Some(AttendanceStatus::Alpa), None),
        ];

        let breakdown = compute_deductions(&attendances, &[], &DeductionRates::default());

        assert_eq!(breakdown.terlambat_count, 2);
        assert_eq!(breakdown.potongan_terlambat, 50_000);
        assert_eq!(breakdown.alpa_days, 1);
        assert_eq!(breakdown.potongan_alpa, 100_000);
        assert_eq!(breakdown.total, 150_000);
        assert_eq!(breakdown.alasan, "Terlambat 2x (Rp 50000), Alpa 1 hari (Rp 100000)");
    }

    #[test]
    fn test_statusless_rows_use_fixed_threshold() {
        let attendances = vec![
            attendance_row(None, Some("08:01")),
            attendance_row(None, Some("08:00")),
            attendance_row(None, None),
        ];

        let breakdown = compute_deductions(&attendances, &[], &DeductionRates::default());

        assert_eq!(breakdown.terlambat_count, 1);
        assert_eq!(breakdown.total, 25_000);
    }

    #[test]
    fn test_leaves_routed_by_type() {
        let leaves = vec![
            leave_row(LeaveType::Sakit, ApprovalStatus::Approved, date(2024, 6, 3), date(2024, 6, 4)),
            leave_row(LeaveType::Izin, ApprovalStatus::Approved, date(2024, 6, 10), date(2024, 6, 10)),
            leave_row(LeaveType::Cuti, ApprovalStatus::Approved, date(2024, 6, 17), date(2024, 6, 18)),
            leave_row(LeaveType::Izin, ApprovalStatus::Pending, date(2024, 6, 24), date(2024, 6, 28)),
        ];

        let breakdown = compute_deductions(&[], &leaves, &DeductionRates::default());

        assert_eq!(breakdown.sakit_days, 2);
        assert_eq!(breakdown.potongan_sakit, 0);
        assert_eq!(breakdown.izin_days, 3);
        assert_eq!(breakdown.potongan_izin, 150_000);
        assert_eq!(breakdown.total, 150_000);
    }

    #[test]
    fn test_no_events() {
        let breakdown = compute_deductions(&[], &[], &DeductionRates::default());

        assert_eq!(breakdown.total, 0);
        assert_eq!(breakdown.alasan, "Tidak ada potongan");
    }

    #[test]
    fn test_net_salary() {
        assert_eq!(net_salary(5_000_000, 500_000, 150_000), 5_350_000);
    }
}
