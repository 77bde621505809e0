use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entity::sea_orm_active_enums::{AttendanceStatus, WorkType}, pages::ApprovalAction};

#[derive(Debug, Serialize, Deserialize, Default)]
pub(super) struct CheckIn {
    /// Required for Admin/HR, ignored for Karyawan.
    pub(super) employee_id: Option<Uuid>,
    pub(super) jam_masuk: Option<String>,
    pub(super) tipe_kerja: Option<WorkType>,
    pub(super) lokasi_masuk: Option<String>,
    pub(super) akurasi_masuk: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub(super) struct CheckOut {
    pub(super) jam_pulang: Option<String>,
    pub(super) lokasi_pulang: Option<String>,
    pub(super) akurasi_pulang: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreateAttendance {
    pub(super) employee_id: Option<Uuid>,
    pub(super) tanggal: NaiveDate,
    pub(super) jam_masuk: Option<String>,
    pub(super) jam_pulang: Option<String>,
    pub(super) status: Option<AttendanceStatus>,
    pub(super) tipe_kerja: Option<WorkType>,
    pub(super) keterangan: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub(super) struct UpdateAttendance {
    pub(super) jam_masuk: Option<String>,
    pub(super) jam_pulang: Option<String>,
    pub(super) status: Option<AttendanceStatus>,
    pub(super) tipe_kerja: Option<WorkType>,
    pub(super) keterangan: Option<String>,
    pub(super) lokasi_masuk: Option<String>,
    pub(super) lokasi_pulang: Option<String>,
    pub(super) akurasi_masuk: Option<i32>,
    pub(super) akurasi_pulang: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct RequestRemote {
    pub(super) tanggal: NaiveDate,
    pub(super) tipe_kerja: WorkType,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct ApproveAttendance {
    pub(super) action: ApprovalAction,
    pub(super) notes: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct ListFilter {
    pub(super) month: Option<u32>,
    pub(super) year: Option<i32>,
}
