use actix_web::{get, web, Responder};
use chrono::Local;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;

use crate::{
    auth::AdminOrHr,
    entity::{
        attendance, leave_request, overtime, payroll,
        prelude::*,
        sea_orm_active_enums::{ApprovalStatus, AttendanceStatus},
    },
    error::ApiError,
    utils,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
}

/// One-call summary backing the management dashboard.
#[get("/dashboard")]
async fn dashboard(db: web::Data<DatabaseConnection>, _admin: AdminOrHr) -> Result<impl Responder, ApiError> {
    let today = Local::now().date_naive();
    let periode = utils::period_of(today);

    let employee_count = Employee::find().all(db.as_ref()).await?.len();

    let today_attendance = Attendance::find()
        .filter(attendance::Column::Tanggal.eq(today))
        .all(db.as_ref()).await?;

    let mut hadir = 0;
    let mut terlambat = 0;
    let mut alpa = 0;
    let mut izin_sakit = 0;
    for row in &today_attendance {
        match row.status {
            Some(AttendanceStatus::Hadir) | Some(AttendanceStatus::Approved) => hadir += 1,
            Some(AttendanceStatus::Terlambat) => terlambat += 1,
            Some(AttendanceStatus::Alpa) => alpa += 1,
            Some(AttendanceStatus::Izin) | Some(AttendanceStatus::Sakit) => izin_sakit += 1,
            _ => {}
        }
    }

    let pending_leaves = LeaveRequest::find()
        .filter(leave_request::Column::Status.eq(ApprovalStatus::Pending))
        .all(db.as_ref()).await?
        .len();

    let pending_overtime = Overtime::find()
        .filter(overtime::Column::Status.eq(ApprovalStatus::Pending))
        .all(db.as_ref()).await?
        .len();

    let payrolls = Payroll::find()
        .filter(payroll::Column::Periode.eq(periode.clone()))
        .all(db.as_ref()).await?;

    Ok(web::Json(json!({
        "tanggal": today,
        "periode": periode,
        "employee_count": employee_count,
        "attendance_today": {
            "recorded": today_attendance.len(),
            "hadir": hadir,
            "terlambat": terlambat,
            "alpa": alpa,
            "izin_sakit": izin_sakit,
            "belum_tercatat": employee_count.saturating_sub(today_attendance.len()),
        },
        "pending_leaves": pending_leaves,
        "pending_overtime": pending_overtime,
        "payroll_this_month": {
            "slip_count": payrolls.len(),
            "total_potongan": payrolls.iter().map(|row| row.potongan).sum::<i64>(),
            "total_gaji": payrolls.iter().map(|row| row.total_gaji).sum::<i64>(),
        },
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::{
        auth::Authority,
        entity::{employee, user, sea_orm_active_enums::{AccountStatus, RoleType, WorkType}},
    };

    use super::*;

    fn employee_row() -> employee::Model {
        employee::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            user_id: Uuid::new_v4(),
            nama_lengkap: "Karyawan".to_string(),
            jenis_kelamin: None,
            alamat: None,
            no_hp: None,
            jabatan: None,
            status_karyawan: "Tetap".to_string(),
            gaji_pokok: 5_000_000,
            tanggal_masuk: Local::now().date_naive(),
        }
    }

    fn attendance_row(status: AttendanceStatus) -> attendance::Model {
        attendance::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id: Uuid::new_v4(),
            tanggal: Local::now().date_naive(),
            jam_masuk: Some("08:00".to_string()),
            jam_pulang: None,
            status: Some(status),
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

    #[actix_web::test]
    async fn test_dashboard_counts() {
        let secret = b"secret";
        let authority = Authority::new(secret);

        let account = user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            username: "hr".to_string(),
            email: "hr@example.com".to_string(),
            password: Vec::new(),
            role: RoleType::Hr,
            status: AccountStatus::Active,
            reset_token: None,
            reset_token_expiry: None,
        };
        let token = authority.issue_for(&account, None);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![employee_row(), employee_row(), employee_row()]])
            .append_query_results([vec![
                attendance_row(AttendanceStatus::Hadir),
                attendance_row(AttendanceStatus::Terlambat),
            ]])
            .append_query_results([Vec::<leave_request::Model>::new()])
            .append_query_results([Vec::<overtime::Model>::new()])
            .append_query_results([Vec::<payroll::Model>::new()]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(dashboard)
        ).await;

        let req = test::TestRequest::default()
            .uri("/dashboard")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["employee_count"], 3);
        assert_eq!(body["attendance_today"]["hadir"], 1);
        assert_eq!(body["attendance_today"]["terlambat"], 1);
        assert_eq!(body["attendance_today"]["belum_tercatat"], 1);
        assert_eq!(body["pending_leaves"], 0);
    }
}
