use std::collections::HashSet;

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{Admin, AdminOrHr},
    consts,
    entity::{
        attendance, employee, leave_request,
        prelude::*,
        sea_orm_active_enums::{ApprovalStatus, AttendanceStatus, WorkType},
    },
    error::ApiError,
    pages::payroll,
    utils,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(check)
        .service(stats)
        .service(status)
        .service(excuse)
        .service(remove);
}

#[derive(Debug, Serialize, Deserialize)]
struct ExcuseAlpa {
    status: AttendanceStatus,
    keterangan: Option<String>,
}

/// Employees with neither an attendance row nor an approved leave covering
/// the given day.
async fn absentees_on(db: &DatabaseConnection, today: NaiveDate) -> Result<Vec<employee::Model>, ApiError> {
    let employees = Employee::find().all(db).await?;

    let attended = Attendance::find()
        .filter(attendance::Column::Tanggal.eq(today))
        .all(db).await?
        .into_iter()
        .map(|row| row.employee_id)
        .collect::<HashSet<_>>();

    let on_leave = LeaveRequest::find()
        .filter(leave_request::Column::Status.eq(ApprovalStatus::Approved))
        .filter(leave_request::Column::TanggalMulai.lte(today))
        .filter(leave_request::Column::TanggalSelesai.gte(today))
        .all(db).await?
        .into_iter()
        .map(|row| row.employee_id)
        .collect::<HashSet<_>>();

    Ok(employees.into_iter()
        .filter(|employee| !attended.contains(&employee.id) && !on_leave.contains(&employee.id))
        .collect())
}

/// End-of-day sweep: marks every absentee as Alpa and books the deduction.
/// Weekends are not working days, so the sweep refuses to run on them.
async fn run_sweep(db: &DatabaseConnection, today: NaiveDate) -> Result<Vec<serde_json::Value>, ApiError> {
    if !utils::is_working_day(today) {
        return Err(ApiError::bad_request("Penandaan alpa hanya berlaku pada hari kerja"));
    }

    let now = Local::now().fixed_offset();

    let absentees = absentees_on(db, today).await?;
    let mut marked = Vec::with_capacity(absentees.len());

    for employee in &absentees {
        let row = Attendance::insert(attendance::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            employee_id: Set(employee.id),
            tanggal: Set(today),
            status: Set(Some(AttendanceStatus::Alpa)),
            tipe_kerja: Set(WorkType::Wfo),
            keterangan: Set(Some("Tidak hadir tanpa keterangan".to_string())),
            recorded_by_role: Set(Some("System".to_string())),
            ..Default::default()
        }).exec_with_returning(db).await?;

        payroll::apply_alpa_deduction(db, employee, today).await?;

        marked.push(json!({
            "employee_id": employee.id,
            "nama_lengkap": employee.nama_lengkap,
            "attendance_id": row.id,
        }));
    }

    tracing::info!(count = marked.len(), %today, "alpha sweep completed");

    Ok(marked)
}

#[post("/check")]
async fn check(db: web::Data<DatabaseConnection>, _admin: AdminOrHr) -> Result<impl Responder, ApiError> {
    let today = Local::now().date_naive();
    let marked = run_sweep(db.as_ref(), today).await?;

    Ok(web::Json(json!({
        "message": format!("{} karyawan ditandai alpa", marked.len()),
        "tanggal": today,
        "marked": marked,
    })))
}

/// Same scan as the sweep, read-only. Outside working days there is nothing
/// to mark.
#[get("/status")]
async fn status(db: web::Data<DatabaseConnection>, _admin: AdminOrHr) -> Result<impl Responder, ApiError> {
    let today = Local::now().date_naive();

    if !utils::is_working_day(today) {
        return Ok(web::Json(json!({
            "tanggal": today,
            "hari_kerja": false,
            "candidate_count": 0,
            "candidates": [],
        })));
    }

    let absentees = absentees_on(db.as_ref(), today).await?;

    let candidates = absentees.iter()
        .map(|employee| json!({
            "employee_id": employee.id,
            "nama_lengkap": employee.nama_lengkap,
        }))
        .collect::<Vec<_>>();

    Ok(web::Json(json!({
        "tanggal": today,
        "hari_kerja": true,
        "candidate_count": candidates.len(),
        "candidates": candidates,
    })))
}

#[derive(Debug, Deserialize, Default)]
struct StatsFilter {
    month: Option<u32>,
    year: Option<i32>,
}

#[get("/stats")]
async fn stats(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    filter: web::Query<StatsFilter>,
) -> Result<impl Responder, ApiError> {
    let mut query = Attendance::find()
        .filter(attendance::Column::Status.eq(AttendanceStatus::Alpa));

    if let (Some(month), Some(year)) = (filter.month, filter.year) {
        let Some((start, end)) = utils::period_range(&format!("{year:04}-{month:02}")) else {
            return Err(ApiError::bad_request("Periode tidak valid"));
        };
        query = query
            .filter(attendance::Column::Tanggal.gte(start))
            .filter(attendance::Column::Tanggal.lte(end));
    }

    let rows = query.all(db.as_ref()).await?;

    let mut by_employee: std::collections::HashMap<Uuid, i64> = std::collections::HashMap::new();
    for row in &rows {
        *by_employee.entry(row.employee_id).or_default() += 1;
    }

    let per_employee = by_employee.into_iter()
        .map(|(employee_id, count)| json!({
            "employee_id": employee_id,
            "alpa_count": count,
            "total_potongan": count * consts::POTONGAN_ALPA,
        }))
        .collect::<Vec<_>>();

    Ok(web::Json(json!({
        "total_alpa": rows.len(),
        "total_potongan": rows.len() as i64 * consts::POTONGAN_ALPA,
        "per_employee": per_employee,
    })))
}

/// Reclassifies a mistaken Alpa into Izin or Sakit and books the rate
/// difference back onto the payroll row.
#[put("/excuse/{attendance_id}")]
async fn excuse(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    record: attendance::Model,
    payload: web::Json<ExcuseAlpa>,
) -> Result<impl Responder, ApiError> {
    if record.status != Some(AttendanceStatus::Alpa) {
        return Err(ApiError::bad_request("Hanya absensi alpa yang dapat dikoreksi"));
    }

    let new_rate = match payload.status {
        AttendanceStatus::Izin => consts::POTONGAN_IZIN,
        AttendanceStatus::Sakit => consts::POTONGAN_SAKIT,
        _ => return Err(ApiError::bad_request("Status koreksi harus Izin atau Sakit")),
    };

    let updated = Attendance::update(attendance::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        status: Set(Some(payload.status.clone())),
        keterangan: Set(payload.keterangan.clone()
            .or_else(|| Some(format!("Koreksi alpa menjadi {:?}", payload.status)))),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    let employee = super::find_employee(db.as_ref(), record.employee_id).await?;

    payroll::apply_deduction(
        db.as_ref(),
        &employee,
        &utils::period_of(record.tanggal),
        new_rate - consts::POTONGAN_ALPA,
        &format!("Koreksi alpa {} menjadi {:?}", record.tanggal, payload.status),
    ).await?;

    Ok(web::Json(json!({ "message": "Absensi dikoreksi", "data": updated })))
}

/// Hard removal of an Alpa row, including its deduction.
#[delete("/remove/{attendance_id}")]
async fn remove(
    db: web::Data<DatabaseConnection>,
    _admin: Admin,
    record: attendance::Model,
) -> Result<HttpResponse, ApiError> {
    if record.status != Some(AttendanceStatus::Alpa) {
        return Err(ApiError::bad_request("Hanya absensi alpa yang dapat dihapus lewat endpoint ini"));
    }

    Attendance::delete_by_id(record.id).exec(db.as_ref()).await?;

    let employee = super::find_employee(db.as_ref(), record.employee_id).await?;

    payroll::apply_deduction(
        db.as_ref(),
        &employee,
        &utils::period_of(record.tanggal),
        -consts::POTONGAN_ALPA,
        &format!("Pembatalan alpa {}", record.tanggal),
    ).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Absensi alpa dihapus" })))
}
