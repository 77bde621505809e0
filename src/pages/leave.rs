use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{AdminOrHr, TokenUser},
    entity::{
        leave_request,
        prelude::*,
        sea_orm_active_enums::{ApprovalStatus, LeaveType},
    },
    error::ApiError,
    pages::ApprovalAction,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(list)
        .service(create)
        .service(update_status)
        .service(remove)
        .service(by_employee);
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateLeave {
    tanggal_mulai: NaiveDate,
    tanggal_selesai: NaiveDate,
    jenis_pengajuan: LeaveType,
    alasan: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct UpdateLeaveStatus {
    action: ApprovalAction,
    notes: Option<String>,
}

#[get("")]
async fn list(db: web::Data<DatabaseConnection>, user: TokenUser) -> Result<impl Responder, ApiError> {
    let mut query = LeaveRequest::find();

    if let Some(employee_id) = super::scope_filter(&user)? {
        query = query.filter(leave_request::Column::EmployeeId.eq(employee_id));
    }

    let rows = query
        .find_also_related(Employee)
        .order_by_desc(leave_request::Column::TanggalPengajuan)
        .all(db.as_ref()).await?;

    let rows = rows.into_iter()
        .map(|(leave, employee)| json!({ "leave": leave, "employee": employee }))
        .collect::<Vec<_>>();

    Ok(web::Json(rows))
}

#[post("")]
async fn create(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = user.employee_id
        .ok_or_else(|| ApiError::bad_request("profil karyawan belum dilengkapi"))?;
    let payload = payload.into_inner();

    if payload.tanggal_selesai < payload.tanggal_mulai {
        return Err(ApiError::bad_request("Tanggal selesai sebelum tanggal mulai"));
    }
    if payload.alasan.trim().is_empty() {
        return Err(ApiError::bad_request("Alasan wajib diisi"));
    }

    let now = Local::now().fixed_offset();

    let request = LeaveRequest::insert(leave_request::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        employee_id: Set(employee_id),
        tanggal_pengajuan: Set(now.date_naive()),
        tanggal_mulai: Set(payload.tanggal_mulai),
        tanggal_selesai: Set(payload.tanggal_selesai),
        jenis_pengajuan: Set(payload.jenis_pengajuan),
        alasan: Set(payload.alasan.trim().to_string()),
        status: Set(ApprovalStatus::Pending),
        ..Default::default()
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Pengajuan berhasil dikirim, menunggu approval",
        "data": request,
    })))
}

/// One-shot decision: a request that already left `pending` stays decided.
#[put("/{leave_id}/status")]
async fn update_status(
    db: web::Data<DatabaseConnection>,
    admin: AdminOrHr,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateLeaveStatus>,
) -> Result<impl Responder, ApiError> {
    let Some(request) = LeaveRequest::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Pengajuan tidak ditemukan"));
    };

    if request.status != ApprovalStatus::Pending {
        return Err(ApiError::Conflict(format!("Pengajuan ini sudah {:?}", request.status).to_lowercase()));
    }

    let status = match payload.action {
        ApprovalAction::Approve => ApprovalStatus::Approved,
        ApprovalAction::Reject => ApprovalStatus::Rejected,
    };

    let updated = LeaveRequest::update(leave_request::ActiveModel {
        id: Unchanged(request.id),
        updated_at: Set(Local::now().fixed_offset()),
        status: Set(status),
        approved_by: Set(Some(admin.user_id)),
        approval_notes: Set(payload.notes.clone()),
        approval_date: Set(Some(Local::now().fixed_offset())),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(web::Json(json!({
        "message": match payload.action {
            ApprovalAction::Approve => "Pengajuan disetujui",
            ApprovalAction::Reject => "Pengajuan ditolak",
        },
        "data": updated,
    })))
}

/// Owners may withdraw their own request while it is still pending;
/// Admin/HR may delete any request.
#[delete("/{leave_id}")]
async fn remove(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let Some(request) = LeaveRequest::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Pengajuan tidak ditemukan"));
    };

    if !user.role.is_privileged() {
        if user.employee_id != Some(request.employee_id) {
            return Err(ApiError::forbidden("tidak boleh menghapus pengajuan karyawan lain"));
        }
        if request.status != ApprovalStatus::Pending {
            return Err(ApiError::Conflict("Pengajuan yang sudah diproses tidak dapat dihapus".to_string()));
        }
    }

    LeaveRequest::delete_by_id(request.id).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Pengajuan dihapus" })))
}

#[get("/employee/{employee_id}")]
async fn by_employee(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    super::ensure_own_rows(&user, employee_id)?;

    let rows = LeaveRequest::find()
        .filter(leave_request::Column::EmployeeId.eq(employee_id))
        .order_by_desc(leave_request::Column::TanggalPengajuan)
        .all(db.as_ref()).await?;

    Ok(web::Json(rows))
}
