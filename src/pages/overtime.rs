use actix_web::{delete, get, post, web, HttpResponse, Responder};
use chrono::Local;
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{Admin, AdminOrHr, TokenUser},
    entity::{overtime, prelude::*, sea_orm_active_enums::ApprovalStatus},
    error::ApiError,
    pages::ApprovalAction,
    utils,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(pending)
        .service(stats)
        .service(approve)
        .service(by_employee)
        .service(list)
        .service(remove);
}

#[derive(Debug, Deserialize, Default)]
struct ListFilter {
    status: Option<ApprovalStatus>,
    month: Option<u32>,
    year: Option<i32>,
    employee_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApproveOvertime {
    action: ApprovalAction,
    notes: Option<String>,
}

#[get("")]
async fn list(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    filter: web::Query<ListFilter>,
) -> Result<impl Responder, ApiError> {
    let mut query = Overtime::find();

    if let Some(status) = &filter.status {
        query = query.filter(overtime::Column::Status.eq(status.clone()));
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(overtime::Column::EmployeeId.eq(employee_id));
    }
    if let (Some(month), Some(year)) = (filter.month, filter.year) {
        let Some((start, end)) = utils::period_range(&format!("{year:04}-{month:02}")) else {
            return Err(ApiError::bad_request("Periode tidak valid"));
        };
        query = query
            .filter(overtime::Column::Tanggal.gte(start))
            .filter(overtime::Column::Tanggal.lte(end));
    }

    let rows = query
        .find_also_related(Employee)
        .order_by_desc(overtime::Column::Tanggal)
        .all(db.as_ref()).await?;

    let rows = rows.into_iter()
        .map(|(overtime, employee)| json!({ "overtime": overtime, "employee": employee }))
        .collect::<Vec<_>>();

    Ok(web::Json(rows))
}

#[get("/pending")]
async fn pending(db: web::Data<DatabaseConnection>, _admin: AdminOrHr) -> Result<impl Responder, ApiError> {
    let rows = Overtime::find()
        .filter(overtime::Column::Status.eq(ApprovalStatus::Pending))
        .find_also_related(Employee)
        .order_by_desc(overtime::Column::Tanggal)
        .all(db.as_ref()).await?;

    let rows = rows.into_iter()
        .map(|(overtime, employee)| json!({ "overtime": overtime, "employee": employee }))
        .collect::<Vec<_>>();

    Ok(web::Json(rows))
}

#[get("/stats")]
async fn stats(db: web::Data<DatabaseConnection>, _admin: AdminOrHr) -> Result<impl Responder, ApiError> {
    let rows = Overtime::find().all(db.as_ref()).await?;

    let mut counts = (0i64, 0i64, 0i64);
    let mut approved_hours = 0f64;
    let mut approved_bonus = 0i64;

    for row in &rows {
        match row.status {
            ApprovalStatus::Pending => counts.0 += 1,
            ApprovalStatus::Approved => {
                counts.1 += 1;
                approved_hours += row.overtime_hours;
                approved_bonus += row.total_bonus;
            }
            ApprovalStatus::Rejected => counts.2 += 1,
        }
    }

    Ok(web::Json(json!({
        "total": rows.len(),
        "pending": counts.0,
        "approved": counts.1,
        "rejected": counts.2,
        "approved_hours": approved_hours,
        "approved_bonus": approved_bonus,
    })))
}

#[get("/employee/{employee_id}")]
async fn by_employee(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    super::ensure_own_rows(&user, employee_id)?;

    let rows = Overtime::find()
        .filter(overtime::Column::EmployeeId.eq(employee_id))
        .order_by_desc(overtime::Column::Tanggal)
        .all(db.as_ref()).await?;

    let approved = rows.iter()
        .filter(|row| row.status == ApprovalStatus::Approved)
        .collect::<Vec<_>>();
    let approved_hours = approved.iter().map(|row| row.overtime_hours).sum::<f64>();
    let approved_bonus = approved.iter().map(|row| row.total_bonus).sum::<i64>();

    Ok(web::Json(json!({
        "summary": {
            "approved_count": approved.len(),
            "approved_hours": approved_hours,
            "approved_bonus": approved_bonus,
        },
        "records": rows,
    })))
}

/// One-shot: only pending records can be decided, and only approved ones
/// count toward payroll bonuses.
#[post("/approve/{overtime_id}")]
async fn approve(
    db: web::Data<DatabaseConnection>,
    admin: AdminOrHr,
    path: web::Path<Uuid>,
    payload: web::Json<ApproveOvertime>,
) -> Result<impl Responder, ApiError> {
    let Some(record) = Overtime::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Data overtime tidak ditemukan"));
    };

    if record.status != ApprovalStatus::Pending {
        return Err(ApiError::Conflict(format!("Overtime ini sudah {:?}", record.status).to_lowercase()));
    }

    let status = match payload.action {
        ApprovalAction::Approve => ApprovalStatus::Approved,
        ApprovalAction::Reject => ApprovalStatus::Rejected,
    };

    let updated = Overtime::update(overtime::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        status: Set(status),
        approved_by: Set(Some(admin.user_id)),
        approval_notes: Set(payload.notes.clone()),
        approval_date: Set(Some(Local::now().fixed_offset())),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(web::Json(json!({
        "message": match payload.action {
            ApprovalAction::Approve => "Overtime disetujui",
            ApprovalAction::Reject => "Overtime ditolak",
        },
        "data": updated,
    })))
}

#[delete("/{overtime_id}")]
async fn remove(
    db: web::Data<DatabaseConnection>,
    _admin: Admin,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let Some(record) = Overtime::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Data overtime tidak ditemukan"));
    };

    Overtime::delete_by_id(record.id).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Data overtime dihapus" })))
}
