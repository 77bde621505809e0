use actix_web::web;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::TokenUser,
    entity::{employee, prelude::*},
    error::ApiError,
};

mod alpha;
mod attendance;
mod employees;
mod leave;
mod overtime;
mod payroll;
mod schedule;
mod stats;
mod subscription;
mod users;

/// Base URL of the web frontend, used in emailed links.
pub struct FrontendUrl(pub String);

/// The one-shot approval verb shared by every approval endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ApprovalAction {
    Approve,
    Reject,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/users")
            .configure(users::config))
        .service(web::scope("/employees")
            .configure(employees::config))
        .service(web::scope("/attendance")
            .configure(attendance::config))
        .service(web::scope("/leave")
            .configure(leave::config))
        .service(web::scope("/overtime")
            .configure(overtime::config))
        .service(web::scope("/payroll")
            .configure(payroll::config))
        .service(web::scope("/schedules")
            .configure(schedule::config))
        .service(web::scope("/alpha")
            .configure(alpha::config))
        .service(web::scope("/subscription")
            .configure(subscription::config))
        .service(web::scope("/stats")
            .configure(stats::config));
}

/// The employee row behind an authenticated user. Accounts that have not
/// completed their profile have none.
pub(crate) async fn employee_of(db: &DatabaseConnection, user: &TokenUser) -> Result<employee::Model, ApiError> {
    let employee_id = user.employee_id
        .ok_or_else(|| ApiError::bad_request("profil karyawan belum dilengkapi"))?;

    Employee::find_by_id(employee_id)
        .one(db).await?
        .ok_or_else(|| ApiError::not_found("data karyawan tidak ditemukan"))
}

pub(crate) async fn find_employee(db: &DatabaseConnection, employee_id: Uuid) -> Result<employee::Model, ApiError> {
    Employee::find_by_id(employee_id)
        .one(db).await?
        .ok_or_else(|| ApiError::not_found("data karyawan tidak ditemukan"))
}

/// Non-privileged users may only read their own rows.
pub(crate) fn ensure_own_rows(user: &TokenUser, employee_id: Uuid) -> Result<(), ApiError> {
    if user.role.is_privileged() || user.employee_id == Some(employee_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("tidak boleh mengakses data karyawan lain"))
    }
}

/// `None` for Admin/HR (no filtering), the caller's own employee id
/// otherwise.
pub(crate) fn scope_filter(user: &TokenUser) -> Result<Option<Uuid>, ApiError> {
    if user.role.is_privileged() {
        Ok(None)
    } else {
        Ok(Some(user.employee_id
            .ok_or_else(|| ApiError::bad_request("profil karyawan belum dilengkapi"))?))
    }
}
