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
    engine::{attendance::classify_check_in, overtime::detect_overtime, schedule::ScheduleWindow},
    entity::{employee_schedule, prelude::*, work_schedule},
    error::ApiError,
    utils,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(assign)
        .service(check_attendance)
        .service(by_employee)
        .service(list)
        .service(get_one)
        .service(create)
        .service(update)
        .service(remove);
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateSchedule {
    schedule_name: String,
    shift_type: String,
    start_time: String,
    end_time: String,
    break_duration: Option<i32>,
    work_days: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct UpdateSchedule {
    schedule_name: Option<String>,
    shift_type: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    break_duration: Option<i32>,
    work_days: Option<String>,
    is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AssignSchedule {
    employee_id: Uuid,
    schedule_id: Uuid,
    effective_date: NaiveDate,
    end_date: Option<NaiveDate>,
    notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckAttendancePreview {
    schedule_id: Uuid,
    jam_masuk: String,
    jam_pulang: Option<String>,
}

#[get("")]
async fn list(db: web::Data<DatabaseConnection>, _user: TokenUser) -> Result<impl Responder, ApiError> {
    let rows = WorkSchedule::find()
        .order_by_asc(work_schedule::Column::ScheduleName)
        .all(db.as_ref()).await?;

    Ok(web::Json(rows))
}

#[get("/{schedule_id}")]
async fn get_one(
    db: web::Data<DatabaseConnection>,
    _user: TokenUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let Some(schedule) = WorkSchedule::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Jadwal tidak ditemukan"));
    };

    Ok(web::Json(schedule))
}

#[post("")]
async fn create(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    payload: web::Json<CreateSchedule>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    if utils::parse_clock(&payload.start_time).is_none() {
        return Err(ApiError::bad_request("start_time harus berformat HH:MM"));
    }
    if utils::parse_clock(&payload.end_time).is_none() {
        return Err(ApiError::bad_request("end_time harus berformat HH:MM"));
    }
    if payload.schedule_name.trim().is_empty() {
        return Err(ApiError::bad_request("Nama jadwal wajib diisi"));
    }

    let now = Local::now().fixed_offset();

    let schedule = WorkSchedule::insert(work_schedule::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        schedule_name: Set(payload.schedule_name.trim().to_string()),
        shift_type: Set(payload.shift_type),
        start_time: Set(payload.start_time),
        end_time: Set(payload.end_time),
        break_duration: Set(payload.break_duration.unwrap_or(60)),
        work_days: Set(payload.work_days.unwrap_or_else(|| "Senin-Jumat".to_string())),
        is_active: Set(true),
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Jadwal dibuat", "data": schedule })))
}

#[put("/{schedule_id}")]
async fn update(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateSchedule>,
) -> Result<impl Responder, ApiError> {
    let Some(schedule) = WorkSchedule::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Jadwal tidak ditemukan"));
    };

    for time in [&payload.start_time, &payload.end_time].into_iter().flatten() {
        if utils::parse_clock(time).is_none() {
            return Err(ApiError::bad_request("Waktu harus berformat HH:MM"));
        }
    }

    let payload = payload.into_inner();

    let updated = WorkSchedule::update(work_schedule::ActiveModel {
        id: Unchanged(schedule.id),
        updated_at: Set(Local::now().fixed_offset()),
        schedule_name: Set(payload.schedule_name.unwrap_or(schedule.schedule_name)),
        shift_type: Set(payload.shift_type.unwrap_or(schedule.shift_type)),
        start_time: Set(payload.start_time.unwrap_or(schedule.start_time)),
        end_time: Set(payload.end_time.unwrap_or(schedule.end_time)),
        break_duration: Set(payload.break_duration.unwrap_or(schedule.break_duration)),
        work_days: Set(payload.work_days.unwrap_or(schedule.work_days)),
        is_active: Set(payload.is_active.unwrap_or(schedule.is_active)),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(web::Json(json!({ "message": "Jadwal diperbarui", "data": updated })))
}

/// Refused while any active assignment still references the schedule.
#[delete("/{schedule_id}")]
async fn remove(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let Some(schedule) = WorkSchedule::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Jadwal tidak ditemukan"));
    };

    let in_use = EmployeeSchedule::find()
        .filter(employee_schedule::Column::ScheduleId.eq(schedule.id))
        .filter(employee_schedule::Column::IsActive.eq(true))
        .one(db.as_ref()).await?;

    if in_use.is_some() {
        return Err(ApiError::Conflict(
            "Jadwal masih dipakai oleh karyawan aktif, pindahkan dulu penugasannya".to_string(),
        ));
    }

    WorkSchedule::delete_by_id(schedule.id).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Jadwal dihapus" })))
}

/// Assigns a schedule to an employee, deactivating any prior active
/// assignment so at most one stays active.
#[post("/assign")]
async fn assign(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    payload: web::Json<AssignSchedule>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    let employee = super::find_employee(db.as_ref(), payload.employee_id).await?;

    let Some(schedule) = WorkSchedule::find_by_id(payload.schedule_id).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Jadwal tidak ditemukan"));
    };

    let now = Local::now().fixed_offset();

    let active = EmployeeSchedule::find()
        .filter(employee_schedule::Column::EmployeeId.eq(employee.id))
        .filter(employee_schedule::Column::IsActive.eq(true))
        .all(db.as_ref()).await?;

    for assignment in active {
        EmployeeSchedule::update(employee_schedule::ActiveModel {
            id: Unchanged(assignment.id),
            updated_at: Set(now),
            is_active: Set(false),
            end_date: Set(Some(payload.effective_date)),
            ..Default::default()
        }).exec(db.as_ref()).await?;
    }

    let assignment = EmployeeSchedule::insert(employee_schedule::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        employee_id: Set(employee.id),
        schedule_id: Set(schedule.id),
        effective_date: Set(payload.effective_date),
        end_date: Set(payload.end_date),
        notes: Set(payload.notes),
        is_active: Set(true),
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": format!("Jadwal {} ditugaskan ke {}", schedule.schedule_name, employee.nama_lengkap),
        "data": assignment,
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

    let rows = EmployeeSchedule::find()
        .filter(employee_schedule::Column::EmployeeId.eq(employee_id))
        .find_also_related(WorkSchedule)
        .order_by_desc(employee_schedule::Column::EffectiveDate)
        .all(db.as_ref()).await?;

    let rows = rows.into_iter()
        .map(|(assignment, schedule)| json!({ "assignment": assignment, "schedule": schedule }))
        .collect::<Vec<_>>();

    Ok(web::Json(rows))
}

/// Dry-run of the check-in/check-out rules against a schedule. Nothing is
/// recorded.
#[post("/check-attendance")]
async fn check_attendance(
    db: web::Data<DatabaseConnection>,
    _user: TokenUser,
    payload: web::Json<CheckAttendancePreview>,
) -> Result<impl Responder, ApiError> {
    let payload = payload.into_inner();

    let Some(schedule) = WorkSchedule::find_by_id(payload.schedule_id).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Jadwal tidak ditemukan"));
    };

    let Some(masuk_minutes) = utils::parse_clock(&payload.jam_masuk) else {
        return Err(ApiError::bad_request("jam_masuk harus berformat HH:MM"));
    };

    let window = ScheduleWindow::from_times(&schedule.start_time, Some(&schedule.end_time));
    let classification = classify_check_in(masuk_minutes, window.start_minutes);

    let overtime = payload.jam_pulang.as_deref()
        .and_then(utils::parse_clock)
        .zip(window.end_minutes)
        .and_then(|(pulang, end)| detect_overtime(end, pulang));

    Ok(web::Json(json!({
        "schedule": {
            "schedule_name": schedule.schedule_name,
            "start_time": schedule.start_time,
            "end_time": schedule.end_time,
        },
        "status": classification.status,
        "keterangan": classification.keterangan,
        "late_minutes": classification.late_minutes,
        "overtime": overtime.map(|o| json!({
            "minutes": o.minutes,
            "hours": o.hours,
            "total_bonus": o.total_bonus,
        })),
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{
        auth::Authority,
        entity::{user, sea_orm_active_enums::{AccountStatus, RoleType}},
    };

    use super::*;

    fn token_for(authority: &Authority, role: RoleType) -> String {
        let account = user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            username: "hr".to_string(),
            email: "hr@example.com".to_string(),
            password: Vec::new(),
            role,
            status: AccountStatus::Active,
            reset_token: None,
            reset_token_expiry: None,
        };

        authority.issue_for(&account, None)
    }

    fn schedule_row(start_time: &str, end_time: &str) -> work_schedule::Model {
        work_schedule::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            schedule_name: "Shift Pagi".to_string(),
            shift_type: "Pagi".to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            break_duration: 60,
            work_days: "Senin-Jumat".to_string(),
            is_active: true,
        }
    }

    #[actix_web::test]
    async fn test_create_rejects_bad_clock() {
        let secret = b"secret";
        let token = token_for(&Authority::new(secret), RoleType::Hr);

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/schedules").service(create))
        ).await;

        let req = test::TestRequest::default()
            .uri("/schedules")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(CreateSchedule {
                schedule_name: "Shift Pagi".to_string(),
                shift_type: "Pagi".to_string(),
                start_time: "8 pagi".to_string(),
                end_time: "17:00".to_string(),
                break_duration: None,
                work_days: None,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_remove_refused_while_assigned() {
        let secret = b"secret";
        let token = token_for(&Authority::new(secret), RoleType::Admin);
        let schedule = schedule_row("08:00", "17:00");

        let assignment = employee_schedule::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id: Uuid::new_v4(),
            schedule_id: schedule.id,
            effective_date: Local::now().date_naive(),
            end_date: None,
            notes: None,
            is_active: true,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![schedule.clone()]])
            .append_query_results([vec![assignment]]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(remove)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", schedule.id))
            .method(Method::DELETE)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_check_attendance_preview() {
        let secret = b"secret";
        let token = token_for(&Authority::new(secret), RoleType::Karyawan);
        let schedule = schedule_row("09:00", "18:00");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![schedule.clone()]]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(check_attendance)
        ).await;

        let req = test::TestRequest::default()
            .uri("/check-attendance")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(CheckAttendancePreview {
                schedule_id: schedule.id,
                jam_masuk: "09:15".to_string(),
                jam_pulang: Some("18:45".to_string()),
            })
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["late_minutes"], 15);
        assert_eq!(body["keterangan"], "Terlambat 15 menit (Jadwal: 09:00, Check-in: 09:15)");
        assert_eq!(body["overtime"]["total_bonus"], 37_500);
    }
}
