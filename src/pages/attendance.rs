use std::str::FromStr;

use actix_web::{delete, dev, get, post, put, web, FromRequest, HttpRequest, HttpResponse, Responder};
use chrono::{Local, Timelike as _};
use futures_util::future::LocalBoxFuture;
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{AdminOrHr, TokenUser},
    consts,
    engine::{attendance as checkin_engine, overtime as overtime_engine, schedule::ScheduleWindow},
    entity::{
        attendance, employee_schedule, overtime,
        prelude::*,
        sea_orm_active_enums::{ApprovalStatus, AttendanceStatus, WorkType},
    },
    error::ApiError,
    pages::{payroll, ApprovalAction},
    utils,
};

use extractor::PendingRequest;
use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(check_in)
        .service(check_out)
        .service(request_remote)
        .service(pending_approvals)
        .service(approve_request)
        .service(by_employee)
        .service(list)
        .service(create)
        .service(get_one)
        .service(update)
        .service(remove);
}

/// Resolves the employee a check-in or manual entry targets: Karyawan always
/// act on themselves, Admin/HR must name the employee.
fn target_employee_id(user: &TokenUser, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
    if user.role.is_privileged() {
        requested.ok_or_else(|| ApiError::bad_request("employee_id wajib diisi"))
    } else {
        user.employee_id.ok_or_else(|| ApiError::bad_request("profil karyawan belum dilengkapi"))
    }
}

async fn active_schedule_window(
    db: &DatabaseConnection,
    employee_id: Uuid,
) -> Result<(ScheduleWindow, bool), ApiError> {
    let assignment = EmployeeSchedule::find()
        .filter(employee_schedule::Column::EmployeeId.eq(employee_id))
        .filter(employee_schedule::Column::IsActive.eq(true))
        .find_also_related(WorkSchedule)
        .one(db).await?;

    match assignment {
        Some((_, Some(schedule))) => Ok((
            ScheduleWindow::from_times(&schedule.start_time, Some(&schedule.end_time)),
            true,
        )),
        _ => Ok((ScheduleWindow::default(), false)),
    }
}

#[get("")]
async fn list(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    filter: web::Query<ListFilter>,
) -> Result<impl Responder, ApiError> {
    let mut query = Attendance::find();

    if let Some(employee_id) = super::scope_filter(&user)? {
        query = query.filter(attendance::Column::EmployeeId.eq(employee_id));
    }

    if let (Some(month), Some(year)) = (filter.month, filter.year) {
        let Some((start, end)) = utils::period_range(&format!("{year:04}-{month:02}")) else {
            return Err(ApiError::bad_request("Periode tidak valid"));
        };
        query = query
            .filter(attendance::Column::Tanggal.gte(start))
            .filter(attendance::Column::Tanggal.lte(end));
    }

    let rows = query
        .find_also_related(Employee)
        .order_by_desc(attendance::Column::Tanggal)
        .all(db.as_ref()).await?;

    let rows = rows.into_iter()
        .map(|(attendance, employee)| json!({ "attendance": attendance, "employee": employee }))
        .collect::<Vec<_>>();

    Ok(web::Json(rows))
}

#[get("/{attendance_id}")]
async fn get_one(user: TokenUser, attendance: attendance::Model) -> Result<impl Responder, ApiError> {
    super::ensure_own_rows(&user, attendance.employee_id)?;

    Ok(web::Json(attendance))
}

#[post("")]
async fn create(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    payload: web::Json<CreateAttendance>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let employee_id = target_employee_id(&user, payload.employee_id)?;
    let employee = super::find_employee(db.as_ref(), employee_id).await?;

    let existing = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Tanggal.eq(payload.tanggal))
        .one(db.as_ref()).await?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Sudah ada absensi untuk tanggal ini".to_string()));
    }

    let now = Local::now().fixed_offset();

    let record = Attendance::insert(attendance::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        employee_id: Set(employee_id),
        tanggal: Set(payload.tanggal),
        jam_masuk: Set(payload.jam_masuk.clone()),
        jam_pulang: Set(payload.jam_pulang),
        status: Set(payload.status.clone()),
        tipe_kerja: Set(payload.tipe_kerja.unwrap_or(WorkType::Wfo)),
        keterangan: Set(payload.keterangan),
        recorded_by_role: Set(Some(format!("{:?}", user.role))),
        ..Default::default()
    }).exec_with_returning(db.as_ref()).await?;

    // A manually entered late day still accumulates its deduction
    if payload.status == Some(AttendanceStatus::Terlambat) {
        let jam = payload.jam_masuk.as_deref().unwrap_or("-");
        payroll::apply_late_deduction(db.as_ref(), &employee, payload.tanggal, jam).await?;
    }

    Ok(HttpResponse::Created().json(record))
}

#[put("/{attendance_id}")]
async fn update(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    attendance: attendance::Model,
    payload: web::Json<UpdateAttendance>,
) -> Result<impl Responder, ApiError> {
    super::ensure_own_rows(&user, attendance.employee_id)?;
    let payload = payload.into_inner();

    let updated = Attendance::update(attendance::ActiveModel {
        id: Unchanged(attendance.id),
        updated_at: Set(Local::now().fixed_offset()),
        jam_masuk: payload.jam_masuk.map(|v| Set(Some(v))).unwrap_or_default(),
        jam_pulang: payload.jam_pulang.map(|v| Set(Some(v))).unwrap_or_default(),
        status: payload.status.map(|v| Set(Some(v))).unwrap_or_default(),
        tipe_kerja: payload.tipe_kerja.map(Set).unwrap_or_default(),
        keterangan: payload.keterangan.map(|v| Set(Some(v))).unwrap_or_default(),
        lokasi_masuk: payload.lokasi_masuk.map(|v| Set(Some(v))).unwrap_or_default(),
        lokasi_pulang: payload.lokasi_pulang.map(|v| Set(Some(v))).unwrap_or_default(),
        akurasi_masuk: payload.akurasi_masuk.map(|v| Set(Some(v))).unwrap_or_default(),
        akurasi_pulang: payload.akurasi_pulang.map(|v| Set(Some(v))).unwrap_or_default(),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(web::Json(updated))
}

#[delete("/{attendance_id}")]
async fn remove(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    attendance: attendance::Model,
) -> Result<HttpResponse, ApiError> {
    Attendance::delete_by_id(attendance.id).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Data absensi dihapus" })))
}

#[post("/checkin")]
async fn check_in(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    payload: web::Json<CheckIn>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let employee_id = target_employee_id(&user, payload.employee_id)?;
    let employee = super::find_employee(db.as_ref(), employee_id).await?;

    let now = Local::now();
    let now_minutes = (now.hour() * 60 + now.minute()) as i64;
    let current_time = utils::format_clock(now_minutes);
    let today = now.date_naive();

    if now.hour() >= consts::ATTENDANCE_CLOSE_HOUR {
        return Err(ApiError::bad_request(format!(
            "Absensi sudah ditutup. Waktu absen: {} - 22:59",
            consts::DEFAULT_EARLIEST_CHECK_IN
        )));
    }

    let already = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Tanggal.eq(today))
        .filter(attendance::Column::JamMasuk.is_not_null())
        .one(db.as_ref()).await?;

    if already.is_some() {
        return Err(ApiError::Conflict("Sudah melakukan check-in hari ini".to_string()));
    }

    let (window, _) = active_schedule_window(db.as_ref(), employee_id).await?;

    if let Some(wait) = window.minutes_until_open(now_minutes) {
        return Err(ApiError::bad_request(format!(
            "Belum waktunya absen. Jadwal masuk: {}, absen dibuka {} lagi (mulai {})",
            utils::format_clock(window.start_minutes),
            utils::format_duration(wait),
            utils::format_clock(window.earliest_minutes),
        )));
    }

    let classification = checkin_engine::classify_check_in(now_minutes, window.start_minutes);
    let jam_masuk = payload.jam_masuk.clone().unwrap_or_else(|| current_time.clone());

    // An approved remote-work request for today is filled in place instead
    // of inserting a second row
    let approved_request = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Tanggal.eq(today))
        .filter(attendance::Column::ApprovalStatus.eq(ApprovalStatus::Approved))
        .filter(attendance::Column::JamMasuk.is_null())
        .one(db.as_ref()).await?;

    let filled_request = approved_request.is_some();
    let now_tz = now.fixed_offset();

    let record = match approved_request {
        Some(request) => {
            Attendance::update(attendance::ActiveModel {
                id: Unchanged(request.id),
                updated_at: Set(now_tz),
                jam_masuk: Set(Some(jam_masuk.clone())),
                lokasi_masuk: Set(payload.lokasi_masuk),
                akurasi_masuk: Set(payload.akurasi_masuk),
                status: Set(Some(classification.status.clone())),
                keterangan: Set(Some(classification.keterangan.clone())),
                recorded_by_role: Set(Some(format!("{:?}", user.role))),
                ..Default::default()
            }).exec(db.as_ref()).await?
        }
        None => {
            Attendance::insert(attendance::ActiveModel {
                id: Set(Uuid::new_v4()),
                created_at: Set(now_tz),
                updated_at: Set(now_tz),
                employee_id: Set(employee_id),
                tanggal: Set(today),
                jam_masuk: Set(Some(jam_masuk.clone())),
                tipe_kerja: Set(payload.tipe_kerja.unwrap_or(WorkType::Wfo)),
                lokasi_masuk: Set(payload.lokasi_masuk),
                akurasi_masuk: Set(payload.akurasi_masuk),
                status: Set(Some(classification.status.clone())),
                keterangan: Set(Some(classification.keterangan.clone())),
                recorded_by_role: Set(Some(format!("{:?}", user.role))),
                ..Default::default()
            }).exec_with_returning(db.as_ref()).await?
        }
    };

    let potongan = if classification.is_late() {
        payroll::apply_late_deduction(db.as_ref(), &employee, today, &jam_masuk).await?;
        consts::POTONGAN_TERLAMBAT
    } else {
        0
    };

    let message = if classification.is_late() {
        format!(
            "Check-in berhasil (terlambat) pada {current_time}. {}. Potongan gaji: Rp {potongan}",
            classification.keterangan
        )
    } else {
        format!("Absen masuk berhasil pada {current_time}")
    };

    let mut response = if filled_request { HttpResponse::Ok() } else { HttpResponse::Created() };

    Ok(response.json(json!({
        "message": message,
        "status": classification.status,
        "schedule_start_time": utils::format_clock(window.start_minutes),
        "actual_checkin_time": current_time,
        "potongan": potongan,
        "data": record,
    })))
}

#[put("/checkout/{attendance_id}")]
async fn check_out(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    attendance: attendance::Model,
    payload: web::Json<CheckOut>,
) -> Result<impl Responder, ApiError> {
    super::ensure_own_rows(&user, attendance.employee_id)?;

    if attendance.jam_pulang.is_some() {
        return Err(ApiError::Conflict("Sudah melakukan check-out".to_string()));
    }

    let now = Local::now();
    let jam_pulang = payload.jam_pulang.clone()
        .unwrap_or_else(|| utils::format_clock((now.hour() * 60 + now.minute()) as i64));

    let payload = payload.into_inner();

    let updated = Attendance::update(attendance::ActiveModel {
        id: Unchanged(attendance.id),
        updated_at: Set(now.fixed_offset()),
        jam_pulang: Set(Some(jam_pulang.clone())),
        lokasi_pulang: Set(payload.lokasi_pulang),
        akurasi_pulang: Set(payload.akurasi_pulang),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    let overtime = detect_and_record_overtime(db.as_ref(), &attendance, &jam_pulang).await?;

    let message = match &overtime {
        Some(overtime) => format!(
            "Check-out berhasil pada {jam_pulang}. Overtime terdeteksi: {} jam, bonus Rp {} (menunggu approval)",
            overtime.overtime_hours, overtime.total_bonus
        ),
        None => format!("Check-out berhasil pada {jam_pulang}"),
    };

    Ok(web::Json(json!({
        "message": message,
        "data": updated,
        "overtime": overtime,
    })))
}

/// Checkout past the scheduled end by at least the minimum margin opens a
/// pending overtime record. No active schedule means no overtime.
async fn detect_and_record_overtime(
    db: &DatabaseConnection,
    attendance: &attendance::Model,
    jam_pulang: &str,
) -> Result<Option<overtime::Model>, ApiError> {
    let assignment = EmployeeSchedule::find()
        .filter(employee_schedule::Column::EmployeeId.eq(attendance.employee_id))
        .filter(employee_schedule::Column::IsActive.eq(true))
        .find_also_related(WorkSchedule)
        .one(db).await?;

    let Some((_, Some(schedule))) = assignment else {
        return Ok(None);
    };

    let (Some(end_minutes), Some(checkout_minutes)) =
        (utils::parse_clock(&schedule.end_time), utils::parse_clock(jam_pulang))
    else {
        return Ok(None);
    };

    let Some(computation) = overtime_engine::detect_overtime(end_minutes, checkout_minutes) else {
        return Ok(None);
    };

    let now = Local::now().fixed_offset();

    let record = Overtime::insert(overtime::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        employee_id: Set(attendance.employee_id),
        attendance_id: Set(attendance.id),
        tanggal: Set(attendance.tanggal),
        jam_checkout: Set(jam_pulang.to_string()),
        jam_scheduled: Set(schedule.end_time.clone()),
        overtime_hours: Set(computation.hours),
        bonus_per_hour: Set(computation.bonus_per_hour),
        total_bonus: Set(computation.total_bonus),
        status: Set(ApprovalStatus::Pending),
        reason: Set(format!(
            "Lembur {} setelah jadwal berakhir ({})",
            utils::format_duration(computation.minutes),
            schedule.end_time
        )),
        ..Default::default()
    }).exec_with_returning(db).await?;

    Ok(Some(record))
}

#[post("/request-wfh")]
async fn request_remote(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    payload: web::Json<RequestRemote>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = user.employee_id
        .ok_or_else(|| ApiError::bad_request("profil karyawan belum dilengkapi"))?;

    if payload.tipe_kerja == WorkType::Wfo {
        return Err(ApiError::bad_request("Tipe kerja harus WFH atau Hybrid"));
    }

    let existing = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Tanggal.eq(payload.tanggal))
        .one(db.as_ref()).await?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Sudah ada absensi untuk tanggal ini".to_string()));
    }

    let now = Local::now().fixed_offset();

    let request = Attendance::insert(attendance::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        employee_id: Set(employee_id),
        tanggal: Set(payload.tanggal),
        tipe_kerja: Set(payload.tipe_kerja.clone()),
        status: Set(Some(AttendanceStatus::PendingApproval)),
        approval_status: Set(Some(ApprovalStatus::Pending)),
        recorded_by_role: Set(Some("Karyawan".to_string())),
        ..Default::default()
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Request berhasil dikirim, menunggu approval admin",
        "data": request,
    })))
}

#[get("/pending-approvals")]
async fn pending_approvals(db: web::Data<DatabaseConnection>, _admin: AdminOrHr) -> Result<impl Responder, ApiError> {
    let requests = Attendance::find()
        .filter(attendance::Column::ApprovalStatus.eq(ApprovalStatus::Pending))
        .find_also_related(Employee)
        .order_by_desc(attendance::Column::Tanggal)
        .all(db.as_ref()).await?;

    let requests = requests.into_iter()
        .map(|(attendance, employee)| json!({ "attendance": attendance, "employee": employee }))
        .collect::<Vec<_>>();

    Ok(web::Json(requests))
}

#[post("/approve/{attendance_id}")]
async fn approve_request(
    db: web::Data<DatabaseConnection>,
    admin: AdminOrHr,
    request: PendingRequest,
    payload: web::Json<ApproveAttendance>,
) -> Result<impl Responder, ApiError> {
    let (approval_status, status) = match payload.action {
        ApprovalAction::Approve => (ApprovalStatus::Approved, AttendanceStatus::Approved),
        ApprovalAction::Reject => (ApprovalStatus::Rejected, AttendanceStatus::Rejected),
    };

    let updated = Attendance::update(attendance::ActiveModel {
        id: Unchanged(request.id),
        updated_at: Set(Local::now().fixed_offset()),
        approval_status: Set(Some(approval_status)),
        status: Set(Some(status)),
        approved_by: Set(Some(admin.user_id)),
        approval_notes: Set(payload.notes.clone()),
        approval_date: Set(Some(Local::now().fixed_offset())),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(web::Json(json!({
        "message": match payload.action {
            ApprovalAction::Approve => "Request disetujui",
            ApprovalAction::Reject => "Request ditolak",
        },
        "data": updated,
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

    let rows = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .order_by_desc(attendance::Column::Tanggal)
        .all(db.as_ref()).await?;

    Ok(web::Json(rows))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{
        auth::Authority,
        entity::{employee, user, sea_orm_active_enums::{AccountStatus, RoleType}},
    };

    use super::*;

    fn karyawan_token(authority: &Authority, employee: &employee::Model) -> String {
        let account = user::Model {
            id: employee.user_id,
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: Vec::new(),
            role: RoleType::Karyawan,
            status: AccountStatus::Active,
            reset_token: None,
            reset_token_expiry: None,
        };

        authority.issue_for(&account, Some(employee))
    }

    fn employee_row() -> employee::Model {
        employee::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            user_id: Uuid::new_v4(),
            nama_lengkap: "Bob Sanjaya".to_string(),
            jenis_kelamin: None,
            alamat: None,
            no_hp: None,
            jabatan: None,
            status_karyawan: "Magang".to_string(),
            gaji_pokok: consts::DEFAULT_GAJI_POKOK,
            tanggal_masuk: Local::now().date_naive(),
        }
    }

    fn attendance_row(employee_id: Uuid) -> attendance::Model {
        attendance::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id,
            tanggal: Local::now().date_naive(),
            jam_masuk: Some("08:00".to_string()),
            jam_pulang: None,
            status: Some(AttendanceStatus::Hadir),
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
            recorded_by_role: Some("Karyawan".to_string()),
        }
    }

    #[actix_web::test]
    async fn test_duplicate_check_in_rejected() {
        let secret = b"secret";
        let employee = employee_row();
        let existing = attendance_row(employee.id);

        // If the suite runs while attendance is closed the handler rejects
        // before touching the database, still a 400 either way
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![employee.clone()]])
            .append_query_results([vec![existing]]);

        let token = karyawan_token(&Authority::new(secret), &employee);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(check_in)
        ).await;

        let req = test::TestRequest::default()
            .uri("/checkin")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(CheckIn::default())
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_check_out_twice_rejected() {
        let secret = b"secret";
        let employee = employee_row();
        let mut attendance = attendance_row(employee.id);
        attendance.jam_pulang = Some("17:00".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![attendance.clone()]]);

        let token = karyawan_token(&Authority::new(secret), &employee);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(check_out)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/checkout/{}", attendance.id))
            .method(Method::PUT)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(CheckOut::default())
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_remote_request_must_be_remote_type() {
        let secret = b"secret";
        let employee = employee_row();

        let db = MockDatabase::new(DatabaseBackend::Postgres);
        let token = karyawan_token(&Authority::new(secret), &employee);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(request_remote)
        ).await;

        let req = test::TestRequest::default()
            .uri("/request-wfh")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(RequestRemote {
                tanggal: Local::now().date_naive(),
                tipe_kerja: WorkType::Wfo,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_karyawan_cannot_read_other_employee() {
        let secret = b"secret";
        let employee = employee_row();
        let other = attendance_row(Uuid::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![other.clone()]]);

        let token = karyawan_token(&Authority::new(secret), &employee);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(get_one)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", other.id))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
