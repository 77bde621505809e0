use std::collections::HashMap;

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
    auth::{Admin, AdminOrHr, TokenUser},
    consts,
    engine::deduction::{self, DeductionRates},
    entity::{
        attendance, employee, leave_request, overtime, payroll,
        prelude::*,
        sea_orm_active_enums::ApprovalStatus,
    },
    error::ApiError,
    utils,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(calculate)
        .service(my_slip)
        .service(stats)
        .service(bonus)
        .service(list)
        .service(create)
        .service(update)
        .service(remove);
}

#[derive(Debug, Deserialize, Default)]
struct PeriodFilter {
    month: Option<u32>,
    year: Option<i32>,
}

impl PeriodFilter {
    /// Defaults to the current month.
    fn periode(&self) -> String {
        match (self.month, self.year) {
            (Some(month), Some(year)) => format!("{year:04}-{month:02}"),
            _ => utils::period_of(Local::now().date_naive()),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ListFilter {
    periode: Option<String>,
    employee_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CreatePayroll {
    employee_id: Uuid,
    periode: String,
    gaji_pokok: Option<i64>,
    tunjangan: Option<i64>,
    potongan: Option<i64>,
    alasan_potongan: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct UpdatePayroll {
    gaji_pokok: Option<i64>,
    tunjangan: Option<i64>,
    potongan: Option<i64>,
    alasan_potongan: Option<String>,
}

/// A correction can return the deduction balance to zero but never push it
/// negative.
fn next_potongan(current: i64, amount: i64) -> i64 {
    (current + amount).max(0)
}

/// Finds or creates the employee's payroll row for the period and adds one
/// deduction event to it. The running `alasan_potongan` log keeps every
/// event visible on the slip.
pub(crate) async fn apply_deduction(
    db: &DatabaseConnection,
    employee: &employee::Model,
    periode: &str,
    amount: i64,
    reason: &str,
) -> Result<payroll::Model, ApiError> {
    let existing = Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee.id))
        .filter(payroll::Column::Periode.eq(periode))
        .one(db).await?;

    let now = Local::now().fixed_offset();

    let row = match existing {
        Some(row) => {
            let potongan = next_potongan(row.potongan, amount);

            Payroll::update(payroll::ActiveModel {
                id: Unchanged(row.id),
                updated_at: Set(now),
                potongan: Set(potongan),
                total_gaji: Set(deduction::net_salary(row.gaji_pokok, row.tunjangan, potongan)),
                alasan_potongan: Set(format!("{}; {reason}", row.alasan_potongan)),
                ..Default::default()
            }).exec(db).await?
        }
        None => {
            let account = User::find_by_id(employee.user_id).one(db).await?;
            let employee_role = account
                .map(|account| format!("{:?}", account.role))
                .unwrap_or_else(|| "Karyawan".to_string());

            let potongan = next_potongan(0, amount);

            Payroll::insert(payroll::ActiveModel {
                id: Set(Uuid::new_v4()),
                created_at: Set(now),
                updated_at: Set(now),
                employee_id: Set(employee.id),
                periode: Set(periode.to_string()),
                gaji_pokok: Set(employee.gaji_pokok),
                tunjangan: Set(0),
                potongan: Set(potongan),
                alasan_potongan: Set(reason.to_string()),
                total_gaji: Set(deduction::net_salary(employee.gaji_pokok, 0, potongan)),
                employee_role: Set(employee_role),
            }).exec_with_returning(db).await?
        }
    };

    Ok(row)
}

pub(crate) async fn apply_late_deduction(
    db: &DatabaseConnection,
    employee: &employee::Model,
    tanggal: NaiveDate,
    jam_masuk: &str,
) -> Result<(), ApiError> {
    apply_deduction(
        db,
        employee,
        &utils::period_of(tanggal),
        consts::POTONGAN_TERLAMBAT,
        &format!("Terlambat {tanggal} jam {jam_masuk}"),
    ).await?;

    Ok(())
}

pub(crate) async fn apply_alpa_deduction(
    db: &DatabaseConnection,
    employee: &employee::Model,
    tanggal: NaiveDate,
) -> Result<(), ApiError> {
    apply_deduction(
        db,
        employee,
        &utils::period_of(tanggal),
        consts::POTONGAN_ALPA,
        &format!("Alpa {tanggal}"),
    ).await?;

    Ok(())
}

/// Period report computed straight from attendance and approved leaves.
/// Read-only, it never touches the persisted payroll rows.
#[get("/calculate")]
async fn calculate(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    filter: web::Query<PeriodFilter>,
) -> Result<impl Responder, ApiError> {
    let periode = filter.periode();
    let Some((start, end)) = utils::period_range(&periode) else {
        return Err(ApiError::bad_request("Periode tidak valid"));
    };

    let employees = Employee::find().all(db.as_ref()).await?;

    let attendances = Attendance::find()
        .filter(attendance::Column::Tanggal.gte(start))
        .filter(attendance::Column::Tanggal.lte(end))
        .all(db.as_ref()).await?;

    let leaves = LeaveRequest::find()
        .filter(leave_request::Column::Status.eq(ApprovalStatus::Approved))
        .all(db.as_ref()).await?;

    let overtimes = Overtime::find()
        .filter(overtime::Column::Status.eq(ApprovalStatus::Approved))
        .filter(overtime::Column::Tanggal.gte(start))
        .filter(overtime::Column::Tanggal.lte(end))
        .all(db.as_ref()).await?;

    let mut attendance_by_employee: HashMap<Uuid, Vec<attendance::Model>> = HashMap::new();
    for row in attendances {
        attendance_by_employee.entry(row.employee_id).or_default().push(row);
    }

    let mut leaves_by_employee: HashMap<Uuid, Vec<leave_request::Model>> = HashMap::new();
    for leave in leaves {
        if deduction::leave_overlaps(leave.tanggal_mulai, leave.tanggal_selesai, start, end) {
            leaves_by_employee.entry(leave.employee_id).or_default().push(leave);
        }
    }

    let mut bonus_by_employee: HashMap<Uuid, i64> = HashMap::new();
    for row in overtimes {
        *bonus_by_employee.entry(row.employee_id).or_default() += row.total_bonus;
    }

    let rates = DeductionRates::default();
    let empty_attendance = Vec::new();
    let empty_leaves = Vec::new();

    let report = employees.iter().map(|employee| {
        let breakdown = deduction::compute_deductions(
            attendance_by_employee.get(&employee.id).unwrap_or(&empty_attendance),
            leaves_by_employee.get(&employee.id).unwrap_or(&empty_leaves),
            &rates,
        );
        let bonus_lembur = bonus_by_employee.get(&employee.id).copied().unwrap_or(0);

        json!({
            "employee_id": employee.id,
            "nama_lengkap": employee.nama_lengkap,
            "gaji_pokok": employee.gaji_pokok,
            "terlambat_count": breakdown.terlambat_count,
            "alpa_days": breakdown.alpa_days,
            "izin_days": breakdown.izin_days,
            "sakit_days": breakdown.sakit_days,
            "total_potongan": breakdown.total,
            "alasan_potongan": breakdown.alasan,
            "bonus_lembur": bonus_lembur,
            "total_gaji": deduction::net_salary(employee.gaji_pokok, bonus_lembur, breakdown.total),
        })
    }).collect::<Vec<_>>();

    Ok(web::Json(json!({ "periode": periode, "report": report })))
}

#[get("/my-slip")]
async fn my_slip(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    filter: web::Query<PeriodFilter>,
) -> Result<impl Responder, ApiError> {
    let employee = super::employee_of(db.as_ref(), &user).await?;
    let periode = filter.periode();

    let Some(slip) = Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee.id))
        .filter(payroll::Column::Periode.eq(periode.clone()))
        .one(db.as_ref()).await?
    else {
        return Err(ApiError::not_found(format!("Belum ada slip gaji untuk periode {periode}")));
    };

    Ok(web::Json(slip))
}

#[get("")]
async fn list(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    filter: web::Query<ListFilter>,
) -> Result<impl Responder, ApiError> {
    let mut query = Payroll::find();

    if let Some(employee_id) = super::scope_filter(&user)? {
        query = query.filter(payroll::Column::EmployeeId.eq(employee_id));
    } else if let Some(employee_id) = filter.employee_id {
        query = query.filter(payroll::Column::EmployeeId.eq(employee_id));
    }
    if let Some(periode) = &filter.periode {
        query = query.filter(payroll::Column::Periode.eq(periode.clone()));
    }

    let rows = query
        .find_also_related(Employee)
        .order_by_desc(payroll::Column::Periode)
        .all(db.as_ref()).await?;

    let rows = rows.into_iter()
        .map(|(payroll, employee)| json!({ "payroll": payroll, "employee": employee }))
        .collect::<Vec<_>>();

    Ok(web::Json(rows))
}

#[post("")]
async fn create(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    payload: web::Json<CreatePayroll>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    if utils::period_range(&payload.periode).is_none() {
        return Err(ApiError::bad_request("Periode harus berformat YYYY-MM"));
    }

    let employee = super::find_employee(db.as_ref(), payload.employee_id).await?;

    let duplicate = Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee.id))
        .filter(payroll::Column::Periode.eq(payload.periode.clone()))
        .one(db.as_ref()).await?;

    if duplicate.is_some() {
        return Err(ApiError::Conflict(format!(
            "Payroll periode {} untuk karyawan ini sudah ada", payload.periode
        )));
    }

    let account = User::find_by_id(employee.user_id).one(db.as_ref()).await?;
    let employee_role = account
        .map(|account| format!("{:?}", account.role))
        .unwrap_or_else(|| "Karyawan".to_string());

    let gaji_pokok = payload.gaji_pokok.unwrap_or(employee.gaji_pokok);
    let tunjangan = payload.tunjangan.unwrap_or(0);
    let potongan = payload.potongan.unwrap_or(0);
    let now = Local::now().fixed_offset();

    let row = Payroll::insert(payroll::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        employee_id: Set(employee.id),
        periode: Set(payload.periode),
        gaji_pokok: Set(gaji_pokok),
        tunjangan: Set(tunjangan),
        potongan: Set(potongan),
        alasan_potongan: Set(payload.alasan_potongan.unwrap_or_else(|| "Tidak ada potongan".to_string())),
        total_gaji: Set(deduction::net_salary(gaji_pokok, tunjangan, potongan)),
        employee_role: Set(employee_role),
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Payroll dibuat", "data": row })))
}

#[put("/{payroll_id}")]
async fn update(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    path: web::Path<Uuid>,
    payload: web::Json<UpdatePayroll>,
) -> Result<impl Responder, ApiError> {
    let Some(row) = Payroll::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Data payroll tidak ditemukan"));
    };

    let gaji_pokok = payload.gaji_pokok.unwrap_or(row.gaji_pokok);
    let tunjangan = payload.tunjangan.unwrap_or(row.tunjangan);
    let potongan = payload.potongan.unwrap_or(row.potongan);

    let updated = Payroll::update(payroll::ActiveModel {
        id: Unchanged(row.id),
        updated_at: Set(Local::now().fixed_offset()),
        gaji_pokok: Set(gaji_pokok),
        tunjangan: Set(tunjangan),
        potongan: Set(potongan),
        alasan_potongan: Set(payload.alasan_potongan.clone().unwrap_or(row.alasan_potongan)),
        total_gaji: Set(deduction::net_salary(gaji_pokok, tunjangan, potongan)),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(web::Json(json!({ "message": "Payroll diperbarui", "data": updated })))
}

#[delete("/{payroll_id}")]
async fn remove(
    db: web::Data<DatabaseConnection>,
    _admin: Admin,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let Some(row) = Payroll::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("Data payroll tidak ditemukan"));
    };

    Payroll::delete_by_id(row.id).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Data payroll dihapus" })))
}

#[get("/stats")]
async fn stats(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    filter: web::Query<PeriodFilter>,
) -> Result<impl Responder, ApiError> {
    let year = filter.year.unwrap_or_else(|| {
        use chrono::Datelike;
        Local::now().year()
    });

    let rows = Payroll::find()
        .filter(payroll::Column::Periode.starts_with(format!("{year:04}-")))
        .all(db.as_ref()).await?;

    let mut by_month: HashMap<String, (i64, i64, i64)> = HashMap::new();
    for row in &rows {
        let entry = by_month.entry(row.periode.clone()).or_default();
        entry.0 += 1;
        entry.1 += row.potongan;
        entry.2 += row.total_gaji;
    }

    let mut months = by_month.into_iter()
        .map(|(periode, (count, potongan, total))| json!({
            "periode": periode,
            "slip_count": count,
            "total_potongan": potongan,
            "total_gaji": total,
        }))
        .collect::<Vec<_>>();
    months.sort_by(|a, b| a["periode"].as_str().cmp(&b["periode"].as_str()));

    Ok(web::Json(json!({
        "year": year,
        "total_potongan": rows.iter().map(|row| row.potongan).sum::<i64>(),
        "total_gaji": rows.iter().map(|row| row.total_gaji).sum::<i64>(),
        "months": months,
    })))
}

/// Approved overtime bonus for one employee in a period.
#[get("/bonus/{employee_id}")]
async fn bonus(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    path: web::Path<Uuid>,
    filter: web::Query<PeriodFilter>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    super::ensure_own_rows(&user, employee_id)?;

    let periode = filter.periode();
    let Some((start, end)) = utils::period_range(&periode) else {
        return Err(ApiError::bad_request("Periode tidak valid"));
    };

    let rows = Overtime::find()
        .filter(overtime::Column::EmployeeId.eq(employee_id))
        .filter(overtime::Column::Status.eq(ApprovalStatus::Approved))
        .filter(overtime::Column::Tanggal.gte(start))
        .filter(overtime::Column::Tanggal.lte(end))
        .all(db.as_ref()).await?;

    Ok(web::Json(json!({
        "employee_id": employee_id,
        "periode": periode,
        "overtime_count": rows.len(),
        "total_hours": rows.iter().map(|row| row.overtime_hours).sum::<f64>(),
        "total_bonus": rows.iter().map(|row| row.total_bonus).sum::<i64>(),
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{
        auth::Authority,
        entity::{user, sea_orm_active_enums::{AccountStatus, AttendanceStatus, RoleType, WorkType}},
    };

    use super::*;

    fn employee_row(gaji_pokok: i64) -> employee::Model {
        employee::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            user_id: Uuid::new_v4(),
            nama_lengkap: "Citra Ayu".to_string(),
            jenis_kelamin: None,
            alamat: None,
            no_hp: None,
            jabatan: Some("Backend Engineer".to_string()),
            status_karyawan: "Tetap".to_string(),
            gaji_pokok,
            tanggal_masuk: Local::now().date_naive(),
        }
    }

    fn payroll_row(employee_id: Uuid, periode: &str, gaji_pokok: i64, potongan: i64) -> payroll::Model {
        payroll::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id,
            periode: periode.to_string(),
            gaji_pokok,
            tunjangan: 0,
            potongan,
            alasan_potongan: "Terlambat 2024-06-03 jam 08:30".to_string(),
            total_gaji: gaji_pokok - potongan,
            employee_role: "Karyawan".to_string(),
        }
    }

    fn late_attendance(employee_id: Uuid, tanggal: NaiveDate) -> attendance::Model {
        attendance::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id,
            tanggal,
            jam_masuk: Some("08:30".to_string()),
            jam_pulang: None,
            status: Some(AttendanceStatus::Terlambat),
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

    fn approved_overtime(employee_id: Uuid, tanggal: NaiveDate, total_bonus: i64) -> overtime::Model {
        overtime::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id,
            attendance_id: Uuid::new_v4(),
            tanggal,
            jam_checkout: "18:30".to_string(),
            jam_scheduled: "17:00".to_string(),
            overtime_hours: total_bonus as f64 / consts::BONUS_PER_HOUR as f64,
            bonus_per_hour: consts::BONUS_PER_HOUR,
            total_bonus,
            status: ApprovalStatus::Approved,
            reason: "Lembur otomatis".to_string(),
            approved_by: None,
            approval_notes: None,
            approval_date: None,
        }
    }

    fn hr_token(authority: &Authority) -> String {
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

        authority.issue_for(&account, None)
    }

    #[std::prelude::v1::test]
    fn test_next_potongan_never_goes_negative() {
        assert_eq!(next_potongan(0, consts::POTONGAN_TERLAMBAT), 25_000);
        assert_eq!(next_potongan(consts::POTONGAN_ALPA, -consts::POTONGAN_ALPA), 0);

        // A reversal after an admin already lowered the balance clamps at zero
        assert_eq!(next_potongan(25_000, -consts::POTONGAN_ALPA), 0);
        assert_eq!(next_potongan(0, -consts::POTONGAN_ALPA), 0);
    }

    #[actix_web::test]
    async fn test_calculate_reports_deductions_and_bonus() {
        let secret = b"secret";
        let token = hr_token(&Authority::new(secret));

        let employee = employee_row(7_000_000);
        let tanggal = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![employee.clone()]])
            .append_query_results([vec![late_attendance(employee.id, tanggal)]])
            .append_query_results([Vec::<leave_request::Model>::new()])
            .append_query_results([vec![approved_overtime(employee.id, tanggal, 75_000)]]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(calculate)
        ).await;

        let req = test::TestRequest::default()
            .uri("/calculate?month=6&year=2024")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["periode"], "2024-06");

        let row = &body["report"][0];
        assert_eq!(row["terlambat_count"], 1);
        assert_eq!(row["total_potongan"], 25_000);
        assert_eq!(row["bonus_lembur"], 75_000);
        assert_eq!(row["total_gaji"], 7_050_000);
    }

    #[actix_web::test]
    async fn test_apply_deduction_creates_row_with_employee_salary() {
        let employee = employee_row(7_000_000);

        let account = user::Model {
            id: employee.user_id,
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            username: "citra".to_string(),
            email: "citra@example.com".to_string(),
            password: Vec::new(),
            role: RoleType::Karyawan,
            status: AccountStatus::Active,
            reset_token: None,
            reset_token_expiry: None,
        };

        let expected = payroll_row(employee.id, "2024-06", 7_000_000, consts::POTONGAN_TERLAMBAT);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<payroll::Model>::new()])
            .append_query_results([vec![account]])
            .append_query_results([vec![expected.clone()]])
            .into_connection();

        let row = apply_late_deduction(
            &db,
            &employee,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            "08:30",
        ).await;

        assert!(row.is_ok());
    }

    #[actix_web::test]
    async fn test_apply_deduction_accumulates_on_existing_row() {
        let employee = employee_row(7_000_000);
        let existing = payroll_row(employee.id, "2024-06", 7_000_000, consts::POTONGAN_TERLAMBAT);

        let mut updated = existing.clone();
        updated.potongan += consts::POTONGAN_TERLAMBAT;
        updated.total_gaji = updated.gaji_pokok - updated.potongan;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .append_query_results([vec![updated.clone()]])
            .into_connection();

        let row = apply_deduction(
            &db,
            &employee,
            "2024-06",
            consts::POTONGAN_TERLAMBAT,
            "Terlambat 2024-06-04 jam 08:15",
        ).await.unwrap();

        assert_eq!(row.potongan, 50_000);
        assert_eq!(row.total_gaji, 6_950_000);
    }

    #[actix_web::test]
    async fn test_create_rejects_duplicate_period() {
        let secret = b"secret";
        let employee = employee_row(5_000_000);
        let existing = payroll_row(employee.id, "2024-06", 5_000_000, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![employee.clone()]])
            .append_query_results([vec![existing]]);

        let token = hr_token(&Authority::new(secret));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(create))
        ).await;

        let req = test::TestRequest::default()
            .uri("/payroll")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(CreatePayroll {
                employee_id: employee.id,
                periode: "2024-06".to_string(),
                gaji_pokok: None,
                tunjangan: None,
                potongan: None,
                alasan_potongan: None,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_create_rejects_malformed_period() {
        let secret = b"secret";
        let token = hr_token(&Authority::new(secret));

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(create))
        ).await;

        let req = test::TestRequest::default()
            .uri("/payroll")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(CreatePayroll {
                employee_id: Uuid::new_v4(),
                periode: "juni-2024".to_string(),
                gaji_pokok: None,
                tunjangan: None,
                potongan: None,
                alasan_potongan: None,
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
