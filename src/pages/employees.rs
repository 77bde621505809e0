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
    entity::{employee, payroll, prelude::*},
    error::ApiError,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(list)
        .service(get_one)
        .service(create)
        .service(update)
        .service(remove);
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateEmployee {
    user_id: Uuid,
    nama_lengkap: String,
    jenis_kelamin: Option<String>,
    alamat: Option<String>,
    no_hp: Option<String>,
    jabatan: Option<String>,
    status_karyawan: Option<String>,
    gaji_pokok: Option<i64>,
    tanggal_masuk: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct UpdateEmployee {
    nama_lengkap: Option<String>,
    jenis_kelamin: Option<String>,
    alamat: Option<String>,
    no_hp: Option<String>,
    jabatan: Option<String>,
    status_karyawan: Option<String>,
    gaji_pokok: Option<i64>,
    tanggal_masuk: Option<NaiveDate>,
}

#[get("")]
async fn list(db: web::Data<DatabaseConnection>, _admin: AdminOrHr) -> Result<impl Responder, ApiError> {
    let rows = Employee::find()
        .find_also_related(User)
        .order_by_asc(employee::Column::NamaLengkap)
        .all(db.as_ref()).await?;

    let rows = rows.into_iter()
        .map(|(employee, user)| json!({ "employee": employee, "user": user }))
        .collect::<Vec<_>>();

    Ok(web::Json(rows))
}

#[get("/{employee_id}")]
async fn get_one(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    super::ensure_own_rows(&user, employee_id)?;

    let employee = super::find_employee(db.as_ref(), employee_id).await?;

    Ok(web::Json(employee))
}

#[post("")]
async fn create(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    let nama_lengkap = payload.nama_lengkap.trim().to_string();
    if nama_lengkap.is_empty() {
        return Err(ApiError::bad_request("Nama lengkap wajib diisi"));
    }

    let gaji_pokok = payload.gaji_pokok.unwrap_or(consts::DEFAULT_GAJI_POKOK);
    if gaji_pokok < 0 {
        return Err(ApiError::bad_request("Gaji pokok tidak boleh negatif"));
    }

    if User::find_by_id(payload.user_id).one(db.as_ref()).await?.is_none() {
        return Err(ApiError::bad_request("User tidak ditemukan"));
    }

    let duplicate = Employee::find()
        .filter(employee::Column::UserId.eq(payload.user_id))
        .one(db.as_ref()).await?;

    if duplicate.is_some() {
        return Err(ApiError::Conflict("User ini sudah memiliki profil karyawan".to_string()));
    }

    let now = Local::now().fixed_offset();

    let row = Employee::insert(employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        user_id: Set(payload.user_id),
        nama_lengkap: Set(nama_lengkap),
        jenis_kelamin: Set(payload.jenis_kelamin),
        alamat: Set(payload.alamat),
        no_hp: Set(payload.no_hp),
        jabatan: Set(payload.jabatan),
        status_karyawan: Set(payload.status_karyawan.unwrap_or_else(|| "Tetap".to_string())),
        gaji_pokok: Set(gaji_pokok),
        tanggal_masuk: Set(payload.tanggal_masuk.unwrap_or_else(|| now.date_naive())),
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Karyawan berhasil ditambahkan",
        "data": row,
    })))
}

/// Partial update; this is the only place base salary is administered.
#[put("/{employee_id}")]
async fn update(
    db: web::Data<DatabaseConnection>,
    _admin: AdminOrHr,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateEmployee>,
) -> Result<impl Responder, ApiError> {
    let employee = super::find_employee(db.as_ref(), path.into_inner()).await?;
    let payload = payload.into_inner();

    if let Some(nama) = &payload.nama_lengkap {
        if nama.trim().is_empty() {
            return Err(ApiError::bad_request("Nama lengkap tidak boleh kosong"));
        }
    }
    if let Some(gaji_pokok) = payload.gaji_pokok {
        if gaji_pokok < 0 {
            return Err(ApiError::bad_request("Gaji pokok tidak boleh negatif"));
        }
    }

    let updated = Employee::update(employee::ActiveModel {
        id: Unchanged(employee.id),
        updated_at: Set(Local::now().fixed_offset()),
        nama_lengkap: payload.nama_lengkap.map(|v| Set(v.trim().to_string())).unwrap_or_default(),
        jenis_kelamin: payload.jenis_kelamin.map(|v| Set(Some(v))).unwrap_or_default(),
        alamat: payload.alamat.map(|v| Set(Some(v))).unwrap_or_default(),
        no_hp: payload.no_hp.map(|v| Set(Some(v))).unwrap_or_default(),
        jabatan: payload.jabatan.map(|v| Set(Some(v))).unwrap_or_default(),
        status_karyawan: payload.status_karyawan.map(Set).unwrap_or_default(),
        gaji_pokok: payload.gaji_pokok.map(Set).unwrap_or_default(),
        tanggal_masuk: payload.tanggal_masuk.map(Set).unwrap_or_default(),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(web::Json(json!({ "message": "Data karyawan berhasil diperbarui", "data": updated })))
}

/// Employees with payroll history stay on the books.
#[delete("/{employee_id}")]
async fn remove(
    db: web::Data<DatabaseConnection>,
    _admin: Admin,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let employee = super::find_employee(db.as_ref(), path.into_inner()).await?;

    let has_payroll = Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee.id))
        .one(db.as_ref()).await?
        .is_some();

    if has_payroll {
        return Err(ApiError::Conflict(
            "Tidak dapat menghapus karyawan dengan riwayat payroll".to_string()
        ));
    }

    Employee::delete_by_id(employee.id).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Karyawan berhasil dihapus" })))
}
