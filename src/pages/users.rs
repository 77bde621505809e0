use actix_web::{get, post, put, web, HttpResponse, Responder};
use chrono::{Duration, Local};
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde_json::json;
use sha2::{Digest as _, Sha256};
use uuid::Uuid;

use crate::{
    auth::{Admin, Authority, TokenUser},
    consts,
    entity::{employee, prelude::*, sea_orm_active_enums::{AccountStatus, RoleType}, user},
    error::ApiError,
    pages::FrontendUrl,
    services::mailer::Mailer,
};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(register)
        .service(login)
        .service(get_profile)
        .service(update_profile)
        .service(change_password)
        .service(forgot_password)
        .service(reset_password)
        .service(complete_profile)
        .service(pending_users)
        .service(approve_user)
        .service(reject_user);
}

pub(crate) fn hash_password(password: &str, username: &str) -> Vec<u8> {
    Sha256::digest(format!("{password}:{username}")).to_vec()
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 6 {
        return Err(ApiError::bad_request("Password minimal 6 karakter"));
    }

    Ok(())
}

#[post("/register")]
async fn register(db: web::Data<DatabaseConnection>, payload: web::Json<Register>) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    if payload.username.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(ApiError::bad_request("Username, password, dan email wajib diisi"));
    }
    if payload.nama_lengkap.trim().is_empty() {
        return Err(ApiError::bad_request("Nama lengkap wajib diisi"));
    }
    if payload.password != payload.confirm_password {
        return Err(ApiError::bad_request("Password dan konfirmasi password tidak cocok"));
    }
    validate_password(&payload.password)?;

    if let Some(no_hp) = &payload.no_hp {
        let valid = no_hp.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
        if !valid {
            return Err(ApiError::bad_request("Nomor HP tidak valid"));
        }
    }

    let existing = User::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(payload.username.trim()))
                .add(user::Column::Email.eq(payload.email.trim())),
        )
        .one(db.as_ref()).await?;

    if let Some(existing) = existing {
        let field = if existing.username == payload.username.trim() { "Username" } else { "Email" };
        return Err(ApiError::Conflict(format!("{field} sudah terdaftar")));
    }

    let now = Local::now().fixed_offset();
    let status_karyawan = payload.status_karyawan.unwrap_or_else(|| "Magang".to_string());

    let new_user = User::insert(user::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        username: Set(payload.username.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        password: Set(hash_password(&payload.password, payload.username.trim())),
        role: Set(RoleType::Karyawan),
        status: Set(AccountStatus::Pending),
        reset_token: Set(None),
        reset_token_expiry: Set(None),
    }).exec_with_returning(db.as_ref()).await?;

    Employee::insert(employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        user_id: Set(new_user.id),
        nama_lengkap: Set(payload.nama_lengkap.trim().to_string()),
        jenis_kelamin: Set(payload.jenis_kelamin),
        alamat: Set(payload.alamat.map(|v| v.trim().to_string())),
        no_hp: Set(payload.no_hp.map(|v| v.trim().to_string())),
        jabatan: Set(payload.jabatan.map(|v| v.trim().to_string())),
        status_karyawan: Set(status_karyawan),
        gaji_pokok: Set(consts::DEFAULT_GAJI_POKOK),
        tanggal_masuk: Set(now.date_naive()),
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Registrasi berhasil, akun menunggu persetujuan admin",
        "pending_approval": true,
        "user": {
            "username": new_user.username,
            "email": new_user.email,
            "status": new_user.status,
        },
    })))
}

#[post("/login")]
async fn login(
    db: web::Data<DatabaseConnection>,
    authority: web::Data<Authority>,
    credentials: web::Json<Login>,
) -> Result<HttpResponse, ApiError> {
    let Some(user) = User::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(&credentials.username))
                .add(user::Column::Email.eq(&credentials.username)),
        )
        .one(db.as_ref()).await?
    else {
        return Err(ApiError::Unauthorized("Username atau email tidak ditemukan".to_string()));
    };

    match user.status {
        AccountStatus::Active => {}
        AccountStatus::Pending => {
            return Err(ApiError::UnauthorizedCode {
                message: "Akun masih menunggu persetujuan admin".to_string(),
                code: "ACCOUNT_PENDING",
            })
        }
        AccountStatus::Rejected => {
            return Err(ApiError::UnauthorizedCode {
                message: "Akun telah ditolak oleh admin".to_string(),
                code: "ACCOUNT_REJECTED",
            })
        }
    }

    if user.password.is_empty() {
        return Err(ApiError::UnauthorizedCode {
            message: "Password belum diatur, silakan lengkapi profil terlebih dahulu".to_string(),
            code: "PASSWORD_NOT_SET",
        });
    }

    if user.password != hash_password(&credentials.password, &user.username) {
        return Err(ApiError::Unauthorized("Password salah".to_string()));
    }

    let employee = Employee::find()
        .filter(employee::Column::UserId.eq(user.id))
        .one(db.as_ref()).await?;

    let token = authority.issue_for(&user, employee.as_ref());

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": {
            "user_id": user.id,
            "username": user.username,
            "email": user.email,
            "role": user.role,
            "status": user.status,
            "employee_id": employee.as_ref().map(|e| e.id),
            "nama_lengkap": employee.as_ref().map(|e| e.nama_lengkap.clone()),
        },
    })))
}

#[get("/profile")]
async fn get_profile(db: web::Data<DatabaseConnection>, user: TokenUser) -> Result<HttpResponse, ApiError> {
    let Some((account, employee)) = User::find_by_id(user.user_id)
        .find_also_related(Employee)
        .one(db.as_ref()).await?
    else {
        return Err(ApiError::not_found("User tidak ditemukan"));
    };

    Ok(HttpResponse::Ok().json(json!({
        "user": account,
        "employee": employee,
    })))
}

#[put("/profile")]
async fn update_profile(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    payload: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    let employee = super::employee_of(db.as_ref(), &user).await?;
    let payload = payload.into_inner();

    let updated = Employee::update(employee::ActiveModel {
        id: Unchanged(employee.id),
        updated_at: Set(Local::now().fixed_offset()),
        nama_lengkap: payload.nama_lengkap.map(Set).unwrap_or_default(),
        jenis_kelamin: payload.jenis_kelamin.map(|v| Set(Some(v))).unwrap_or_default(),
        alamat: payload.alamat.map(|v| Set(Some(v))).unwrap_or_default(),
        no_hp: payload.no_hp.map(|v| Set(Some(v))).unwrap_or_default(),
        jabatan: payload.jabatan.map(|v| Set(Some(v))).unwrap_or_default(),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[put("/change-password")]
async fn change_password(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    payload: web::Json<ChangePassword>,
) -> Result<HttpResponse, ApiError> {
    let Some(account) = User::find_by_id(user.user_id).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("User tidak ditemukan"));
    };

    if account.password != hash_password(&payload.old_password, &account.username) {
        return Err(ApiError::bad_request("Password lama salah"));
    }
    validate_password(&payload.new_password)?;

    User::update(user::ActiveModel {
        id: Unchanged(account.id),
        updated_at: Set(Local::now().fixed_offset()),
        password: Set(hash_password(&payload.new_password, &account.username)),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password berhasil diubah" })))
}

#[post("/forgot-password")]
async fn forgot_password(
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<Mailer>,
    frontend_url: web::Data<FrontendUrl>,
    payload: web::Json<ForgotPassword>,
) -> Result<HttpResponse, ApiError> {
    // The response never reveals whether the email exists
    let generic = json!({ "message": "Jika email terdaftar, link reset password telah dikirim" });

    let Some(account) = User::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(db.as_ref()).await?
    else {
        return Ok(HttpResponse::Ok().json(generic));
    };

    let token = Uuid::new_v4().simple().to_string();
    let expiry = Local::now().fixed_offset() + Duration::hours(1);

    User::update(user::ActiveModel {
        id: Unchanged(account.id),
        updated_at: Set(Local::now().fixed_offset()),
        reset_token: Set(Some(token.clone())),
        reset_token_expiry: Set(Some(expiry)),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    let reset_url = format!("{}/reset-password?token={token}", frontend_url.0);
    mailer.send(
        &account.email,
        "Instruksi Reset Password",
        &format!(
            "<p>Halo {},</p>\
             <p>Klik link berikut untuk mereset password Anda (berlaku 1 jam):</p>\
             <p><a href=\"{reset_url}\">{reset_url}</a></p>",
            account.username
        ),
    ).await;

    Ok(HttpResponse::Ok().json(generic))
}

#[post("/reset-password")]
async fn reset_password(
    db: web::Data<DatabaseConnection>,
    payload: web::Json<ResetPassword>,
) -> Result<HttpResponse, ApiError> {
    validate_password(&payload.new_password)?;

    let Some(account) = User::find()
        .filter(user::Column::ResetToken.eq(&payload.token))
        .one(db.as_ref()).await?
    else {
        return Err(ApiError::bad_request("Token tidak valid atau sudah kadaluwarsa"));
    };

    let expired = account.reset_token_expiry
        .is_none_or(|expiry| expiry < Local::now().fixed_offset());
    if expired {
        return Err(ApiError::bad_request("Token tidak valid atau sudah kadaluwarsa"));
    }

    User::update(user::ActiveModel {
        id: Unchanged(account.id),
        updated_at: Set(Local::now().fixed_offset()),
        password: Set(hash_password(&payload.new_password, &account.username)),
        reset_token: Set(None),
        reset_token_expiry: Set(None),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password berhasil direset" })))
}

/// The only endpoint a pending account can reach.
#[put("/complete-profile")]
async fn complete_profile(
    db: web::Data<DatabaseConnection>,
    user: TokenUser,
    payload: web::Json<CompleteProfile>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let now = Local::now().fixed_offset();

    if let Some(password) = &payload.password {
        validate_password(password)?;

        User::update(user::ActiveModel {
            id: Unchanged(user.user_id),
            updated_at: Set(now),
            password: Set(hash_password(password, &user.username)),
            ..Default::default()
        }).exec(db.as_ref()).await?;
    }

    let existing = Employee::find()
        .filter(employee::Column::UserId.eq(user.user_id))
        .one(db.as_ref()).await?;

    let employee = match existing {
        Some(employee) => {
            Employee::update(employee::ActiveModel {
                id: Unchanged(employee.id),
                updated_at: Set(now),
                nama_lengkap: payload.nama_lengkap.map(Set).unwrap_or_default(),
                jenis_kelamin: payload.jenis_kelamin.map(|v| Set(Some(v))).unwrap_or_default(),
                alamat: payload.alamat.map(|v| Set(Some(v))).unwrap_or_default(),
                no_hp: payload.no_hp.map(|v| Set(Some(v))).unwrap_or_default(),
                jabatan: payload.jabatan.map(|v| Set(Some(v))).unwrap_or_default(),
                ..Default::default()
            }).exec(db.as_ref()).await?
        }
        None => {
            Employee::insert(employee::ActiveModel {
                id: Set(Uuid::new_v4()),
                created_at: Set(now),
                updated_at: Set(now),
                user_id: Set(user.user_id),
                nama_lengkap: Set(payload.nama_lengkap.unwrap_or_else(|| user.username.clone())),
                jenis_kelamin: Set(payload.jenis_kelamin),
                alamat: Set(payload.alamat),
                no_hp: Set(payload.no_hp),
                jabatan: Set(payload.jabatan),
                status_karyawan: Set("Magang".to_string()),
                gaji_pokok: Set(consts::DEFAULT_GAJI_POKOK),
                tanggal_masuk: Set(now.date_naive()),
            }).exec_with_returning(db.as_ref()).await?
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profil berhasil dilengkapi",
        "employee": employee,
    })))
}

#[get("/pending")]
async fn pending_users(db: web::Data<DatabaseConnection>, _admin: Admin) -> Result<impl Responder, ApiError> {
    let users = User::find()
        .filter(user::Column::Status.eq(AccountStatus::Pending))
        .find_also_related(Employee)
        .order_by_desc(user::Column::CreatedAt)
        .all(db.as_ref()).await?;

    let users = users.into_iter()
        .map(|(user, employee)| json!({ "user": user, "employee": employee }))
        .collect::<Vec<_>>();

    Ok(web::Json(json!({
        "count": users.len(),
        "users": users,
    })))
}

#[post("/approve/{user_id}")]
async fn approve_user(
    db: web::Data<DatabaseConnection>,
    admin: Admin,
    mailer: web::Data<Mailer>,
    path: web::Path<Uuid>,
    payload: web::Json<ApproveUser>,
) -> Result<HttpResponse, ApiError> {
    let Some(account) = User::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("User tidak ditemukan"));
    };

    if account.status != AccountStatus::Pending {
        return Err(ApiError::Conflict("User sudah diproses".to_string()));
    }

    let updated = User::update(user::ActiveModel {
        id: Unchanged(account.id),
        updated_at: Set(Local::now().fixed_offset()),
        status: Set(AccountStatus::Active),
        role: Set(payload.approved_role.clone()),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    mailer.send(
        &updated.email,
        "Akun HRIS Anda Telah Disetujui",
        &format!(
            "<p>Halo {},</p><p>Akun Anda telah disetujui dengan role <b>{:?}</b>. Silakan login.</p>",
            updated.username, updated.role
        ),
    ).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User berhasil disetujui",
        "user": {
            "username": updated.username,
            "email": updated.email,
            "role": updated.role,
            "status": updated.status,
        },
        "approved_by": admin.username,
        "notes": payload.notes.clone().unwrap_or_else(|| "Approved".to_string()),
    })))
}

#[post("/reject/{user_id}")]
async fn reject_user(
    db: web::Data<DatabaseConnection>,
    _admin: Admin,
    mailer: web::Data<Mailer>,
    path: web::Path<Uuid>,
    payload: web::Json<RejectUser>,
) -> Result<HttpResponse, ApiError> {
    let Some(account) = User::find_by_id(path.into_inner()).one(db.as_ref()).await? else {
        return Err(ApiError::not_found("User tidak ditemukan"));
    };

    if account.status != AccountStatus::Pending {
        return Err(ApiError::Conflict("User sudah diproses".to_string()));
    }

    let updated = User::update(user::ActiveModel {
        id: Unchanged(account.id),
        updated_at: Set(Local::now().fixed_offset()),
        status: Set(AccountStatus::Rejected),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    mailer.send(
        &updated.email,
        "Status Pendaftaran Akun HRIS",
        &format!(
            "<p>Halo {},</p><p>Mohon maaf, pendaftaran akun Anda ditolak.{}</p>",
            updated.username,
            payload.reason.as_deref()
                .map(|reason| format!(" Alasan: {reason}"))
                .unwrap_or_default(),
        ),
    ).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User ditolak",
        "user": {
            "username": updated.username,
            "email": updated.email,
            "status": updated.status,
        },
    })))
}
