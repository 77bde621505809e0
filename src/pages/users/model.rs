use serde::{Deserialize, Serialize};

use crate::entity::sea_orm_active_enums::RoleType;

#[derive(Debug, Serialize, Deserialize)]
pub struct Register {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub nama_lengkap: String,
    pub jenis_kelamin: Option<String>,
    pub alamat: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan: Option<String>,
    pub status_karyawan: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Login {
    /// Username or email.
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateProfile {
    pub nama_lengkap: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub alamat: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangePassword {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ForgotPassword {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetPassword {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CompleteProfile {
    pub password: Option<String>,
    pub nama_lengkap: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub alamat: Option<String>,
    pub no_hp: Option<String>,
    pub jabatan: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveUser {
    pub approved_role: RoleType,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RejectUser {
    pub reason: Option<String>,
}
