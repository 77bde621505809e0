use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ApprovalStatus, AttendanceStatus, WorkType};

/// One row per employee per calendar day, enforced by a unique index on
/// (employee_id, tanggal).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub employee_id: Uuid,
    pub tanggal: Date,
    /// Day-local `HH:MM`; null until check-in.
    pub jam_masuk: Option<String>,
    /// Day-local `HH:MM`; null until check-out.
    pub jam_pulang: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub tipe_kerja: WorkType,
    pub keterangan: Option<String>,
    pub lokasi_masuk: Option<String>,
    pub lokasi_pulang: Option<String>,
    pub akurasi_masuk: Option<i32>,
    pub akurasi_pulang: Option<i32>,
    /// Only set on remote-work requests.
    pub approval_status: Option<ApprovalStatus>,
    pub approved_by: Option<Uuid>,
    pub approval_notes: Option<String>,
    pub approval_date: Option<DateTimeWithTimeZone>,
    /// Role name of whoever recorded the row, or `System` for generated
    /// absence records.
    pub recorded_by_role: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    #[sea_orm(has_many = "super::overtime::Entity")]
    Overtime,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::overtime::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Overtime.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
