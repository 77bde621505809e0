use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One persisted statement per (employee, periode), enforced by a unique
/// index. `alasan_potongan` is an append-only free-text rationale log.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub employee_id: Uuid,
    /// `YYYY-MM`.
    pub periode: String,
    pub gaji_pokok: i64,
    pub tunjangan: i64,
    pub potongan: i64,
    pub alasan_potongan: String,
    pub total_gaji: i64,
    pub employee_role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
