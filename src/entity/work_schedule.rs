use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named shift definition. Replaced by creating a new schedule and
/// re-assigning rather than edited in place once employees are attached.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub schedule_name: String,
    pub shift_type: String,
    /// Day-local `HH:MM`.
    pub start_time: String,
    /// Day-local `HH:MM`.
    pub end_time: String,
    /// Minutes.
    pub break_duration: i32,
    pub work_days: String,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee_schedule::Entity")]
    EmployeeSchedule,
}

impl Related<super::employee_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeSchedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
