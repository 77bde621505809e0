use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Time-bounded assignment of a work schedule to an employee. At most one
/// `is_active = true` row per employee; assignment deactivates prior rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub employee_id: Uuid,
    pub schedule_id: Uuid,
    pub effective_date: Date,
    pub end_date: Option<Date>,
    pub notes: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::work_schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::work_schedule::Column::Id"
    )]
    WorkSchedule,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::work_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkSchedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
