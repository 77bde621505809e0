pub mod prelude;
pub mod sea_orm_active_enums;

pub mod attendance;
pub mod employee;
pub mod employee_schedule;
pub mod leave_request;
pub mod overtime;
pub mod payment;
pub mod payroll;
pub mod subscription;
pub mod subscription_plan;
pub mod user;
pub mod work_schedule;
