pub use super::attendance::Entity as Attendance;
pub use super::employee::Entity as Employee;
pub use super::employee_schedule::Entity as EmployeeSchedule;
pub use super::leave_request::Entity as LeaveRequest;
pub use super::overtime::Entity as Overtime;
pub use super::payment::Entity as Payment;
pub use super::payroll::Entity as Payroll;
pub use super::subscription::Entity as Subscription;
pub use super::subscription_plan::Entity as SubscriptionPlan;
pub use super::user::Entity as User;
pub use super::work_schedule::Entity as WorkSchedule;
