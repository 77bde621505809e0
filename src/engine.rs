//! Pure calculation routines shared by the attendance, payroll, and schedule
//! handlers. Everything in here works on plain values so it can be unit
//! tested without a database.

pub mod attendance;
pub mod deduction;
pub mod overtime;
pub mod schedule;
