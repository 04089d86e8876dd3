pub mod attendance;
pub mod auth;
pub mod common;
pub mod departments;
pub mod employees;
pub mod exit_interviews;
pub mod health;
pub mod info;
pub mod leaves;
pub mod notifications;
pub mod payroll;
pub mod reports;
pub mod users;
