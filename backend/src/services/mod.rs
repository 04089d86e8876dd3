pub mod bootstrap;
pub mod notifications;
pub mod payroll;
