use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::Document;
use crate::services::payroll::PayrollBreakdown;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollRecord {
    pub id: String,
    pub employee_id: String,
    /// Pay period as `YYYY-MM`.
    pub period: String,
    pub base_salary: f64,
    pub allowances: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub unpaid_leave_days: i64,
    pub unpaid_leave_deduction: f64,
    pub gross_pay: f64,
    pub net_pay: f64,
    pub status: PayrollStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for PayrollRecord {
    const COLLECTION: &'static str = "payroll";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    #[default]
    Draft,
    Paid,
}

impl PayrollRecord {
    pub fn new(employee_id: String, period: String, breakdown: PayrollBreakdown) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            employee_id,
            period,
            base_salary: breakdown.base_salary,
            allowances: breakdown.allowances,
            bonus: breakdown.bonus,
            deductions: breakdown.deductions,
            unpaid_leave_days: breakdown.unpaid_leave_days,
            unpaid_leave_deduction: breakdown.unpaid_leave_deduction,
            gross_pay: breakdown.gross_pay,
            net_pay: breakdown.net_pay,
            status: PayrollStatus::Draft,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_paid(&mut self) {
        let now = Utc::now();
        self.status = PayrollStatus::Paid;
        self.paid_at = Some(now);
        self.updated_at = now;
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct GeneratePayrollRequest {
    pub employee_id: String,
    /// `YYYY-MM`
    #[validate(length(equal = 7))]
    pub period: String,
    #[validate(range(min = 0.0))]
    pub allowances: Option<f64>,
    #[validate(range(min = 0.0))]
    pub bonus: Option<f64>,
    #[validate(range(min = 0.0))]
    pub deductions: Option<f64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PayrollQuery {
    pub employee_id: Option<String>,
    pub period: Option<String>,
}
