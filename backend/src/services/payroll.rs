//! Monthly pay computation.

use chrono::NaiveDate;

use crate::models::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::utils::time::{inclusive_days, overlap_days, round2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayrollInput {
    pub base_salary: f64,
    pub allowances: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub unpaid_leave_days: i64,
    pub days_in_month: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayrollBreakdown {
    pub base_salary: f64,
    pub allowances: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub unpaid_leave_days: i64,
    pub unpaid_leave_deduction: f64,
    pub gross_pay: f64,
    pub net_pay: f64,
}

/// gross = base + allowances + bonus; net = gross - deductions - unpaid leave, floored at 0.
pub fn compute(input: PayrollInput) -> PayrollBreakdown {
    let days_in_month = input.days_in_month.max(1);
    let unpaid_days = input.unpaid_leave_days.clamp(0, days_in_month);
    let daily_rate = input.base_salary / days_in_month as f64;
    let unpaid_leave_deduction = round2(daily_rate * unpaid_days as f64);
    let gross_pay = round2(input.base_salary + input.allowances + input.bonus);
    let net_pay = round2((gross_pay - input.deductions - unpaid_leave_deduction).max(0.0));

    PayrollBreakdown {
        base_salary: round2(input.base_salary),
        allowances: round2(input.allowances),
        bonus: round2(input.bonus),
        deductions: round2(input.deductions),
        unpaid_leave_days: unpaid_days,
        unpaid_leave_deduction,
        gross_pay,
        net_pay,
    }
}

/// Approved unpaid leave days that fall inside `[period_start, period_end]`.
pub fn unpaid_leave_days(
    leaves: &[LeaveRequest],
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> i64 {
    leaves
        .iter()
        .filter(|leave| leave.leave_type == LeaveType::Unpaid && leave.status == LeaveStatus::Approved)
        .map(|leave| {
            overlap_days(
                (period_start, period_end),
                (leave.start_date, leave.end_date),
            )
        })
        .sum::<i64>()
        .min(inclusive_days(period_start, period_end))
}
