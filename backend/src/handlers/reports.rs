//! Aggregated HR reports for staff dashboards.

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Query, State},
    http::header,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    db::Filter,
    error::AppError,
    middleware,
    models::{
        attendance::{AttendanceRecord, AttendanceStatus},
        department::Department,
        employee::{Employee, EmployeeStatus},
        leave::{LeaveRequest, LeaveStatus},
        payroll::{PayrollRecord, PayrollStatus},
    },
    state::AppState,
    utils::{
        csv::write_csv,
        time::{round2, today_local},
    },
};

pub const ATTENDANCE_EXPORT_FILENAME: &str = "attendance-report.csv";

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/departments", get(department_headcount))
        .route("/attendance", get(attendance_report))
        .route("/attendance/export", get(export_attendance_report))
        .route("/payroll", get(payroll_report))
        .route("/leaves", get(leave_report))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth_staff))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryReport {
    pub total_employees: u64,
    pub active_employees: u64,
    pub on_leave_employees: u64,
    pub terminated_employees: u64,
    pub departments: u64,
    pub pending_leaves: u64,
    pub attendance_today: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DepartmentHeadcount {
    /// `None` for employees without a department.
    pub department_id: Option<String>,
    pub name: String,
    pub headcount: u64,
    pub active: u64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReportRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportRangeQuery {
    fn includes(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceReportRow {
    pub employee_id: String,
    pub employee_code: String,
    pub name: String,
    pub days_present: u64,
    pub days_late: u64,
    pub half_days: u64,
    pub total_hours: f64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PayrollReport {
    pub period: Option<String>,
    pub records: u64,
    pub total_gross: f64,
    pub total_net: f64,
    pub paid: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaveReport {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryReport>, AppError> {
    let employees = state.collection::<Employee>().all().await?;
    let count_status = |status: EmployeeStatus| {
        employees
            .iter()
            .filter(|employee| employee.status == status)
            .count() as u64
    };
    let today = today_local(&state.config.time_zone);

    Ok(Json(SummaryReport {
        total_employees: employees.len() as u64,
        active_employees: count_status(EmployeeStatus::Active),
        on_leave_employees: count_status(EmployeeStatus::OnLeave),
        terminated_employees: count_status(EmployeeStatus::Terminated),
        departments: state.collection::<Department>().count(Filter::new()).await?,
        pending_leaves: state
            .collection::<LeaveRequest>()
            .count(Filter::new().eq("status", LeaveStatus::Pending.as_str()))
            .await?,
        attendance_today: state
            .collection::<AttendanceRecord>()
            .count(Filter::new().eq("date", today.to_string()))
            .await?,
    }))
}

pub async fn department_headcount(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentHeadcount>>, AppError> {
    let employees = state.collection::<Employee>().all().await?;
    let mut departments = state.collection::<Department>().all().await?;
    departments.sort_by_key(|department| department.name.to_lowercase());

    let tally = |department_id: Option<&str>| {
        let members = employees
            .iter()
            .filter(|employee| employee.department_id.as_deref() == department_id);
        let (mut headcount, mut active) = (0, 0);
        for employee in members {
            headcount += 1;
            if employee.status == EmployeeStatus::Active {
                active += 1;
            }
        }
        (headcount, active)
    };

    let mut rows: Vec<DepartmentHeadcount> = departments
        .into_iter()
        .map(|department| {
            let (headcount, active) = tally(Some(&department.id));
            DepartmentHeadcount {
                department_id: Some(department.id),
                name: department.name,
                headcount,
                active,
            }
        })
        .collect();

    let (headcount, active) = tally(None);
    if headcount > 0 {
        rows.push(DepartmentHeadcount {
            department_id: None,
            name: "Unassigned".to_string(),
            headcount,
            active,
        });
    }

    Ok(Json(rows))
}

async fn build_attendance_rows(
    state: &AppState,
    range: &ReportRangeQuery,
) -> Result<Vec<AttendanceReportRow>, AppError> {
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if from > to {
            return Err(AppError::BadRequest("from must be on or before to".to_string()));
        }
    }

    let mut rows: HashMap<String, AttendanceReportRow> = state
        .collection::<Employee>()
        .all()
        .await?
        .into_iter()
        .map(|employee| {
            let row = AttendanceReportRow {
                employee_id: employee.id.clone(),
                employee_code: employee.employee_code.clone(),
                name: employee.full_name(),
                days_present: 0,
                days_late: 0,
                half_days: 0,
                total_hours: 0.0,
            };
            (employee.id, row)
        })
        .collect();

    for record in state.collection::<AttendanceRecord>().all().await? {
        if !range.includes(record.date) {
            continue;
        }
        let Some(row) = rows.get_mut(&record.employee_id) else {
            continue;
        };
        row.days_present += 1;
        match record.status {
            AttendanceStatus::Late => row.days_late += 1,
            AttendanceStatus::HalfDay => row.half_days += 1,
            AttendanceStatus::Present => {}
        }
        row.total_hours = round2(row.total_hours + record.work_hours.unwrap_or_default());
    }

    let mut rows: Vec<AttendanceReportRow> = rows.into_values().collect();
    rows.sort_by(|a, b| a.employee_code.cmp(&b.employee_code));
    Ok(rows)
}

pub async fn attendance_report(
    State(state): State<AppState>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<Json<Vec<AttendanceReportRow>>, AppError> {
    Ok(Json(build_attendance_rows(&state, &range).await?))
}

pub async fn export_attendance_report(
    State(state): State<AppState>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<Response, AppError> {
    let rows = build_attendance_rows(&state, &range).await?;
    let cells: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| {
            vec![
                row.employee_code,
                row.name,
                row.days_present.to_string(),
                row.days_late.to_string(),
                row.half_days.to_string(),
                format!("{:.2}", row.total_hours),
            ]
        })
        .collect();
    let body = write_csv(
        &[
            "Employee Code",
            "Name",
            "Days Present",
            "Days Late",
            "Half Days",
            "Total Hours",
        ],
        &cells,
    )?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ATTENDANCE_EXPORT_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}

pub async fn payroll_report(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<PayrollReport>, AppError> {
    let records = state
        .collection::<PayrollRecord>()
        .find(Filter::new().eq_opt("period", query.period.clone()))
        .await?;

    Ok(Json(PayrollReport {
        period: query.period,
        records: records.len() as u64,
        total_gross: round2(records.iter().map(|record| record.gross_pay).sum()),
        total_net: round2(records.iter().map(|record| record.net_pay).sum()),
        paid: records
            .iter()
            .filter(|record| record.status == PayrollStatus::Paid)
            .count() as u64,
    }))
}

pub async fn leave_report(State(state): State<AppState>) -> Result<Json<LeaveReport>, AppError> {
    let leaves = state.collection::<LeaveRequest>().all().await?;
    let mut by_status = BTreeMap::new();
    let mut by_type = BTreeMap::new();
    for leave in &leaves {
        *by_status.entry(leave.status.as_str().to_string()).or_insert(0) += 1;
        *by_type.entry(leave.leave_type.as_str().to_string()).or_insert(0) += 1;
    }

    Ok(Json(LeaveReport {
        total: leaves.len() as u64,
        by_status,
        by_type,
    }))
}
