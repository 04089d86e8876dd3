use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use validator::Validate;

use crate::{
    db::Filter,
    error::AppError,
    extract::Payload,
    handlers::common::{
        employee_scope, ensure_can_access, find_employee, not_found, require_staff,
    },
    middleware,
    models::{
        employee::EmployeeStatus,
        leave::LeaveRequest,
        notification::NotificationKind,
        payroll::{GeneratePayrollRequest, PayrollQuery, PayrollRecord, PayrollStatus},
        user::User,
    },
    services::{
        notifications::notify_employee,
        payroll::{compute, unpaid_leave_days, PayrollInput},
    },
    state::AppState,
    utils::time::{inclusive_days, month_bounds, parse_period},
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_payroll))
        .route("/generate", post(generate_payroll))
        .route("/{id}", get(get_payroll).delete(delete_payroll))
        .route("/{id}/pay", put(pay_payroll))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth))
}

async fn load_record(state: &AppState, id: &str) -> Result<PayrollRecord, AppError> {
    state
        .collection::<PayrollRecord>()
        .get(id)
        .await?
        .ok_or_else(|| not_found("Payroll record"))
}

pub async fn generate_payroll(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Payload(payload): Payload<GeneratePayrollRequest>,
) -> Result<(StatusCode, Json<PayrollRecord>), AppError> {
    require_staff(&user)?;
    payload.validate()?;
    let period_start = parse_period(&payload.period).ok_or_else(|| {
        AppError::BadRequest("period must be formatted as YYYY-MM".to_string())
    })?;

    let employee = find_employee(&state, &payload.employee_id).await?;
    if employee.status == EmployeeStatus::Terminated {
        return Err(AppError::BadRequest(
            "Cannot generate payroll for a terminated employee".to_string(),
        ));
    }

    let records = state.collection::<PayrollRecord>();
    if records
        .find_one(
            Filter::new()
                .eq("employee_id", employee.id.as_str())
                .eq("period", payload.period.as_str()),
        )
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Payroll for {} already exists",
            payload.period
        )));
    }

    let (first_day, last_day) = month_bounds(period_start);
    let leaves = state
        .collection::<LeaveRequest>()
        .find(Filter::new().eq("employee_id", employee.id.as_str()))
        .await?;

    let breakdown = compute(PayrollInput {
        base_salary: employee.base_salary,
        allowances: payload.allowances.unwrap_or_default(),
        bonus: payload.bonus.unwrap_or_default(),
        deductions: payload.deductions.unwrap_or_default(),
        unpaid_leave_days: unpaid_leave_days(&leaves, first_day, last_day),
        days_in_month: inclusive_days(first_day, last_day),
    });
    let record = PayrollRecord::new(employee.id.clone(), payload.period.clone(), breakdown);
    records.insert(&record).await?;
    tracing::info!(
        payroll_id = %record.id,
        employee_id = %employee.id,
        period = %record.period,
        net_pay = record.net_pay,
        "Payroll generated"
    );

    notify_employee(
        &state,
        &employee,
        "Payslip available",
        format!(
            "Your payslip for {} is ready. Net pay: {:.2}.",
            record.period, record.net_pay
        ),
        NotificationKind::Payroll,
    )
    .await;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_payroll(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<PayrollQuery>,
) -> Result<Json<Vec<PayrollRecord>>, AppError> {
    let scope = employee_scope(&state, &user, query.employee_id.clone()).await?;
    let base = Filter::new().eq_opt("period", query.period.clone());
    let Some(filter) = scope.apply(base) else {
        return Ok(Json(Vec::new()));
    };

    let mut records = state.collection::<PayrollRecord>().find(filter).await?;
    records.sort_by(|a, b| b.period.cmp(&a.period).then(b.created_at.cmp(&a.created_at)));
    Ok(Json(records))
}

pub async fn get_payroll(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<PayrollRecord>, AppError> {
    let record = load_record(&state, &id).await?;
    ensure_can_access(&state, &user, &record.employee_id).await?;
    Ok(Json(record))
}

pub async fn pay_payroll(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<PayrollRecord>, AppError> {
    require_staff(&user)?;
    let mut record = load_record(&state, &id).await?;
    if record.status == PayrollStatus::Paid {
        return Err(AppError::Conflict("Payroll record is already paid".to_string()));
    }

    record.mark_paid();
    state.collection::<PayrollRecord>().replace(&record).await?;
    tracing::info!(payroll_id = %record.id, "Payroll marked as paid");

    if let Ok(employee) = find_employee(&state, &record.employee_id).await {
        notify_employee(
            &state,
            &employee,
            "Salary paid",
            format!("Your salary for {} has been paid.", record.period),
            NotificationKind::Payroll,
        )
        .await;
    }

    Ok(Json(record))
}

pub async fn delete_payroll(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_staff(&user)?;
    let record = load_record(&state, &id).await?;
    if record.status == PayrollStatus::Paid {
        return Err(AppError::Conflict(
            "Paid payroll records cannot be deleted".to_string(),
        ));
    }

    state.collection::<PayrollRecord>().delete(&record.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
