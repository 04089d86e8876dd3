use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    db::Filter,
    error::AppError,
    extract::Payload,
    handlers::common::{employee_scope, resolve_acting_employee, EmployeeParam},
    middleware,
    models::{
        attendance::{AttendanceQuery, AttendanceRecord, CheckInOutRequest},
        employee::EmployeeStatus,
        user::User,
    },
    state::AppState,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance))
        .route("/today", get(today_attendance))
        .route("/check-in", post(check_in))
        .route("/check-out", post(check_out))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth))
}

fn todays_record_filter(employee_id: &str, state: &AppState) -> Filter {
    let today = Utc::now().with_timezone(&state.config.time_zone).date_naive();
    Filter::new()
        .eq("employee_id", employee_id)
        .eq("date", today.to_string())
}

pub async fn check_in(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Option<Payload<CheckInOutRequest>>,
) -> Result<(StatusCode, Json<AttendanceRecord>), AppError> {
    let Payload(payload) = payload.unwrap_or_else(|| Payload(CheckInOutRequest::default()));
    payload.validate()?;

    let employee = resolve_acting_employee(&state, &user, payload.employee_id.as_deref()).await?;
    if employee.status == EmployeeStatus::Terminated {
        return Err(AppError::BadRequest(
            "Terminated employees cannot check in".to_string(),
        ));
    }

    let records = state.collection::<AttendanceRecord>();
    if records
        .find_one(todays_record_filter(&employee.id, &state))
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Already checked in today".to_string()));
    }

    let now = Utc::now();
    let local = now.with_timezone(&state.config.time_zone);
    let record = AttendanceRecord::check_in(
        employee.id.clone(),
        local.date_naive(),
        local.time(),
        state.config.workday_start,
        now,
        payload.notes.filter(|notes| !notes.trim().is_empty()),
    );
    records.insert(&record).await?;
    tracing::info!(
        employee_id = %employee.id,
        status = ?record.status,
        "Checked in"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn check_out(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Option<Payload<CheckInOutRequest>>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let Payload(payload) = payload.unwrap_or_else(|| Payload(CheckInOutRequest::default()));
    payload.validate()?;

    let employee = resolve_acting_employee(&state, &user, payload.employee_id.as_deref()).await?;
    let records = state.collection::<AttendanceRecord>();
    let mut record = records
        .find_one(todays_record_filter(&employee.id, &state))
        .await?
        .ok_or_else(|| AppError::BadRequest("No check-in recorded for today".to_string()))?;

    if !record.is_open() {
        return Err(AppError::BadRequest("Already checked out today".to_string()));
    }

    record.check_out(Utc::now());
    if let Some(notes) = payload.notes.filter(|notes| !notes.trim().is_empty()) {
        record.notes = Some(notes);
    }
    records.replace(&record).await?;
    tracing::info!(
        employee_id = %employee.id,
        work_hours = record.work_hours.unwrap_or_default(),
        "Checked out"
    );

    Ok(Json(record))
}

pub async fn list_attendance(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(AppError::BadRequest("from must be on or before to".to_string()));
        }
    }

    let scope = employee_scope(&state, &user, query.employee_id.clone()).await?;
    let Some(filter) = scope.apply(Filter::new()) else {
        return Ok(Json(Vec::new()));
    };

    let mut records: Vec<AttendanceRecord> = state
        .collection::<AttendanceRecord>()
        .find(filter)
        .await?
        .into_iter()
        .filter(|record| query.includes(record.date))
        .collect();
    records.sort_by(|a, b| b.date.cmp(&a.date).then(b.check_in.cmp(&a.check_in)));

    Ok(Json(records))
}

/// Today's record for the caller (or the requested employee for staff), `null` if none.
pub async fn today_attendance(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(param): Query<EmployeeParam>,
) -> Result<Json<Option<AttendanceRecord>>, AppError> {
    let employee = resolve_acting_employee(&state, &user, param.employee_id.as_deref()).await?;
    let record = state
        .collection::<AttendanceRecord>()
        .find_one(todays_record_filter(&employee.id, &state))
        .await?;
    Ok(Json(record))
}
