use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, put},
    Json, Router,
};
use validator::Validate;

use crate::{
    db::Filter,
    error::AppError,
    extract::Payload,
    handlers::common::{
        employee_scope, ensure_can_access, find_employee, linked_employee, not_found,
        require_staff, resolve_acting_employee,
    },
    middleware,
    models::{
        leave::{
            is_valid_leave_window, CreateLeaveRequest, LeaveQuery, LeaveRequest, LeaveStatus,
            ReviewLeaveRequest,
        },
        notification::NotificationKind,
        user::User,
    },
    services::notifications::notify_employee,
    state::AppState,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_leaves).post(create_leave))
        .route("/{id}", get(get_leave).delete(cancel_leave))
        .route("/{id}/approve", put(approve_leave))
        .route("/{id}/reject", put(reject_leave))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth))
}

async fn load_leave(state: &AppState, id: &str) -> Result<LeaveRequest, AppError> {
    state
        .collection::<LeaveRequest>()
        .get(id)
        .await?
        .ok_or_else(|| not_found("Leave request"))
}

pub async fn create_leave(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Payload(payload): Payload<CreateLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveRequest>), AppError> {
    payload.validate()?;
    if !is_valid_leave_window(payload.start_date, payload.end_date) {
        return Err(AppError::BadRequest(
            "start_date must be on or before end_date".to_string(),
        ));
    }

    let employee = resolve_acting_employee(&state, &user, payload.employee_id.as_deref()).await?;
    let leaves = state.collection::<LeaveRequest>();

    let conflicting = leaves
        .find(Filter::new().eq("employee_id", employee.id.as_str()))
        .await?
        .into_iter()
        .any(|leave| leave.status.is_active() && leave.overlaps(payload.start_date, payload.end_date));
    if conflicting {
        return Err(AppError::Conflict(
            "Leave overlaps an existing pending or approved request".to_string(),
        ));
    }

    let leave = LeaveRequest::new(
        employee.id.clone(),
        payload.leave_type,
        payload.start_date,
        payload.end_date,
        payload.reason.filter(|reason| !reason.trim().is_empty()),
    );
    leaves.insert(&leave).await?;
    tracing::info!(
        leave_id = %leave.id,
        employee_id = %employee.id,
        days = leave.days,
        "Leave requested"
    );

    Ok((StatusCode::CREATED, Json(leave)))
}

pub async fn list_leaves(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<LeaveQuery>,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    let scope = employee_scope(&state, &user, query.employee_id.clone()).await?;
    let base = Filter::new().eq_opt("status", query.status.map(|status| status.as_str()));
    let Some(filter) = scope.apply(base) else {
        return Ok(Json(Vec::new()));
    };

    let mut leaves = state.collection::<LeaveRequest>().find(filter).await?;
    leaves.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(leaves))
}

pub async fn get_leave(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<LeaveRequest>, AppError> {
    let leave = load_leave(&state, &id).await?;
    ensure_can_access(&state, &user, &leave.employee_id).await?;
    Ok(Json(leave))
}

async fn review_leave(
    state: &AppState,
    reviewer: &User,
    id: &str,
    decision: LeaveStatus,
    payload: Option<Payload<ReviewLeaveRequest>>,
) -> Result<LeaveRequest, AppError> {
    require_staff(reviewer)?;
    let Payload(payload) = payload.unwrap_or_else(|| Payload(ReviewLeaveRequest::default()));
    payload.validate()?;

    let mut leave = load_leave(state, id).await?;
    if leave.status != LeaveStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Leave request is already {}",
            leave.status.as_str()
        )));
    }

    leave.review(
        decision,
        &reviewer.id,
        payload.comment.filter(|comment| !comment.trim().is_empty()),
    );
    state.collection::<LeaveRequest>().replace(&leave).await?;
    tracing::info!(
        leave_id = %leave.id,
        reviewer_id = %reviewer.id,
        decision = decision.as_str(),
        "Leave reviewed"
    );

    if let Ok(employee) = find_employee(state, &leave.employee_id).await {
        let message = format!(
            "Your {} leave from {} to {} was {}.",
            leave.leave_type.as_str(),
            leave.start_date,
            leave.end_date,
            decision.as_str()
        );
        notify_employee(state, &employee, "Leave request update", message, NotificationKind::Leave)
            .await;
    }

    Ok(leave)
}

pub async fn approve_leave(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    payload: Option<Payload<ReviewLeaveRequest>>,
) -> Result<Json<LeaveRequest>, AppError> {
    Ok(Json(
        review_leave(&state, &user, &id, LeaveStatus::Approved, payload).await?,
    ))
}

pub async fn reject_leave(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    payload: Option<Payload<ReviewLeaveRequest>>,
) -> Result<Json<LeaveRequest>, AppError> {
    Ok(Json(
        review_leave(&state, &user, &id, LeaveStatus::Rejected, payload).await?,
    ))
}

/// The requesting employee (or staff) withdraws a request that is still pending.
pub async fn cancel_leave(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<LeaveRequest>, AppError> {
    let mut leave = load_leave(&state, &id).await?;

    if !user.is_staff() {
        let own = linked_employee(&state, &user).await?;
        if own.map(|employee| employee.id) != Some(leave.employee_id.clone()) {
            return Err(not_found("Leave request"));
        }
    }
    if leave.status != LeaveStatus::Pending {
        return Err(AppError::Conflict(
            "Only pending requests can be cancelled".to_string(),
        ));
    }

    leave.status = LeaveStatus::Cancelled;
    leave.updated_at = chrono::Utc::now();
    state.collection::<LeaveRequest>().replace(&leave).await?;
    tracing::info!(leave_id = %leave.id, "Leave cancelled");

    Ok(Json(leave))
}
