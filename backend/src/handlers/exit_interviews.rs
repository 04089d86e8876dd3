use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use chrono::Utc;
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
        employee::{Employee, EmployeeStatus},
        exit_interview::{
            CreateExitInterview, ExitInterview, ExitInterviewQuery, UpdateExitInterview,
        },
        user::User,
    },
    state::AppState,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_interviews).post(create_interview))
        .route(
            "/{id}",
            get(get_interview)
                .put(update_interview)
                .delete(delete_interview),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::auth))
}

async fn load_interview(state: &AppState, id: &str) -> Result<ExitInterview, AppError> {
    state
        .collection::<ExitInterview>()
        .get(id)
        .await?
        .ok_or_else(|| not_found("Exit interview"))
}

/// A completed exit interview ends the employment.
async fn terminate_employee(state: &AppState, mut employee: Employee) -> Result<(), AppError> {
    if employee.status == EmployeeStatus::Terminated {
        return Ok(());
    }
    employee.status = EmployeeStatus::Terminated;
    employee.updated_at = Utc::now();
    state.collection::<Employee>().replace(&employee).await?;
    tracing::info!(employee_id = %employee.id, "Employee terminated after exit interview");
    Ok(())
}

pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ExitInterviewQuery>,
) -> Result<Json<Vec<ExitInterview>>, AppError> {
    let scope = employee_scope(&state, &user, query.employee_id.clone()).await?;
    let base = Filter::new().eq_opt("status", query.status.map(|status| status.as_str()));
    let Some(filter) = scope.apply(base) else {
        return Ok(Json(Vec::new()));
    };

    let mut interviews = state.collection::<ExitInterview>().find(filter).await?;
    interviews.sort_by(|a, b| b.interview_date.cmp(&a.interview_date));
    Ok(Json(interviews))
}

pub async fn get_interview(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<ExitInterview>, AppError> {
    let interview = load_interview(&state, &id).await?;
    ensure_can_access(&state, &user, &interview.employee_id).await?;
    Ok(Json(interview))
}

pub async fn create_interview(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Payload(payload): Payload<CreateExitInterview>,
) -> Result<(StatusCode, Json<ExitInterview>), AppError> {
    require_staff(&user)?;
    payload.validate()?;

    let employee = find_employee(&state, &payload.employee_id).await?;
    let interview = ExitInterview::from_create(payload, &user.id);
    state.collection::<ExitInterview>().insert(&interview).await?;
    tracing::info!(
        interview_id = %interview.id,
        employee_id = %employee.id,
        "Exit interview recorded"
    );

    if interview.is_completed() {
        terminate_employee(&state, employee).await?;
    }

    Ok((StatusCode::CREATED, Json(interview)))
}

pub async fn update_interview(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateExitInterview>,
) -> Result<Json<ExitInterview>, AppError> {
    require_staff(&user)?;
    payload.validate()?;

    let mut interview = load_interview(&state, &id).await?;
    let was_completed = interview.is_completed();
    interview.apply_update(payload);
    state.collection::<ExitInterview>().replace(&interview).await?;

    if interview.is_completed() && !was_completed {
        let employee = find_employee(&state, &interview.employee_id).await?;
        terminate_employee(&state, employee).await?;
    }

    Ok(Json(interview))
}

pub async fn delete_interview(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_staff(&user)?;
    if !state.collection::<ExitInterview>().delete(&id).await? {
        return Err(not_found("Exit interview"));
    }
    Ok(StatusCode::NO_CONTENT)
}
