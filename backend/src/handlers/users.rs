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
    handlers::common::not_found,
    middleware,
    models::{
        employee::Employee,
        user::{UpdateUser, User, UserResponse, UserRole},
        PaginatedResponse, PaginationQuery,
    },
    state::AppState,
};

/// Account administration. Every route requires the admin role.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth_admin))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<UserResponse>>, AppError> {
    let mut users = state.collection::<User>().all().await?;
    users.sort_by(|a, b| a.email.cmp(&b.email));
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(pagination.paginate(users)))
}

async fn load_user(state: &AppState, id: &str) -> Result<User, AppError> {
    state
        .collection::<User>()
        .get(id)
        .await?
        .ok_or_else(|| not_found("User"))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(load_user(&state, &id).await?.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateUser>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;
    let mut user = load_user(&state, &id).await?;

    if user.id == admin.id
        && (payload.role.is_some_and(|role| role != UserRole::Admin)
            || payload.is_active == Some(false))
    {
        return Err(AppError::BadRequest(
            "Admins cannot demote or deactivate their own account".to_string(),
        ));
    }

    if let Some(name) = payload.name {
        user.name = name.trim().to_string();
    }
    if let Some(role) = payload.role {
        user.role = role;
    }
    if let Some(is_active) = payload.is_active {
        user.is_active = is_active;
    }
    user.updated_at = Utc::now();

    state.collection::<User>().replace(&user).await?;
    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User updated");
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if id == admin.id {
        return Err(AppError::BadRequest(
            "Admins cannot delete their own account".to_string(),
        ));
    }
    if !state.collection::<User>().delete(&id).await? {
        return Err(not_found("User"));
    }

    // Keep employee records, just drop the account link.
    let employees = state.collection::<Employee>();
    for mut employee in employees
        .find(Filter::new().eq("user_id", id.as_str()))
        .await?
    {
        employee.user_id = None;
        employee.updated_at = Utc::now();
        employees.replace(&employee).await?;
    }

    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
