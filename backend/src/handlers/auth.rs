use axum::{
    extract::{Extension, State},
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
    middleware,
    models::user::{
        normalize_email, AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, User,
        UserResponse, UserRole,
    },
    state::AppState,
    utils::{
        jwt::create_access_token,
        password::{hash_password, verify_password},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/change-password", put(change_password))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    Ok(create_access_token(
        user.id.clone(),
        user.email.clone(),
        user.role.as_str().to_string(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?)
}

pub async fn register(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let users = state.collection::<User>();
    let email = normalize_email(&payload.email);
    if users
        .find_one(Filter::new().eq("email", email.as_str()))
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(
        &email,
        payload.name.trim().to_string(),
        password_hash,
        UserRole::Employee,
    );
    let token = issue_token(&state, &user)?;
    users.insert(&user).await?;
    tracing::info!(user_id = %user.id, "Registered new account");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&payload.email);
    let user = state
        .collection::<User>()
        .find_one(Filter::new().eq("email", email.as_str()))
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !user.is_active || !verify_password(&payload.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Rejected login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
    Payload(payload): Payload<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }
    if payload.current_password == payload.new_password {
        return Err(AppError::BadRequest(
            "New password must differ from the current password".to_string(),
        ));
    }

    user.password_hash = hash_password(&payload.new_password)?;
    user.updated_at = chrono::Utc::now();
    state.collection::<User>().replace(&user).await?;
    tracing::info!(user_id = %user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}
