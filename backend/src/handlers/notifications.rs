use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, put},
    Json, Router,
};
use validator::Validate;

use crate::{
    db::Filter,
    error::AppError,
    extract::Payload,
    handlers::common::{not_found, require_staff},
    middleware,
    models::{
        notification::{
            CreateNotificationRequest, Notification, NotificationCount, NotificationQuery,
        },
        user::User,
    },
    state::AppState,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/unread-count", get(unread_count))
        .route("/read-all", put(mark_all_read))
        .route("/{id}", delete(delete_notification))
        .route("/{id}/read", put(mark_read))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth))
}

fn unread_filter(user: &User) -> Filter {
    Filter::new()
        .eq("user_id", user.id.as_str())
        .eq("read", false)
}

/// Another user's notification is reported as missing.
async fn load_own(state: &AppState, user: &User, id: &str) -> Result<Notification, AppError> {
    state
        .collection::<Notification>()
        .get(id)
        .await?
        .filter(|notification| notification.user_id == user.id)
        .ok_or_else(|| not_found("Notification"))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let filter = if query.unread_only {
        unread_filter(&user)
    } else {
        Filter::new().eq("user_id", user.id.as_str())
    };
    let mut notifications = state.collection::<Notification>().find(filter).await?;
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(notifications))
}

pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<NotificationCount>, AppError> {
    let count = state
        .collection::<Notification>()
        .count(unread_filter(&user))
        .await?;
    Ok(Json(NotificationCount { count }))
}

pub async fn create_notification(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Payload(payload): Payload<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationCount>), AppError> {
    require_staff(&user)?;
    payload.validate()?;

    let users = state.collection::<User>();
    let recipients: Vec<String> = match payload.user_id.filter(|id| !id.is_empty()) {
        Some(user_id) => {
            let recipient = users.get(&user_id).await?.ok_or_else(|| not_found("User"))?;
            vec![recipient.id]
        }
        None => users
            .find(Filter::new().eq("is_active", true))
            .await?
            .into_iter()
            .map(|recipient| recipient.id)
            .collect(),
    };

    let kind = payload.kind.unwrap_or_default();
    let notifications = state.collection::<Notification>();
    for recipient in &recipients {
        let notification = Notification::new(
            recipient.clone(),
            payload.title.clone(),
            payload.message.clone(),
            kind,
        );
        notifications.insert(&notification).await?;
    }
    tracing::info!(
        sender_id = %user.id,
        recipients = recipients.len(),
        "Notifications sent"
    );

    Ok((
        StatusCode::CREATED,
        Json(NotificationCount {
            count: recipients.len() as u64,
        }),
    ))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, AppError> {
    let mut notification = load_own(&state, &user, &id).await?;
    if notification.mark_read() {
        state
            .collection::<Notification>()
            .replace(&notification)
            .await?;
    }
    Ok(Json(notification))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<NotificationCount>, AppError> {
    let notifications = state.collection::<Notification>();
    let mut count = 0;
    for mut notification in notifications.find(unread_filter(&user)).await? {
        if notification.mark_read() {
            notifications.replace(&notification).await?;
            count += 1;
        }
    }
    Ok(Json(NotificationCount { count }))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let notification = load_own(&state, &user, &id).await?;
    state
        .collection::<Notification>()
        .delete(&notification.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
