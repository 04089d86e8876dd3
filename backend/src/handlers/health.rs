use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

pub const HEALTH_MESSAGE: &str = "HR Management API is running";

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Liveness probe. Never touches the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: HEALTH_MESSAGE,
    })
}
