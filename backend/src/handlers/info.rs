use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::{app::API_PREFIXES, docs::ApiDoc, state::AppState};

pub const API_NAME: &str = "HR Management API";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub endpoints: Vec<String>,
    pub docs: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_info))
        .route("/openapi.json", get(openapi_document))
}

pub async fn api_info(State(state): State<AppState>) -> Json<ApiInfo> {
    Json(ApiInfo {
        name: API_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.as_str().to_string(),
        endpoints: API_PREFIXES.iter().map(|prefix| prefix.to_string()).collect(),
        docs: "/api/docs".to_string(),
    })
}

pub async fn openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
