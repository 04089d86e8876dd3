//! Router assembly: domain routers, the shared middleware pipeline and the frontend fallback.

use std::{path::PathBuf, time::Duration};

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::{ServiceBuilder, ServiceExt};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    docs::ApiDoc,
    error::{panic_response, AppError},
    handlers,
    middleware::{log_error_responses, request_id, REQUEST_ID_HEADER},
    state::AppState,
};

/// Mount points of the domain routers, in registration order.
pub const API_PREFIXES: &[&str] = &[
    "/api/auth",
    "/api/users",
    "/api/employees",
    "/api/departments",
    "/api/attendance",
    "/api/leaves",
    "/api/payroll",
    "/api/notifications",
    "/api/exit-interviews",
    "/api/reports",
    "/api/info",
];

pub const FRONTEND_NOTICE: &str = "Backend is running. Frontend should be hosted separately.";

/// How non-API requests are answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frontend {
    /// Production build found on disk: static files plus `index.html` for client routes.
    Bundle { dir: PathBuf, index: PathBuf },
    /// Only `GET /` answers, with [`FRONTEND_NOTICE`].
    Separate,
}

impl Frontend {
    pub fn detect(config: &Config) -> Self {
        let index = config.frontend_index();
        if config.is_production() && config.frontend_dist_dir.is_dir() && index.is_file() {
            Frontend::Bundle {
                dir: config.frontend_dist_dir.clone(),
                index,
            }
        } else {
            Frontend::Separate
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let frontend = Frontend::detect(&state.config);
    match &frontend {
        Frontend::Bundle { dir, .. } => {
            tracing::info!(dir = %dir.display(), "Serving frontend bundle")
        }
        Frontend::Separate => tracing::info!("Frontend bundle not served; GET / returns a notice"),
    }

    let mut router = Router::new()
        .route("/api/health", get(handlers::health::health))
        .nest("/api/auth", handlers::auth::routes(&state))
        .nest("/api/users", handlers::users::routes(&state))
        .nest("/api/employees", handlers::employees::routes(&state))
        .nest("/api/departments", handlers::departments::routes(&state))
        .nest("/api/attendance", handlers::attendance::routes(&state))
        .nest("/api/leaves", handlers::leaves::routes(&state))
        .nest("/api/payroll", handlers::payroll::routes(&state))
        .nest("/api/notifications", handlers::notifications::routes(&state))
        .nest("/api/exit-interviews", handlers::exit_interviews::routes(&state))
        .nest("/api/reports", handlers::reports::routes(&state))
        .nest("/api/info", handlers::info::routes())
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()));

    if frontend == Frontend::Separate {
        router = router.route("/", get(frontend_notice));
    }

    router = router.fallback(move |req: Request| serve_fallback(frontend.clone(), req));

    if let Some(limit) = state.config.body_limit_bytes {
        router = router.layer(DefaultBodyLimit::max(limit));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(cors_layer(&state.config))
                .layer(axum_middleware::from_fn(log_error_responses)),
        )
        .with_state(state)
}

async fn frontend_notice() -> &'static str {
    FRONTEND_NOTICE
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

async fn serve_fallback(frontend: Frontend, req: Request) -> Response {
    if is_api_path(req.uri().path()) {
        return AppError::NotFound("Route not found".to_string()).into_response();
    }

    match frontend {
        Frontend::Bundle { dir, index } => {
            let served = ServeDir::new(dir)
                .fallback(ServeFile::new(index))
                .oneshot(req)
                .await;
            match served {
                Ok(response) => response.into_response(),
                Err(never) => match never {},
            }
        }
        Frontend::Separate => AppError::NotFound("Route not found".to_string()).into_response(),
    }
}

/// Credentialed access for the configured origins, or for any caller when none are set.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let layer = CorsLayer::new()
        .max_age(Duration::from_secs(24 * 60 * 60))
        .allow_credentials(true)
        .expose_headers([request_id.clone()]);

    if config.allows_any_origin() {
        return layer
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request());
    }

    let origins: Vec<HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid FRONTEND_URL origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT, request_id])
}
