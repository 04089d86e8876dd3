use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use utoipa::ToSchema;

use crate::db::StoreError;

/// Body returned for every unexpected failure. Nothing else is sent to the client.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    BadRequest(String),
    PayloadTooLarge(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::InternalServerError(anyhow::anyhow!(message.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Some("NOT_FOUND"), None),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, msg, Some("UNAUTHORIZED"), None)
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, Some("FORBIDDEN"), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, Some("CONFLICT"), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Some("BAD_REQUEST"), None),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, msg, Some("PAYLOAD_TOO_LARGE"), None)
            }
            AppError::InternalServerError(err) => {
                tracing::error!("Server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                    None,
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some("VALIDATION_ERROR"),
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        let body = Json(ErrorResponse {
            message,
            code: code.map(str::to_string),
            details,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => AppError::Conflict("Resource already exists".to_string()),
            other => AppError::InternalServerError(other.into()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages)
    }
}

/// Converts a caught handler panic into the generic 500 response.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    let body = Json(ErrorResponse {
        message: GENERIC_ERROR_MESSAGE.to_string(),
        code: None,
        details: None,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn app_error_into_response_maps_status_and_body() {
        let cases = [
            (AppError::BadRequest("bad".into()), StatusCode::BAD_REQUEST, "bad", "BAD_REQUEST"),
            (AppError::Unauthorized("nope".into()), StatusCode::UNAUTHORIZED, "nope", "UNAUTHORIZED"),
            (AppError::Forbidden("denied".into()), StatusCode::FORBIDDEN, "denied", "FORBIDDEN"),
            (AppError::Conflict("taken".into()), StatusCode::CONFLICT, "taken", "CONFLICT"),
            (AppError::NotFound("missing".into()), StatusCode::NOT_FOUND, "missing", "NOT_FOUND"),
            (
                AppError::PayloadTooLarge("big".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
                "big",
                "PAYLOAD_TOO_LARGE",
            ),
        ];

        for (error, status, message, code) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), status);
            let json = response_json(response).await;
            assert_eq!(json["message"], message);
            assert_eq!(json["code"], code);
        }
    }

    #[tokio::test]
    async fn app_error_validation_includes_details() {
        let response = AppError::Validation(vec!["email: email".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["errors"][0], "email: email");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let response =
            AppError::InternalServerError(anyhow::anyhow!("connection refused at 10.0.0.3"))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json, serde_json::json!({ "message": GENERIC_ERROR_MESSAGE }));
    }

    #[tokio::test]
    async fn duplicate_store_error_maps_to_conflict() {
        let err: AppError = StoreError::Duplicate {
            collection: "users".into(),
            id: "1".into(),
        }
        .into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = StoreError::Unavailable("down".into()).into();
        assert!(matches!(err, AppError::InternalServerError(_)));
    }

    #[tokio::test]
    async fn panic_response_is_generic() {
        let response = panic_response(Box::new("index out of bounds".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json, serde_json::json!({ "message": GENERIC_ERROR_MESSAGE }));
    }
}
