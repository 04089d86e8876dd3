//! Request body extractors that report malformed input as `400 Bad Request`.

use axum::{
    extract::{FromRequest, OptionalFromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Oversized bodies keep their 413; every other rejection is a 400.
fn body_error(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(message)
    }
}

/// Accepts `application/json` or `application/x-www-form-urlencoded` bodies.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false);

        if is_form {
            let Form(value) = <Form<T> as FromRequest<S>>::from_request(req, state)
                .await
                .map_err(|rejection| body_error(rejection.status(), rejection.body_text()))?;
            return Ok(Payload(value));
        }

        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(|rejection| body_error(rejection.status(), rejection.body_text()))?;
        Ok(Payload(value))
    }
}

/// `Option<Payload<T>>` yields `None` when the request carries no body type at all,
/// so endpoints with only optional fields can be called without a body.
impl<T, S> OptionalFromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        if !req.headers().contains_key(CONTENT_TYPE) {
            return Ok(None);
        }
        <Payload<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn request(content_type: &str, body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn parses_json_body() {
        let Payload(sample) = <Payload<Sample> as FromRequest<()>>::from_request(
            request("application/json", r#"{"name":"a","count":2}"#),
            &(),
        )
        .await
        .expect("json payload");
        assert_eq!(sample.name, "a");
        assert_eq!(sample.count, 2);
    }

    #[tokio::test]
    async fn parses_urlencoded_body() {
        let Payload(sample) = <Payload<Sample> as FromRequest<()>>::from_request(
            request("application/x-www-form-urlencoded; charset=utf-8", "name=b&count=3"),
            &(),
        )
        .await
        .expect("form payload");
        assert_eq!(sample.name, "b");
        assert_eq!(sample.count, 3);
    }

    #[tokio::test]
    async fn optional_payload_is_none_without_content_type() {
        let req = Request::builder()
            .method("PUT")
            .uri("/")
            .body(Body::empty())
            .expect("request");
        let payload = <Payload<Sample> as OptionalFromRequest<()>>::from_request(req, &())
            .await
            .expect("optional payload");
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = <Payload<Sample> as FromRequest<()>>::from_request(
            request("application/json", "{not json"),
            &(),
        )
        .await
        .expect_err("malformed");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_keeps_payload_too_large() {
        let err = body_error(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into());
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
        let err = body_error(StatusCode::UNPROCESSABLE_ENTITY, "missing field".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
