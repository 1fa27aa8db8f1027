//! Uniform JSON error envelope
//!
//! Every handled failure (404, 405, 500) is rendered as
//! `{"error": "true", "msg": "<message>"}` with the matching status code.

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("404 Not Found: The requested URL was not found on the server. If you entered the URL manually please check your spelling and try again.")]
    NotFound,

    #[error("405 Method Not Allowed: The method is not allowed for the requested URL.")]
    MethodNotAllowed,

    /// Any failure while handling a request. The cause is logged, never returned.
    #[error("500 Internal Server Error: The server encountered an internal error and was unable to complete your request. Either the server is overloaded or there is an error in the application.")]
    Internal(String),
}

impl ApiError {
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        ApiError::Internal(cause.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always the string `"true"`
    pub error: String,
    pub msg: String,
}

impl ErrorEnvelope {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: "true".to_string(),
            msg: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(cause) = &self {
            error!(cause = %cause, "Request failed");
        }

        (self.status(), Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}

// Malformed or non-JSON bodies take the same path as any other handler failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::internal(rejection.body_text())
    }
}

/// Render a caught handler panic as the 500 envelope
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let cause = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(cause).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn envelope_of(response: Response) -> ErrorEnvelope {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let response = ApiError::internal("missing field `test_value`").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let envelope = envelope_of(response).await;
        assert_eq!(envelope.error, "true");
        assert!(envelope.msg.starts_with("500 Internal Server Error"));
        assert!(!envelope.msg.contains("test_value"));
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let envelope = envelope_of(response).await;
        assert!(envelope.msg.starts_with("404 Not Found"));
    }

    #[tokio::test]
    async fn test_panic_response() {
        let response = panic_response(Box::new("kaboom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let envelope = envelope_of(response).await;
        assert_eq!(envelope, ErrorEnvelope::new(ApiError::internal("").to_string()));
    }
}
