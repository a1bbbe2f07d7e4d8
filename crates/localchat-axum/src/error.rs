//! Axum-specific error types and mappings.
//!
//! Maps [`ChatError`], body read failures and body parse failures to HTTP
//! status codes. Every error body has the shape `{"errorMessage": "..."}`.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::http::header::RETRY_AFTER;
use axum::response::{IntoResponse, Response};
use localchat_core::ChatError;
use serde::Serialize;
use serde_json::error::Category;
use thiserror::Error;

/// Seconds a client should wait before retrying while the model loads.
const RETRY_AFTER_SECS: &str = "5";

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("{0}")]
    BadRequest(String),

    /// Unknown path or unsupported method.
    #[error("{0}")]
    NotFound(String),

    /// Request body over the configured limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Model not loaded.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub fn not_found() -> Self {
        Self::NotFound("Not found".to_string())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error_message: self.to_string(),
        };

        let mut response = (status, axum::Json(body)).into_response();

        if status == StatusCode::SERVICE_UNAVAILABLE
            && let Ok(value) = RETRY_AFTER_SECS.parse()
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }

        response
    }
}

impl From<ChatError> for HttpError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(msg) => Self::BadRequest(msg),
            ChatError::NotReady => Self::ServiceUnavailable(err.to_string()),
            ChatError::Generation(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<BytesRejection> for HttpError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge("Request body too large".to_string())
        } else {
            Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Syntax | Category::Eof | Category::Io => {
                Self::BadRequest("Invalid JSON".to_string())
            }
            Category::Data => Self::BadRequest(format!("Invalid request body: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_status_mapping() {
        let cases = [
            (
                ChatError::Validation("Prompt is required".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ChatError::NotReady, StatusCode::SERVICE_UNAVAILABLE),
            (
                ChatError::Generation("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(HttpError::from(err).status(), status);
        }
    }

    #[test]
    fn test_messages_pass_through_unchanged() {
        let err = HttpError::from(ChatError::Generation("boom".into()));
        assert_eq!(err.to_string(), "Failed to generate response: boom");
        assert_eq!(HttpError::not_found().to_string(), "Not found");
    }

    #[test]
    fn test_json_syntax_vs_shape() {
        let syntax = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        assert_eq!(HttpError::from(syntax).to_string(), "Invalid JSON");

        let eof = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        assert_eq!(HttpError::from(eof).to_string(), "Invalid JSON");

        let shape = serde_json::from_str::<crate::dto::ChatBody>(r#"{"prompt":1}"#).unwrap_err();
        assert!(
            HttpError::from(shape)
                .to_string()
                .starts_with("Invalid request body: ")
        );
    }

    #[test]
    fn test_payload_too_large_is_json() {
        let err = HttpError::PayloadTooLarge("Request body too large".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[test]
    fn test_retry_after_only_on_503() {
        let busy = HttpError::from(ChatError::NotReady).into_response();
        assert_eq!(busy.headers()[RETRY_AFTER], "5");

        let missing = HttpError::not_found().into_response();
        assert!(missing.headers().get(RETRY_AFTER).is_none());
    }
}
