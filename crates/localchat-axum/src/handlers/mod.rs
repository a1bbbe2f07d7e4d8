//! HTTP request handlers.
//!
//! Handlers are thin wrappers that delegate to `ChatService`.

pub mod chat;
pub mod status;

use crate::error::HttpError;

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found() -> HttpError {
    HttpError::not_found()
}
