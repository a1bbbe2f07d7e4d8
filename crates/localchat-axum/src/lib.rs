//! Axum HTTP adapter for localchat.
//!
//! Exposes `GET /status`, `POST /chat` and `GET /health` over a shared
//! [`ChatService`](localchat_core::ChatService). Every error is returned as
//! `{"errorMessage": "..."}`.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, serve, start_server};
pub use error::HttpError;
pub use routes::{MAX_BODY_BYTES, create_router};
pub use state::AppState;
