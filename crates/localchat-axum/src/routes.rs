//! Route definitions and router construction.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as CorsAny, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::error::HttpError;
use crate::handlers;
use crate::state::AppState;

/// Largest accepted request body. Bigger `/chat` bodies get a JSON 413.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Build CORS layer from configuration.
///
/// The layer answers every `OPTIONS` request itself with an empty 200.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(CorsAny)
            .allow_methods(CorsAny)
            .allow_headers(CorsAny),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(CorsAny)
                .allow_headers(CorsAny)
        }
    }
}

/// Turn a handler panic into a JSON 500.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "Internal server error".to_string());

    error!(panic = %detail, "Handler panicked");
    HttpError::Internal(detail).into_response()
}

/// Create the main Axum router.
///
/// Paths answer only the methods listed here; anything else, including
/// `GET /chat`, falls through to a 404.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route(
            "/status",
            get(handlers::status::status).fallback(handlers::not_found),
        )
        .route(
            "/chat",
            post(handlers::chat::chat).fallback(handlers::not_found),
        )
        .route("/health", get(health_check).fallback(handlers::not_found))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_config))
}

/// Health check endpoint.
pub(crate) async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_panic_payloads() {
        let owned = handle_panic(Box::new(String::from("owned message")));
        assert_eq!(owned.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let borrowed = handle_panic(Box::new("static message"));
        assert_eq!(borrowed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let opaque = handle_panic(Box::new(42_u8));
        assert_eq!(opaque.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
