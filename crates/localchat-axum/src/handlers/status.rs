//! Status handler.

use axum::Json;
use axum::extract::State;
use localchat_core::ServiceStatus;

use crate::state::AppState;

/// `GET /status`: current load state. Never fails.
pub async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(state.chat.status())
}
