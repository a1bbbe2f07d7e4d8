//! Chat handler.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use localchat_core::ChatReply;
use tracing::debug;

use crate::dto::ChatBody;
use crate::error::HttpError;
use crate::state::AppState;

/// `POST /chat`: validate the body and run one generation.
///
/// The raw body is read and parsed here instead of through the `Json`
/// extractor so that oversized bodies and parse failures come back in the
/// `{errorMessage}` shape.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatReply>, HttpError> {
    let body = body.map_err(|rejection| {
        debug!(status = %rejection.status(), "Could not read chat body");
        HttpError::from(rejection)
    })?;
    let body: ChatBody = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Rejected chat body");
        HttpError::from(e)
    })?;

    let request = state
        .chat
        .prepare(body.prompt.as_deref(), body.max_tokens)?;
    let reply = state.chat.generate(&request).await?;

    Ok(Json(reply))
}
