//! Request bodies accepted by the HTTP API.

use serde::Deserialize;

/// Body of `POST /chat`.
///
/// Fields are left optional so that a missing prompt surfaces as the
/// "Prompt is required" validation error rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, alias = "max_tokens")]
    pub max_tokens: Option<i64>,
}
