//! Domain types.
//!
//! Pure data with no infrastructure dependencies.

mod candidate;
mod chat;
mod state;

pub use candidate::{CandidateList, ModelCandidate};
pub use chat::{ChatError, ChatReply, ChatRequest, TokenLimits};
pub use state::{CandidateFailure, LoadOutcome, LoadState, ServiceStatus};
