//! Decision provider trait definition.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::snapshot::PlayerView;
use crate::domain::{ParticipantId, Room};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Errors that can occur while an AI participant decides.
#[derive(Debug)]
pub enum AiError {
    /// Provider did not answer within the decision timeout
    Timeout,
    /// Provider failed internally (transport, parsing, poisoned state)
    Internal(String),
    /// Provider answered with something the rules cannot use
    InvalidDecision(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Timeout => write!(f, "AI decision timeout"),
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
            AiError::InvalidDecision(msg) => write!(f, "AI invalid decision: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(ErrorCode::InternalError, format!("AI error: {err}"))
    }
}

/// What an AI participant wants to do during roaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "room", rename_all = "snake_case")]
pub enum MovementIntent {
    Move(Room),
    Kill,
    Stay,
}

/// Source of AI participants' decisions.
///
/// Implementations receive only what the acting participant may see. They
/// must not block indefinitely; callers bound every call with a timeout and
/// substitute a local fallback on error.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Move, kill or stay during roaming.
    async fn choose_movement(&self, view: &PlayerView) -> Result<MovementIntent, AiError>;

    /// One discussion line, or `None` to stay quiet.
    async fn compose_chat(&self, view: &PlayerView) -> Result<Option<String>, AiError>;

    /// Vote target; `None` is a skip.
    async fn choose_vote(&self, view: &PlayerView) -> Result<Option<ParticipantId>, AiError>;
}
