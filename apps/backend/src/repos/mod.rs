//! Persistence seam: a best-effort durable mirror of live match state.
//!
//! The in-memory engine is authoritative. Writes are queued to a single
//! background writer so they land in the order they were made; failures are
//! logged and never reach gameplay.

pub mod memory;
pub mod writer;

use async_trait::async_trait;

use crate::domain::state::{ChatEntry, Match, Participant};

pub use memory::InMemoryStore;
pub use writer::PersistenceWriter;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// One queued write.
#[derive(Debug, Clone)]
pub enum PersistOp {
    SaveMatch(Match),
    SaveParticipant(Participant),
    AppendChat(ChatEntry),
}

impl PersistOp {
    pub fn kind(&self) -> &'static str {
        match self {
            PersistOp::SaveMatch(_) => "save_match",
            PersistOp::SaveParticipant(_) => "save_participant",
            PersistOp::AppendChat(_) => "append_chat",
        }
    }
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn save_match(&self, m: &Match) -> Result<(), PersistError>;

    async fn save_participant(&self, p: &Participant) -> Result<(), PersistError>;

    async fn append_chat(&self, entry: &ChatEntry) -> Result<(), PersistError>;
}
