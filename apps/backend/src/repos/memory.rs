//! In-memory `PersistenceGateway`, the default mirror when no durable store
//! is configured.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{PersistError, PersistenceGateway};
use crate::domain::state::{ChatEntry, Match, MatchId, Participant, ParticipantId};

#[derive(Default)]
pub struct InMemoryStore {
    matches: DashMap<MatchId, Match>,
    participants: DashMap<ParticipantId, Participant>,
    chat: DashMap<MatchId, Vec<ChatEntry>>,
    writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn saved_match(&self, id: MatchId) -> Option<Match> {
        self.matches.get(&id).map(|m| m.clone())
    }

    pub fn saved_participants(&self, match_id: MatchId) -> Vec<Participant> {
        self.participants
            .iter()
            .filter(|p| p.match_id == match_id)
            .map(|p| p.clone())
            .collect()
    }

    /// Every chat line ever appended for the match, across discussions.
    pub fn saved_chat(&self, match_id: MatchId) -> Vec<ChatEntry> {
        self.chat
            .get(&match_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryStore {
    async fn save_match(&self, m: &Match) -> Result<(), PersistError> {
        self.matches.insert(m.id, m.clone());
        self.bump();
        Ok(())
    }

    async fn save_participant(&self, p: &Participant) -> Result<(), PersistError> {
        self.participants.insert(p.id, p.clone());
        self.bump();
        Ok(())
    }

    async fn append_chat(&self, entry: &ChatEntry) -> Result<(), PersistError> {
        self.chat
            .entry(entry.match_id)
            .or_default()
            .push(entry.clone());
        self.bump();
        Ok(())
    }
}
