//! Outbound event protocol.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::snapshot::{MatchSnapshot, ParticipantView};
use crate::domain::state::{ChatEntry, MatchId, ParticipantId, Phase, Winner};
use crate::domain::rooms::Room;
use crate::domain::voting::TallyEntry;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topic {
    /// Everything that happens inside one match.
    Match { id: MatchId },
    /// Arena-wide announcements.
    Arena,
}

impl Topic {
    pub fn of(id: MatchId) -> Self {
        Topic::Match { id }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    PhaseChange {
        phase: Phase,
        round_number: u32,
        #[serde(with = "time::serde::rfc3339")]
        deadline: OffsetDateTime,
    },
    StateSnapshot(MatchSnapshot),
    /// Sent when the kill happens and again, with a reporter, when the body
    /// is found.
    Kill {
        victim_id: ParticipantId,
        room: Room,
        reporter_id: Option<ParticipantId>,
    },
    Chat {
        entry: ChatEntry,
    },
    VoteUpdate {
        participant_id: ParticipantId,
        has_voted: bool,
    },
    VoteResults {
        tally: Vec<TallyEntry>,
        ejected_id: Option<ParticipantId>,
    },
    MatchEnd {
        winner: Winner,
        impostor_id: Option<ParticipantId>,
        first_death_id: Option<ParticipantId>,
    },
    LobbyUpdate {
        participants: Vec<ParticipantView>,
        #[serde(with = "time::serde::rfc3339::option")]
        countdown_deadline: Option<OffsetDateTime>,
    },
    ArenaMatchCreated {
        match_id: MatchId,
    },
}

impl MatchEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            MatchEvent::PhaseChange { .. } => "phase_change",
            MatchEvent::StateSnapshot(_) => "state_snapshot",
            MatchEvent::Kill { .. } => "kill",
            MatchEvent::Chat { .. } => "chat",
            MatchEvent::VoteUpdate { .. } => "vote_update",
            MatchEvent::VoteResults { .. } => "vote_results",
            MatchEvent::MatchEnd { .. } => "match_end",
            MatchEvent::LobbyUpdate { .. } => "lobby_update",
            MatchEvent::ArenaMatchCreated { .. } => "arena_match_created",
        }
    }
}

/// What subscribers receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub protocol: i32,
    pub topic: Topic,
    #[serde(flatten)]
    pub event: MatchEvent,
}

impl Envelope {
    pub fn new(topic: Topic, event: MatchEvent) -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            topic,
            event,
        }
    }
}
