//! Read-only views of a match: the public snapshot broadcast to
//! subscribers and the per-participant view handed to decision providers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::rooms::Room;
use crate::domain::state::{
    Body, ChatEntry, Color, Match, MatchState, Participant, ParticipantId, Phase, Role,
};

/// Participant as seen by someone who is not them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub color: Color,
    pub identity: Option<String>,
    pub is_ai: bool,
    pub alive: bool,
    pub room: Room,
    pub has_voted: bool,
    /// Hidden until the match is finished.
    pub role: Option<Role>,
}

impl ParticipantView {
    fn of(p: &Participant, reveal_role: bool) -> Self {
        Self {
            id: p.id,
            color: p.color,
            identity: p.identity.clone(),
            is_ai: p.is_ai,
            alive: p.alive,
            room: p.room,
            has_voted: p.has_voted,
            role: reveal_role.then_some(p.role),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    #[serde(rename = "match")]
    pub info: Match,
    pub participants: Vec<ParticipantView>,
    pub chat_log: Vec<ChatEntry>,
    pub time_remaining_ms: u64,
}

/// Subscriber-facing snapshot. Roles and the impostor stay hidden until the
/// match is finished.
pub fn public_snapshot(state: &MatchState, time_remaining: Duration) -> MatchSnapshot {
    let reveal = state.is_finished();
    let mut info = state.info.clone();
    if !reveal {
        info.impostor_id = None;
    }
    MatchSnapshot {
        info,
        participants: state
            .participants
            .iter()
            .map(|p| ParticipantView::of(p, reveal))
            .collect(),
        chat_log: state.chat_log.clone(),
        time_remaining_ms: u64::try_from(time_remaining.as_millis()).unwrap_or(u64::MAX),
    }
}

/// What one participant is allowed to know: their own role, everyone's
/// position and liveness, and the current discussion.
#[derive(Debug, Clone)]
pub struct PlayerView {
    pub me: Participant,
    pub phase: Phase,
    pub round_number: u32,
    pub others: Vec<ParticipantView>,
    pub chat_log: Vec<ChatEntry>,
    pub body: Option<Body>,
}

impl PlayerView {
    pub fn of(state: &MatchState, viewer: ParticipantId) -> Option<Self> {
        let me = state.participant(viewer)?.clone();
        let reveal = state.is_finished();
        Some(Self {
            me,
            phase: state.info.phase,
            round_number: state.info.round_number,
            others: state
                .participants
                .iter()
                .filter(|p| p.id != viewer)
                .map(|p| ParticipantView::of(p, reveal))
                .collect(),
            chat_log: state.chat_log.clone(),
            body: state.info.body,
        })
    }

    pub fn adjacent_rooms(&self) -> &'static [Room] {
        self.me.room.neighbors()
    }

    pub fn living_others(&self) -> impl Iterator<Item = &ParticipantView> {
        self.others.iter().filter(|p| p.alive)
    }

    /// Living participants other than the viewer in `room`.
    pub fn living_in(&self, room: Room) -> usize {
        self.living_others().filter(|p| p.room == room).count()
    }

    pub fn is_impostor(&self) -> bool {
        self.me.role == Role::Impostor
    }
}
