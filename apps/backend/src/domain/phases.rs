//! Phase state machine: entry side effects and deadline transitions.

use time::OffsetDateTime;

use crate::domain::roster::ensure_roster_open;
use crate::domain::rules::ROSTER_SIZE;
use crate::domain::state::{MatchState, MatchStatus, ParticipantId, Phase, Winner};
use crate::errors::domain::{DomainError, ValidationKind};

/// What a phase's deadline expiry leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStep {
    /// No body reported: check for a winner, then roam again.
    RepeatRoaming,
    EnterVoting,
    ResolveVotes,
    /// Lobby has no phase deadline of its own.
    Ignore,
}

pub const fn on_deadline(phase: Phase) -> DeadlineStep {
    match phase {
        Phase::Roaming => DeadlineStep::RepeatRoaming,
        Phase::Discussion => DeadlineStep::EnterVoting,
        Phase::Voting => DeadlineStep::ResolveVotes,
        Phase::Lobby => DeadlineStep::Ignore,
    }
}

/// Flip a fully seated match to playing at round 1.
pub fn start(state: &mut MatchState) -> Result<(), DomainError> {
    ensure_roster_open(state)?;
    if state.participants.len() != ROSTER_SIZE || state.info.impostor_id.is_none() {
        return Err(DomainError::validation(
            ValidationKind::RosterIncomplete,
            "roster and roles must be assigned before start",
        ));
    }
    state.info.status = MatchStatus::Playing;
    state.info.round_number = 1;
    Ok(())
}

/// Apply entry side effects for `phase` and set its deadline.
///
/// The stored deadline never moves backwards.
pub fn enter(state: &mut MatchState, phase: Phase, deadline: OffsetDateTime) {
    match phase {
        Phase::Roaming => state.info.body = None,
        Phase::Discussion => state.chat_log.clear(),
        Phase::Voting => {
            for p in state.participants.iter_mut() {
                p.has_voted = false;
                p.vote_target = None;
            }
        }
        Phase::Lobby => {}
    }
    state.info.phase = phase;
    state.info.phase_deadline = Some(match state.info.phase_deadline {
        Some(prev) if prev > deadline => prev,
        _ => deadline,
    });
}

/// Mark a participant ejected by vote.
pub fn eject(state: &mut MatchState, id: ParticipantId) -> bool {
    match state.participant_mut(id) {
        Some(p) if p.alive => {
            p.alive = false;
            true
        }
        _ => false,
    }
}

pub fn advance_round(state: &mut MatchState) {
    state.info.round_number += 1;
}

/// Terminal transition. Returns false if the match was already finished.
pub fn finish(state: &mut MatchState, winner: Winner) -> bool {
    if state.is_finished() {
        return false;
    }
    state.info.status = MatchStatus::Finished;
    state.info.winner = Some(winner);
    true
}
