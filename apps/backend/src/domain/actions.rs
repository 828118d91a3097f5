//! Command validation and the pure effect of each legal command.
//!
//! Every `apply_*` validates first and mutates only after every check has
//! passed, so a rejected command never leaves a partial change behind.
//! Phase transitions triggered by an action (body report, early vote
//! completion, a win after a kill) are reported in the outcome and carried
//! out by the caller.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::rooms::Room;
use crate::domain::rules::{chat_len, MAX_CHAT_LEN, MIN_CHAT_LEN};
use crate::domain::state::{
    Body, ChatEntry, MatchState, MatchStatus, Participant, ParticipantId, Phase, Role, Winner,
};
use crate::domain::win;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved {
        participant: ParticipantId,
        from: Room,
        to: Room,
    },
    /// Mover walked into the room holding the unreported body.
    BodyReported {
        reporter: ParticipantId,
        from: Room,
        body: Body,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillOutcome {
    pub killer: ParticipantId,
    pub victim: ParticipantId,
    pub room: Room,
    /// True when this kill wrote the match's first-death record.
    pub first_death: bool,
    pub winner: Option<Winner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub voter: ParticipantId,
    pub target: Option<ParticipantId>,
    /// Every living participant has now voted.
    pub all_voted: bool,
}

/// The match must be playing and in `expected`.
pub fn ensure_phase(state: &MatchState, expected: Phase) -> Result<(), DomainError> {
    match state.info.status {
        MatchStatus::Finished => {
            return Err(DomainError::validation(
                ValidationKind::MatchFinished,
                "match is finished",
            ))
        }
        MatchStatus::Waiting => {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("match has not started; {expected} commands are not accepted"),
            ))
        }
        MatchStatus::Playing => {}
    }
    if state.info.phase != expected {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!(
                "expected phase {expected}, match is in {}",
                state.info.phase
            ),
        ));
    }
    Ok(())
}

fn living_actor(state: &MatchState, id: ParticipantId) -> Result<&Participant, DomainError> {
    let actor = state.require_participant(id)?;
    if !actor.alive {
        return Err(DomainError::validation(
            ValidationKind::ParticipantDead,
            format!("participant {id} is dead"),
        ));
    }
    Ok(actor)
}

/// Returns the room the mover leaves.
pub fn validate_move(state: &MatchState, id: ParticipantId, to: Room) -> Result<Room, DomainError> {
    ensure_phase(state, Phase::Roaming)?;
    let actor = living_actor(state, id)?;
    if !actor.room.is_adjacent(to) {
        return Err(DomainError::validation(
            ValidationKind::NotAdjacent,
            format!("{} is not adjacent to {}", to, actor.room),
        ));
    }
    Ok(actor.room)
}

pub fn apply_move(
    state: &mut MatchState,
    id: ParticipantId,
    to: Room,
) -> Result<MoveOutcome, DomainError> {
    let from = validate_move(state, id, to)?;
    if let Some(p) = state.participant_mut(id) {
        p.room = to;
    }
    match state.info.body {
        Some(body) if body.room == to => Ok(MoveOutcome::BodyReported {
            reporter: id,
            from,
            body,
        }),
        _ => Ok(MoveOutcome::Moved {
            participant: id,
            from,
            to,
        }),
    }
}

/// The single living participant sharing the killer's room.
pub fn kill_victim(state: &MatchState, killer: ParticipantId) -> Result<ParticipantId, DomainError> {
    ensure_phase(state, Phase::Roaming)?;
    let actor = living_actor(state, killer)?;
    if actor.role != Role::Impostor {
        return Err(DomainError::validation(
            ValidationKind::NotImpostor,
            "only the impostor can kill",
        ));
    }

    let mut others = state
        .living()
        .filter(|p| p.room == actor.room && p.id != killer);
    match (others.next(), others.next()) {
        (Some(victim), None) => Ok(victim.id),
        (None, _) => Err(DomainError::validation(
            ValidationKind::KillBlocked,
            format!("nobody else is in {}", actor.room),
        )),
        (Some(_), Some(_)) => Err(DomainError::validation(
            ValidationKind::KillBlocked,
            format!("too many witnesses in {}", actor.room),
        )),
    }
}

pub fn apply_kill(state: &mut MatchState, killer: ParticipantId) -> Result<KillOutcome, DomainError> {
    let victim = kill_victim(state, killer)?;
    let mut room = None;
    if let Some(p) = state.participant_mut(victim) {
        p.alive = false;
        room = Some(p.room);
    }
    let room = room.ok_or_else(|| DomainError::validation_other("victim vanished mid-kill"))?;

    state.info.body = Some(Body {
        room,
        owner: victim,
    });
    let first_death = state.record_first_death(victim);
    let winner = win::evaluate(state.living_counts());

    Ok(KillOutcome {
        killer,
        victim,
        room,
        first_death,
        winner,
    })
}

pub fn validate_chat(state: &MatchState, id: ParticipantId, text: &str) -> Result<(), DomainError> {
    ensure_phase(state, Phase::Discussion)?;
    living_actor(state, id)?;
    let len = chat_len(text);
    if !(MIN_CHAT_LEN..=MAX_CHAT_LEN).contains(&len) {
        return Err(DomainError::validation(
            ValidationKind::ChatLength,
            format!("chat must be {MIN_CHAT_LEN}..={MAX_CHAT_LEN} characters, got {len}"),
        ));
    }
    Ok(())
}

pub fn apply_chat(
    state: &mut MatchState,
    id: ParticipantId,
    text: &str,
    now: OffsetDateTime,
) -> Result<ChatEntry, DomainError> {
    validate_chat(state, id, text)?;
    let author_color = state.require_participant(id)?.color;
    let entry = ChatEntry {
        id: Uuid::new_v4(),
        match_id: state.info.id,
        author: id,
        author_color,
        text: text.to_string(),
        seq: state.next_chat_seq,
        created_at: now,
    };
    state.next_chat_seq += 1;
    state.chat_log.push(entry.clone());
    Ok(entry)
}

pub fn validate_vote(
    state: &MatchState,
    voter: ParticipantId,
    target: Option<ParticipantId>,
) -> Result<(), DomainError> {
    ensure_phase(state, Phase::Voting)?;
    let actor = living_actor(state, voter)?;
    if actor.has_voted {
        return Err(DomainError::validation(
            ValidationKind::AlreadyVoted,
            format!("participant {voter} already voted this round"),
        ));
    }
    if let Some(target) = target {
        let ok = state.participant(target).is_some_and(|p| p.alive);
        if !ok {
            return Err(DomainError::validation(
                ValidationKind::InvalidVoteTarget,
                format!("{target} is not a living participant"),
            ));
        }
    }
    Ok(())
}

pub fn apply_vote(
    state: &mut MatchState,
    voter: ParticipantId,
    target: Option<ParticipantId>,
) -> Result<VoteOutcome, DomainError> {
    validate_vote(state, voter, target)?;
    if let Some(p) = state.participant_mut(voter) {
        p.has_voted = true;
        p.vote_target = target;
    }
    Ok(VoteOutcome {
        voter,
        target,
        all_voted: state.all_living_voted(),
    })
}
