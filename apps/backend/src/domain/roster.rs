//! Roster assembly: seat admission, AI fill and impostor assignment.

use rand::prelude::*;

use crate::domain::rooms::Room;
use crate::domain::rules::{PALETTE, ROSTER_SIZE};
use crate::domain::state::{Color, MatchState, MatchStatus, Participant, ParticipantId, Role};
use crate::errors::domain::{DomainError, ValidationKind};

/// Who is asking for a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seat {
    Human { identity: String },
    Ai,
}

/// Roster may only change before the match starts.
pub fn ensure_roster_open(state: &MatchState) -> Result<(), DomainError> {
    match state.info.status {
        MatchStatus::Waiting => Ok(()),
        MatchStatus::Playing => Err(DomainError::validation(
            ValidationKind::MatchAlreadyStarted,
            "match has already started",
        )),
        MatchStatus::Finished => Err(DomainError::validation(
            ValidationKind::MatchFinished,
            "match is finished",
        )),
    }
}

fn pick_color<R: Rng + ?Sized>(state: &MatchState, rng: &mut R) -> Option<Color> {
    let free: Vec<Color> = PALETTE
        .iter()
        .copied()
        .filter(|c| state.participants.iter().all(|p| p.color != *c))
        .collect();
    free.choose(rng).copied()
}

/// Seat one participant with a free color and a random starting room.
///
/// Human seats add the entry fee to the pot.
pub fn admit<R: Rng + ?Sized>(
    state: &mut MatchState,
    seat: Seat,
    rng: &mut R,
) -> Result<ParticipantId, DomainError> {
    ensure_roster_open(state)?;

    if let Seat::Human { identity } = &seat {
        if state.has_identity(identity) {
            return Err(DomainError::validation(
                ValidationKind::AlreadyJoined,
                format!("{identity} is already seated"),
            ));
        }
    }
    if state.is_full() {
        return Err(DomainError::validation(
            ValidationKind::RosterFull,
            format!("roster already holds {ROSTER_SIZE} participants"),
        ));
    }

    let color = pick_color(state, rng).ok_or_else(|| {
        DomainError::validation(ValidationKind::RosterFull, "no free colors left")
    })?;
    let room = *Room::ALL.choose(rng).unwrap_or(&Room::Cafeteria);
    let id = ParticipantId::from_rng(rng);

    let (identity, is_ai) = match seat {
        Seat::Human { identity } => (Some(identity), false),
        Seat::Ai => (None, true),
    };
    if !is_ai {
        state.info.pot = state.info.pot.saturating_add(state.info.entry_fee);
    }

    state.participants.push(Participant {
        id,
        match_id: state.info.id,
        identity,
        color,
        role: Role::Crewmate,
        is_ai,
        alive: true,
        room,
        has_voted: false,
        vote_target: None,
    });
    Ok(id)
}

/// Seat AI participants until the roster is full. Returns the new seats.
pub fn fill_with_ai<R: Rng + ?Sized>(
    state: &mut MatchState,
    rng: &mut R,
) -> Result<Vec<ParticipantId>, DomainError> {
    ensure_roster_open(state)?;
    let mut added = Vec::with_capacity(ROSTER_SIZE.saturating_sub(state.participants.len()));
    while !state.is_full() {
        added.push(admit(state, Seat::Ai, rng)?);
    }
    Ok(added)
}

/// Pick exactly one impostor uniformly at random from a full roster.
pub fn assign_impostor<R: Rng + ?Sized>(
    state: &mut MatchState,
    rng: &mut R,
) -> Result<ParticipantId, DomainError> {
    ensure_roster_open(state)?;
    if state.participants.len() != ROSTER_SIZE {
        return Err(DomainError::validation(
            ValidationKind::RosterIncomplete,
            format!(
                "need {ROSTER_SIZE} participants, have {}",
                state.participants.len()
            ),
        ));
    }

    let pick = rng.random_range(0..state.participants.len());
    for (i, p) in state.participants.iter_mut().enumerate() {
        p.role = if i == pick { Role::Impostor } else { Role::Crewmate };
    }
    let impostor = state.participants[pick].id;
    state.info.impostor_id = Some(impostor);
    Ok(impostor)
}
