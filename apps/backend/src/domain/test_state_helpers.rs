//! Test-only match state builders for domain unit tests.

use rand::rngs::StdRng;
use rand::SeedableRng;
use time::OffsetDateTime;

use crate::domain::phases;
use crate::domain::rooms::Room;
use crate::domain::roster::{assign_impostor, fill_with_ai};
use crate::domain::state::{
    Match, MatchId, MatchMode, MatchState, ParticipantId, Phase, Role,
};

/// Full AI roster, impostor assigned, playing in roaming at round 1.
pub fn playing_match(seed: u64) -> MatchState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = MatchState::new(Match::new(
        MatchId::from_rng(&mut rng),
        MatchMode::Arena,
        0,
    ));
    fill_with_ai(&mut state, &mut rng).unwrap();
    assign_impostor(&mut state, &mut rng).unwrap();
    phases::start(&mut state).unwrap();
    phases::enter(&mut state, Phase::Roaming, OffsetDateTime::now_utc());
    state
}

pub fn impostor(state: &MatchState) -> ParticipantId {
    state
        .participants
        .iter()
        .find(|p| p.role == Role::Impostor)
        .map(|p| p.id)
        .unwrap()
}

pub fn crewmates(state: &MatchState) -> Vec<ParticipantId> {
    state
        .participants
        .iter()
        .filter(|p| p.role == Role::Crewmate)
        .map(|p| p.id)
        .collect()
}

pub fn place(state: &mut MatchState, id: ParticipantId, room: Room) {
    state.participant_mut(id).unwrap().room = room;
}

/// Put everyone in `room`.
pub fn gather(state: &mut MatchState, room: Room) {
    for p in state.participants.iter_mut() {
        p.room = room;
    }
}

pub fn enter(state: &mut MatchState, phase: Phase) {
    phases::enter(state, phase, OffsetDateTime::now_utc());
}
