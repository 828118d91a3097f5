//! Impostor assignment fairness and full round progression.

use rand::rngs::StdRng;
use rand::SeedableRng;
use time::OffsetDateTime;

use crate::domain::phases::{self, DeadlineStep};
use crate::domain::roster::{admit, assign_impostor, fill_with_ai, Seat};
use crate::domain::state::{Match, MatchId, MatchMode, MatchState, MatchStatus, Phase, Role};
use crate::domain::voting;
use crate::domain::win;

#[test]
fn impostor_is_chosen_uniformly() {
    const TRIALS: usize = 5_000;
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut hits = [0usize; 5];

    for _ in 0..TRIALS {
        let mut state = MatchState::new(Match::new(MatchId::new(), MatchMode::Arena, 0));
        fill_with_ai(&mut state, &mut rng).unwrap();
        let id = assign_impostor(&mut state, &mut rng).unwrap();
        let impostors: Vec<_> = state
            .participants
            .iter()
            .filter(|p| p.role == Role::Impostor)
            .map(|p| p.id)
            .collect();
        assert_eq!(impostors, vec![id]);
        assert_eq!(state.info.impostor_id, Some(id));
        let seat = state.participants.iter().position(|p| p.id == id).unwrap();
        hits[seat] += 1;
    }

    // Expected 1000 per seat; +/-15% is well outside sampling noise.
    for (seat, n) in hits.iter().enumerate() {
        assert!((850..=1150).contains(n), "seat {seat} chosen {n} times");
    }
}

#[test]
fn full_round_trip_increments_round_once() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut state = MatchState::new(Match::new(MatchId::new(), MatchMode::Lobby, 5));
    admit(
        &mut state,
        Seat::Human {
            identity: "player-one".into(),
        },
        &mut rng,
    )
    .unwrap();
    fill_with_ai(&mut state, &mut rng).unwrap();
    assign_impostor(&mut state, &mut rng).unwrap();
    assert_eq!(state.info.phase, Phase::Lobby);

    phases::start(&mut state).unwrap();
    assert_eq!(state.info.status, MatchStatus::Playing);
    assert_eq!(state.info.round_number, 1);

    let t0 = OffsetDateTime::now_utc();
    phases::enter(&mut state, Phase::Roaming, t0);
    phases::enter(&mut state, Phase::Discussion, t0 + time::Duration::seconds(10));
    assert_eq!(phases::on_deadline(state.info.phase), DeadlineStep::EnterVoting);
    phases::enter(&mut state, Phase::Voting, t0 + time::Duration::seconds(55));
    assert_eq!(phases::on_deadline(state.info.phase), DeadlineStep::ResolveVotes);

    // Nobody votes: all skip, nobody ejected, nobody wins.
    let result = voting::resolve(voting::ballots(&state));
    assert_eq!(result.ejected, None);
    assert_eq!(win::check(&state), None);
    phases::advance_round(&mut state);
    phases::enter(&mut state, Phase::Roaming, t0 + time::Duration::seconds(75));

    assert_eq!(state.info.round_number, 2);
    assert_eq!(state.info.phase, Phase::Roaming);
}

#[test]
fn phase_deadline_never_moves_backwards() {
    let mut state = MatchState::new(Match::new(MatchId::new(), MatchMode::Arena, 0));
    let late = OffsetDateTime::now_utc() + time::Duration::minutes(5);
    phases::enter(&mut state, Phase::Roaming, late);
    phases::enter(&mut state, Phase::Discussion, late - time::Duration::seconds(30));
    assert_eq!(state.info.phase_deadline, Some(late));
}

#[test]
fn finish_is_idempotent() {
    let mut state = crate::domain::test_state_helpers::playing_match(3);
    assert!(phases::finish(&mut state, crate::domain::state::Winner::Impostor));
    assert!(!phases::finish(&mut state, crate::domain::state::Winner::Crewmates));
    assert_eq!(state.info.winner, Some(crate::domain::state::Winner::Impostor));
    assert_eq!(win::check(&state), None);
}
