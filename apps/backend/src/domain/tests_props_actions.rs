//! Property tests for kill isolation, movement legality and vote resolution.

use proptest::prelude::*;

use crate::domain::actions::{apply_kill, apply_move};
use crate::domain::rooms::Room;
use crate::domain::state::ParticipantId;
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::{impostor, playing_match};
use crate::domain::voting::resolve;

fn any_room() -> impl Strategy<Value = Room> {
    prop::sample::select(Room::ALL.to_vec())
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: a kill succeeds iff exactly one other living participant
    /// shares the impostor's room; a refused kill changes nothing.
    #[test]
    fn prop_kill_needs_exactly_one_bystander(
        seed in any::<u64>(),
        rooms in prop::collection::vec(any_room(), 5),
        dead in prop::collection::vec(any::<bool>(), 5),
    ) {
        let mut state = playing_match(seed);
        let imp = impostor(&state);
        for (i, p) in state.participants.iter_mut().enumerate() {
            p.room = rooms[i];
            p.alive = p.id == imp || !dead[i];
        }
        let imp_room = state.participant(imp).unwrap().room;
        let bystanders = state
            .living()
            .filter(|p| p.id != imp && p.room == imp_room)
            .count();
        let before: Vec<bool> = state.participants.iter().map(|p| p.alive).collect();

        let result = apply_kill(&mut state, imp);
        prop_assert_eq!(result.is_ok(), bystanders == 1);
        if result.is_err() {
            let after: Vec<bool> = state.participants.iter().map(|p| p.alive).collect();
            prop_assert_eq!(before, after);
            prop_assert!(state.info.body.is_none());
        }
    }

    /// Property: a move succeeds iff the destination is adjacent.
    #[test]
    fn prop_move_requires_adjacency(seed in any::<u64>(), from in any_room(), to in any_room()) {
        let mut state = playing_match(seed);
        let id = state.participants[0].id;
        state.participant_mut(id).unwrap().room = from;

        let result = apply_move(&mut state, id, to);
        prop_assert_eq!(result.is_ok(), from.is_adjacent(to));
        let expected = if from.is_adjacent(to) { to } else { from };
        prop_assert_eq!(state.participant(id).unwrap().room, expected);
    }

    /// Property: ejection depends on the ballot multiset, not its order, and
    /// only a sole non-skip maximum is ever ejected.
    #[test]
    fn prop_resolution_is_order_independent(
        picks in prop::collection::vec(0usize..4, 1..8),
        shuffle_seed in any::<u64>(),
    ) {
        let ids: Vec<ParticipantId> = (0..3).map(|_| ParticipantId::new()).collect();
        let ballots: Vec<Option<ParticipantId>> = picks
            .iter()
            .map(|&i| ids.get(i).copied())
            .collect();

        let mut shuffled = ballots.clone();
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(shuffle_seed);
        rand::seq::SliceRandom::shuffle(shuffled.as_mut_slice(), &mut rng);

        let a = resolve(ballots.clone());
        let b = resolve(shuffled);
        prop_assert_eq!(a.ejected, b.ejected);

        if let Some(ejected) = a.ejected {
            let top = a.tally.iter().find(|e| e.target == Some(ejected)).unwrap().count;
            prop_assert!(a.tally.iter().all(|e| e.target == Some(ejected) || e.count < top));
        }
    }
}
