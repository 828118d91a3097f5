//! Action validation and effects on a live match (pure domain).

use time::OffsetDateTime;

use crate::domain::actions::{
    apply_chat, apply_kill, apply_move, apply_vote, MoveOutcome,
};
use crate::domain::rooms::Room;
use crate::domain::state::{Body, Phase, Winner};
use crate::domain::test_state_helpers::{
    crewmates, enter, gather, impostor, place, playing_match,
};
use crate::errors::domain::ValidationKind;

fn kind(err: crate::errors::domain::DomainError) -> ValidationKind {
    err.validation_kind().cloned().unwrap()
}

#[test]
fn move_to_adjacent_room_succeeds() {
    let mut state = playing_match(11);
    let id = state.participants[0].id;
    place(&mut state, id, Room::Electrical);

    let out = apply_move(&mut state, id, Room::Reactor).unwrap();
    assert_eq!(
        out,
        MoveOutcome::Moved {
            participant: id,
            from: Room::Electrical,
            to: Room::Reactor
        }
    );
    assert_eq!(state.participant(id).unwrap().room, Room::Reactor);
}

#[test]
fn hub_to_hub_move_is_rejected_without_change() {
    let mut state = playing_match(12);
    let id = state.participants[0].id;
    place(&mut state, id, Room::Cafeteria);

    let err = apply_move(&mut state, id, Room::Reactor).unwrap_err();
    assert_eq!(kind(err), ValidationKind::NotAdjacent);
    assert_eq!(state.participant(id).unwrap().room, Room::Cafeteria);
}

#[test]
fn dead_participants_cannot_move() {
    let mut state = playing_match(13);
    let id = state.participants[0].id;
    place(&mut state, id, Room::MedBay);
    state.participant_mut(id).unwrap().alive = false;

    let err = apply_move(&mut state, id, Room::Cafeteria).unwrap_err();
    assert_eq!(kind(err), ValidationKind::ParticipantDead);
}

#[test]
fn move_outside_roaming_is_a_phase_mismatch() {
    let mut state = playing_match(14);
    enter(&mut state, Phase::Discussion);
    let id = state.participants[0].id;
    let to = state.participants[0].room.neighbors()[0];

    let err = apply_move(&mut state, id, to).unwrap_err();
    assert_eq!(kind(err), ValidationKind::PhaseMismatch);
}

#[test]
fn walking_into_the_body_room_reports_it() {
    let mut state = playing_match(15);
    let crew = crewmates(&state);
    let body = Body {
        room: Room::Navigation,
        owner: crew[0],
    };
    state.info.body = Some(body);
    place(&mut state, crew[1], Room::Reactor);

    let out = apply_move(&mut state, crew[1], Room::Navigation).unwrap();
    assert_eq!(
        out,
        MoveOutcome::BodyReported {
            reporter: crew[1],
            from: Room::Reactor,
            body
        }
    );
}

#[test]
fn kill_with_exactly_one_bystander() {
    let mut state = playing_match(16);
    let imp = impostor(&state);
    let crew = crewmates(&state);
    gather(&mut state, Room::Cafeteria);
    place(&mut state, imp, Room::MedBay);
    place(&mut state, crew[2], Room::MedBay);

    let out = apply_kill(&mut state, imp).unwrap();
    assert_eq!(out.victim, crew[2]);
    assert_eq!(out.room, Room::MedBay);
    assert!(out.first_death);
    assert_eq!(out.winner, None);
    assert!(!state.participant(crew[2]).unwrap().alive);
    assert_eq!(
        state.info.body,
        Some(Body {
            room: Room::MedBay,
            owner: crew[2]
        })
    );
    assert_eq!(state.first_death, Some(crew[2]));
}

#[test]
fn kill_blocked_when_alone_or_crowded() {
    let mut state = playing_match(17);
    let imp = impostor(&state);
    let crew = crewmates(&state);

    gather(&mut state, Room::Cafeteria);
    place(&mut state, imp, Room::Electrical);
    let err = apply_kill(&mut state, imp).unwrap_err();
    assert_eq!(kind(err), ValidationKind::KillBlocked);

    place(&mut state, crew[0], Room::Electrical);
    place(&mut state, crew[1], Room::Electrical);
    let err = apply_kill(&mut state, imp).unwrap_err();
    assert_eq!(kind(err), ValidationKind::KillBlocked);

    assert!(state.participants.iter().all(|p| p.alive));
    assert_eq!(state.info.body, None);
    assert_eq!(state.first_death, None);
}

#[test]
fn dead_bystanders_do_not_block_a_kill() {
    let mut state = playing_match(18);
    let imp = impostor(&state);
    let crew = crewmates(&state);
    gather(&mut state, Room::Reactor);
    state.participant_mut(crew[0]).unwrap().alive = false;
    state.participant_mut(crew[1]).unwrap().alive = false;
    place(&mut state, crew[3], Room::Cafeteria);

    let out = apply_kill(&mut state, imp).unwrap();
    assert_eq!(out.victim, crew[2]);
}

#[test]
fn crewmates_cannot_kill() {
    let mut state = playing_match(19);
    let crew = crewmates(&state);
    gather(&mut state, Room::Cafeteria);
    place(&mut state, crew[0], Room::Navigation);
    place(&mut state, crew[1], Room::Navigation);

    let err = apply_kill(&mut state, crew[0]).unwrap_err();
    assert_eq!(kind(err), ValidationKind::NotImpostor);
}

#[test]
fn first_death_is_kept_across_later_kills() {
    let mut state = playing_match(20);
    let imp = impostor(&state);
    let crew = crewmates(&state);
    gather(&mut state, Room::Cafeteria);

    place(&mut state, imp, Room::MedBay);
    place(&mut state, crew[0], Room::MedBay);
    apply_kill(&mut state, imp).unwrap();

    enter(&mut state, Phase::Roaming);
    place(&mut state, crew[0], Room::Cafeteria);
    place(&mut state, crew[1], Room::MedBay);
    let second = apply_kill(&mut state, imp).unwrap();

    assert!(!second.first_death);
    assert_eq!(state.first_death, Some(crew[0]));
}

#[test]
fn kill_reaching_parity_hands_the_impostor_the_win() {
    let mut state = playing_match(21);
    let imp = impostor(&state);
    let crew = crewmates(&state);
    state.participant_mut(crew[0]).unwrap().alive = false;
    state.participant_mut(crew[1]).unwrap().alive = false;
    gather(&mut state, Room::Cafeteria);
    place(&mut state, crew[3], Room::Reactor);

    let out = apply_kill(&mut state, imp).unwrap();
    assert_eq!(out.winner, Some(Winner::Impostor));
}

#[test]
fn chat_enforces_phase_and_length() {
    let mut state = playing_match(22);
    let id = state.participants[0].id;
    let now = OffsetDateTime::now_utc();

    let err = apply_chat(&mut state, id, "hi", now).unwrap_err();
    assert_eq!(kind(err), ValidationKind::PhaseMismatch);

    enter(&mut state, Phase::Discussion);
    let err = apply_chat(&mut state, id, "", now).unwrap_err();
    assert_eq!(kind(err), ValidationKind::ChatLength);
    let long = "x".repeat(201);
    let err = apply_chat(&mut state, id, &long, now).unwrap_err();
    assert_eq!(kind(err), ValidationKind::ChatLength);

    let max = "y".repeat(200);
    let first = apply_chat(&mut state, id, &max, now).unwrap();
    let second = apply_chat(&mut state, id, "who?", now).unwrap();
    assert!(second.seq > first.seq);
    assert_eq!(state.chat_log.len(), 2);
}

#[test]
fn discussion_entry_clears_chat() {
    let mut state = playing_match(23);
    let id = state.participants[0].id;
    enter(&mut state, Phase::Discussion);
    apply_chat(&mut state, id, "red sus", OffsetDateTime::now_utc()).unwrap();

    enter(&mut state, Phase::Voting);
    enter(&mut state, Phase::Roaming);
    enter(&mut state, Phase::Discussion);
    assert!(state.chat_log.is_empty());
}

#[test]
fn vote_twice_is_rejected() {
    let mut state = playing_match(24);
    enter(&mut state, Phase::Voting);
    let voter = state.participants[0].id;
    let target = state.participants[1].id;

    let out = apply_vote(&mut state, voter, Some(target)).unwrap();
    assert!(!out.all_voted);
    let err = apply_vote(&mut state, voter, None).unwrap_err();
    assert_eq!(kind(err), ValidationKind::AlreadyVoted);
    assert_eq!(state.participant(voter).unwrap().vote_target, Some(target));
}

#[test]
fn vote_for_dead_participant_is_rejected() {
    let mut state = playing_match(25);
    enter(&mut state, Phase::Voting);
    let voter = state.participants[0].id;
    let dead = state.participants[1].id;
    state.participant_mut(dead).unwrap().alive = false;

    let err = apply_vote(&mut state, voter, Some(dead)).unwrap_err();
    assert_eq!(kind(err), ValidationKind::InvalidVoteTarget);
    assert!(!state.participant(voter).unwrap().has_voted);
}

#[test]
fn last_living_vote_reports_completion() {
    let mut state = playing_match(26);
    let dead = state.participants[4].id;
    state.participant_mut(dead).unwrap().alive = false;
    enter(&mut state, Phase::Voting);

    let living: Vec<_> = state.living().map(|p| p.id).collect();
    let (last, rest) = living.split_last().unwrap();
    for id in rest {
        assert!(!apply_vote(&mut state, *id, None).unwrap().all_voted);
    }
    assert!(apply_vote(&mut state, *last, None).unwrap().all_voted);
}

#[test]
fn commands_on_finished_match_are_rejected() {
    let mut state = playing_match(27);
    crate::domain::phases::finish(&mut state, Winner::Crewmates);
    let id = state.participants[0].id;
    let to = state.participants[0].room.neighbors()[0];

    let err = apply_move(&mut state, id, to).unwrap_err();
    assert_eq!(kind(err), ValidationKind::MatchFinished);
    let err = apply_vote(&mut state, id, None).unwrap_err();
    assert_eq!(kind(err), ValidationKind::MatchFinished);
}
