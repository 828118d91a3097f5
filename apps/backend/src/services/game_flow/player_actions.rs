//! Command handlers shared by human callers and AI actors.

use time::OffsetDateTime;
use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::actions::{self, KillOutcome, MoveOutcome, VoteOutcome};
use crate::domain::rooms::Room;
use crate::domain::state::{ChatEntry, MatchId, ParticipantId, Phase};
use crate::error::AppError;
use crate::realtime::MatchEvent;
use crate::repos::PersistOp;
use crate::services::registry::MatchRuntime;

impl GameFlowService {
    /// Move a participant to an adjacent room. Entering the room with the
    /// unreported body reports it and starts discussion.
    pub fn move_participant(
        &self,
        match_id: MatchId,
        participant: ParticipantId,
        room: Room,
    ) -> Result<MoveOutcome, AppError> {
        let cell = self.cell(match_id)?;
        let mut rt = cell.lock();
        self.move_locked(&mut rt, participant, room)
    }

    pub fn kill(&self, match_id: MatchId, killer: ParticipantId) -> Result<KillOutcome, AppError> {
        let cell = self.cell(match_id)?;
        let mut rt = cell.lock();
        self.kill_locked(&mut rt, killer)
    }

    pub fn chat(
        &self,
        match_id: MatchId,
        participant: ParticipantId,
        text: &str,
    ) -> Result<ChatEntry, AppError> {
        let cell = self.cell(match_id)?;
        let mut rt = cell.lock();
        self.chat_locked(&mut rt, participant, text)
    }

    /// Cast a ballot; `None` skips. The ballot that completes the living
    /// roster resolves the vote immediately.
    pub fn vote(
        &self,
        match_id: MatchId,
        voter: ParticipantId,
        target: Option<ParticipantId>,
    ) -> Result<VoteOutcome, AppError> {
        let cell = self.cell(match_id)?;
        let mut rt = cell.lock();
        self.vote_locked(&mut rt, voter, target)
    }

    pub(super) fn move_locked(
        &self,
        rt: &mut MatchRuntime,
        participant: ParticipantId,
        room: Room,
    ) -> Result<MoveOutcome, AppError> {
        let outcome = actions::apply_move(&mut rt.state, participant, room)?;
        self.persist_participant(rt, participant);

        match outcome {
            MoveOutcome::Moved { from, to, .. } => {
                debug!(match_id = %rt.state.id(), %participant, %from, %to, "Moved");
                self.publish_snapshot(rt);
            }
            MoveOutcome::BodyReported { body, .. } => {
                info!(
                    match_id = %rt.state.id(),
                    reporter = %participant,
                    victim = %body.owner,
                    room = %body.room,
                    "Body reported"
                );
                self.publish(
                    rt,
                    MatchEvent::Kill {
                        victim_id: body.owner,
                        room: body.room,
                        reporter_id: Some(participant),
                    },
                );
                self.enter_phase(rt, Phase::Discussion);
            }
        }
        Ok(outcome)
    }

    pub(super) fn kill_locked(
        &self,
        rt: &mut MatchRuntime,
        killer: ParticipantId,
    ) -> Result<KillOutcome, AppError> {
        let outcome = actions::apply_kill(&mut rt.state, killer)?;
        info!(
            match_id = %rt.state.id(),
            victim = %outcome.victim,
            room = %outcome.room,
            first_death = outcome.first_death,
            "Kill"
        );
        self.persist_participant(rt, outcome.victim);
        self.persist_match(rt);
        self.publish(
            rt,
            MatchEvent::Kill {
                victim_id: outcome.victim,
                room: outcome.room,
                reporter_id: None,
            },
        );

        match outcome.winner {
            Some(winner) => self.finish(rt, winner),
            None => self.publish_snapshot(rt),
        }
        Ok(outcome)
    }

    pub(super) fn chat_locked(
        &self,
        rt: &mut MatchRuntime,
        participant: ParticipantId,
        text: &str,
    ) -> Result<ChatEntry, AppError> {
        let entry = actions::apply_chat(&mut rt.state, participant, text, OffsetDateTime::now_utc())?;
        debug!(match_id = %rt.state.id(), %participant, seq = entry.seq, "Chat");
        self.publish(
            rt,
            MatchEvent::Chat {
                entry: entry.clone(),
            },
        );
        self.persist(PersistOp::AppendChat(entry.clone()));
        Ok(entry)
    }

    pub(super) fn vote_locked(
        &self,
        rt: &mut MatchRuntime,
        voter: ParticipantId,
        target: Option<ParticipantId>,
    ) -> Result<VoteOutcome, AppError> {
        let outcome = actions::apply_vote(&mut rt.state, voter, target)?;
        debug!(match_id = %rt.state.id(), %voter, skip = target.is_none(), "Vote cast");
        self.persist_participant(rt, voter);
        self.publish(
            rt,
            MatchEvent::VoteUpdate {
                participant_id: voter,
                has_voted: true,
            },
        );

        if outcome.all_voted {
            debug!(match_id = %rt.state.id(), "All living voted; resolving early");
            self.resolve_voting(rt);
        }
        Ok(outcome)
    }
}
