//! Phase scheduler: phase entry, deadline handling, vote resolution and the
//! terminal transition.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::phases::{self as rules, DeadlineStep};
use crate::domain::state::{MatchId, MatchMode, MatchStatus, Phase, Winner};
use crate::domain::{voting, win};
use crate::realtime::MatchEvent;
use crate::services::registry::MatchRuntime;

impl GameFlowService {
    pub(super) fn phase_duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Roaming => self.config.roaming,
            Phase::Discussion => self.config.discussion,
            Phase::Voting => self.config.voting,
            Phase::Lobby => self.config.lobby_countdown,
        }
    }

    /// Enter `phase`: cancel everything scheduled for the outgoing phase, apply
    /// entry effects, arm the single deadline timer and the AI actors.
    pub(super) fn enter_phase(&self, rt: &mut MatchRuntime, phase: Phase) {
        let match_id = rt.state.id();
        rt.phase_seq += 1;
        let seq = rt.phase_seq;
        let token = rt.tasks.rotate_phase();

        let now = Instant::now();
        let mut at = now + self.phase_duration(phase);
        if let Some(prev) = rt.deadline_at {
            at = at.max(prev);
        }
        rt.deadline_at = Some(at);
        let wall = OffsetDateTime::now_utc() + (at - now);
        rules::enter(&mut rt.state, phase, wall);

        info!(
            %match_id,
            phase = %phase,
            round = rt.state.info.round_number,
            "Entered phase"
        );

        self.publish(
            rt,
            MatchEvent::PhaseChange {
                phase,
                round_number: rt.state.info.round_number,
                deadline: rt.state.info.phase_deadline.unwrap_or(wall),
            },
        );
        self.publish_snapshot(rt);
        self.persist_match(rt);
        if phase == Phase::Voting {
            self.persist_participants(rt);
        }

        let flow = self.clone();
        self.spawner.at(token.clone(), at, async move {
            flow.on_deadline(match_id, seq);
        });

        self.schedule_ai(rt, phase, token, seq);
    }

    /// Deadline timer callback. A no-op unless the phase it was armed for is
    /// still the current one.
    pub(super) fn on_deadline(&self, match_id: MatchId, seq: u64) {
        let Ok(cell) = self.cell(match_id) else {
            return;
        };
        let mut rt = cell.lock();
        if rt.phase_seq != seq || rt.state.info.status != MatchStatus::Playing {
            debug!(%match_id, seq, current = rt.phase_seq, "Stale deadline ignored");
            return;
        }

        match rules::on_deadline(rt.state.info.phase) {
            DeadlineStep::RepeatRoaming => match win::check(&rt.state) {
                Some(winner) => self.finish(&mut rt, winner),
                None => self.enter_phase(&mut rt, Phase::Roaming),
            },
            DeadlineStep::EnterVoting => self.enter_phase(&mut rt, Phase::Voting),
            DeadlineStep::ResolveVotes => self.resolve_voting(&mut rt),
            DeadlineStep::Ignore => {}
        }
    }

    /// Tally, eject, check for a winner, then either finish or start the next
    /// round. Runs exactly once per voting phase: it always leaves voting.
    pub(super) fn resolve_voting(&self, rt: &mut MatchRuntime) {
        let match_id = rt.state.id();
        let result = voting::resolve(voting::ballots(&rt.state));

        if let Some(ejected) = result.ejected {
            if rules::eject(&mut rt.state, ejected) {
                info!(%match_id, %ejected, "Participant ejected");
                self.persist_participant(rt, ejected);
            }
        } else {
            info!(%match_id, "No ejection this round");
        }

        self.publish(
            rt,
            MatchEvent::VoteResults {
                tally: result.tally,
                ejected_id: result.ejected,
            },
        );

        match win::check(&rt.state) {
            Some(winner) => self.finish(rt, winner),
            None => {
                rules::advance_round(&mut rt.state);
                self.enter_phase(rt, Phase::Roaming);
            }
        }
    }

    /// Terminal transition. Cancels every timer and actor for the match.
    pub(super) fn finish(&self, rt: &mut MatchRuntime, winner: Winner) {
        if !rules::finish(&mut rt.state, winner) {
            return;
        }
        let match_id = rt.state.id();
        rt.tasks.shutdown();
        rt.phase_seq += 1;
        rt.deadline_at = None;

        info!(
            %match_id,
            ?winner,
            rounds = rt.state.info.round_number,
            "Match finished"
        );

        self.publish(
            rt,
            MatchEvent::MatchEnd {
                winner,
                impostor_id: rt.state.info.impostor_id,
                first_death_id: rt.state.first_death,
            },
        );
        self.publish_snapshot(rt);
        self.persist_match(rt);
        self.persist_participants(rt);

        // Arena matches are evicted by the arena loop.
        if rt.state.info.mode == MatchMode::Lobby {
            self.schedule_eviction(match_id);
        }
    }

    /// Drop a finished match once its retention window has passed. The timer
    /// lives outside the match's task tree, which is already cancelled.
    fn schedule_eviction(&self, match_id: MatchId) {
        let flow = self.clone();
        self.spawner.after(
            CancellationToken::new(),
            self.config.finished_retention,
            async move {
                debug!(%match_id, "Evicting finished match");
                flow.evict(match_id);
            },
        );
    }
}
