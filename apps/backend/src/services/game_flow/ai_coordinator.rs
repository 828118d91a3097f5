//! AI actor scheduling.
//!
//! Each living AI participant gets its own actors for the current phase, all
//! bound to the phase token so a transition cancels them. Actors read a
//! visibility-filtered view, ask the decision provider (bounded by the
//! decision timeout, heuristic on failure), then apply the result through
//! the same handlers human commands use, after re-checking the phase.

use std::future::Future;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::GameFlowService;
use crate::ai::{clean_chat, AiError, MovementIntent};
use crate::domain::snapshot::PlayerView;
use crate::domain::state::{MatchId, MatchStatus, ParticipantId, Phase};
use crate::services::registry::MatchRuntime;

/// Identifies one actor's phase-bound context.
#[derive(Debug, Clone, Copy)]
struct Actor {
    match_id: MatchId,
    participant: ParticipantId,
    phase: Phase,
    seq: u64,
}

fn draw(rng: &mut ChaCha8Rng, lo: Duration, hi: Duration) -> Duration {
    if hi <= lo {
        return lo;
    }
    rng.random_range(lo..hi)
}

impl GameFlowService {
    pub(super) fn schedule_ai(
        &self,
        rt: &mut MatchRuntime,
        phase: Phase,
        token: CancellationToken,
        seq: u64,
    ) {
        let match_id = rt.state.id();
        let actors: Vec<ParticipantId> = rt
            .state
            .living()
            .filter(|p| p.is_ai)
            .map(|p| p.id)
            .collect();

        for participant in actors {
            let actor = Actor {
                match_id,
                participant,
                phase,
                seq,
            };
            match phase {
                Phase::Roaming => {
                    let rng = ChaCha8Rng::seed_from_u64(rt.rng.random());
                    let flow = self.clone();
                    self.spawner.run(token.clone(), async move {
                        flow.roam(actor, rng).await;
                    });
                }
                Phase::Discussion => {
                    let count = rt
                        .rng
                        .random_range(self.config.ai_chat_count_min..=self.config.ai_chat_count_max);
                    let slot = self.config.discussion / (count + 1);
                    for i in 0..count {
                        let jitter = draw(&mut rt.rng, Duration::ZERO, self.config.ai_chat_jitter);
                        let delay = slot * (i + 1) + jitter;
                        let flow = self.clone();
                        self.spawner.after(token.clone(), delay, async move {
                            flow.speak(actor).await;
                        });
                    }
                }
                Phase::Voting => {
                    let (lo, hi) = self.config.ai_vote_window();
                    let delay = draw(&mut rt.rng, lo, hi);
                    let flow = self.clone();
                    self.spawner.after(token.clone(), delay, async move {
                        flow.cast_ai_vote(actor).await;
                    });
                }
                Phase::Lobby => {}
            }
        }
    }

    /// View for an actor, or `None` once its phase is over or it is dead.
    fn actor_view(&self, actor: Actor) -> Option<PlayerView> {
        let cell = self.cell(actor.match_id).ok()?;
        let rt = cell.lock();
        if !is_live(&rt, actor) {
            return None;
        }
        PlayerView::of(&rt.state, actor.participant).filter(|v| v.me.alive)
    }

    /// Apply `f` only if the actor's phase is still current.
    fn with_live_phase<T>(
        &self,
        actor: Actor,
        f: impl FnOnce(&mut MatchRuntime) -> T,
    ) -> Option<T> {
        let cell = self.cell(actor.match_id).ok()?;
        let mut rt = cell.lock();
        if !is_live(&rt, actor) {
            debug!(
                match_id = %actor.match_id,
                participant = %actor.participant,
                "Stale AI action dropped"
            );
            return None;
        }
        Some(f(&mut rt))
    }

    async fn roam(&self, actor: Actor, mut rng: ChaCha8Rng) {
        loop {
            let pause = draw(
                &mut rng,
                self.config.ai_move_interval_min,
                self.config.ai_move_interval_max,
            );
            tokio::time::sleep(pause).await;

            let Some(view) = self.actor_view(actor) else {
                return;
            };
            let intent = self.decide_movement(&view).await;
            let applied = self.with_live_phase(actor, |rt| match intent {
                MovementIntent::Move(room) => self
                    .move_locked(rt, actor.participant, room)
                    .map(|_| ()),
                MovementIntent::Kill => self.kill_locked(rt, actor.participant).map(|_| ()),
                MovementIntent::Stay => Ok(()),
            });
            match applied {
                None => return,
                Some(Err(err)) => {
                    debug!(participant = %actor.participant, ?intent, error = %err, "AI move refused")
                }
                Some(Ok(())) => {}
            }
        }
    }

    async fn speak(&self, actor: Actor) {
        let Some(view) = self.actor_view(actor) else {
            return;
        };
        let Some(text) = self.decide_chat(&view).await else {
            return;
        };
        if let Some(Err(err)) = self.with_live_phase(actor, |rt| {
            self.chat_locked(rt, actor.participant, &text)
        }) {
            debug!(participant = %actor.participant, error = %err, "AI chat refused");
        }
    }

    async fn cast_ai_vote(&self, actor: Actor) {
        let Some(view) = self.actor_view(actor) else {
            return;
        };
        let target = self.decide_vote(&view).await;
        if let Some(Err(err)) = self.with_live_phase(actor, |rt| {
            self.vote_locked(rt, actor.participant, target)
        }) {
            debug!(participant = %actor.participant, error = %err, "AI vote refused");
        }
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T, AiError>>) -> Result<T, AiError> {
        tokio::time::timeout(self.config.decision_timeout, fut)
            .await
            .unwrap_or(Err(AiError::Timeout))
    }

    pub(super) async fn decide_movement(&self, view: &PlayerView) -> MovementIntent {
        let decided = self
            .bounded(self.provider.choose_movement(view))
            .await
            .and_then(|intent| match intent {
                MovementIntent::Move(room) if !view.me.room.is_adjacent(room) => Err(
                    AiError::InvalidDecision(format!("{room} is not adjacent to {}", view.me.room)),
                ),
                other => Ok(other),
            });
        match decided {
            Ok(intent) => intent,
            Err(err) => {
                warn!(participant = %view.me.id, error = %err, "Movement decision failed; using fallback");
                self.fallback.movement(view).unwrap_or(MovementIntent::Stay)
            }
        }
    }

    pub(super) async fn decide_chat(&self, view: &PlayerView) -> Option<String> {
        match self.bounded(self.provider.compose_chat(view)).await {
            Ok(text) => text.as_deref().and_then(clean_chat),
            Err(err) => {
                warn!(participant = %view.me.id, error = %err, "Chat decision failed; using fallback");
                self.fallback.chat(view).ok().flatten()
            }
        }
    }

    /// A target that is not a living participant becomes a skip.
    pub(super) async fn decide_vote(&self, view: &PlayerView) -> Option<ParticipantId> {
        let target = match self.bounded(self.provider.choose_vote(view)).await {
            Ok(target) => target,
            Err(err) => {
                warn!(participant = %view.me.id, error = %err, "Vote decision failed; using fallback");
                self.fallback.vote(view).ok().flatten()
            }
        };
        let target = target?;
        let living = target == view.me.id || view.living_others().any(|p| p.id == target);
        if !living {
            warn!(participant = %view.me.id, %target, "Vote target not living; skipping");
            return None;
        }
        Some(target)
    }
}

fn is_live(rt: &MatchRuntime, actor: Actor) -> bool {
    rt.phase_seq == actor.seq
        && rt.state.info.status == MatchStatus::Playing
        && rt.state.info.phase == actor.phase
}
