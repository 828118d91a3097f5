//! Match flow orchestration: bridges pure domain rules with timers, AI
//! actors, broadcast and persistence.
//!
//! Every entry point locks exactly one match, applies its change fully,
//! publishes the resulting events and queues persistence before releasing
//! the lock. Scheduled work (phase deadlines, AI actors, the lobby
//! countdown) re-enters through the same locked paths and checks the
//! match's phase sequence before touching anything.

mod ai_coordinator;
mod lobby;
mod phases;
mod player_actions;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::ai::{DecisionProvider, Heuristic};
use crate::config::EngineConfig;
use crate::domain::snapshot::{public_snapshot, MatchSnapshot};
use crate::domain::state::{MatchId, MatchStatus, ParticipantId, Phase};
use crate::error::AppError;
use crate::realtime::{BroadcastGateway, MatchEvent, Topic};
use crate::repos::{PersistOp, PersistenceWriter};
use crate::services::registry::{MatchCell, MatchRegistry, MatchRuntime};
use crate::services::tasks::Spawner;

#[derive(Clone)]
pub struct GameFlowService {
    config: Arc<EngineConfig>,
    registry: Arc<MatchRegistry>,
    broadcaster: Arc<dyn BroadcastGateway>,
    persistence: Option<PersistenceWriter>,
    provider: Arc<dyn DecisionProvider>,
    fallback: Arc<Heuristic>,
    spawner: Spawner,
}

impl GameFlowService {
    pub fn new(
        config: Arc<EngineConfig>,
        registry: Arc<MatchRegistry>,
        broadcaster: Arc<dyn BroadcastGateway>,
        persistence: Option<PersistenceWriter>,
        provider: Arc<dyn DecisionProvider>,
        spawner: Spawner,
    ) -> Self {
        let fallback = Arc::new(Heuristic::new(config.rng_seed));
        Self {
            config,
            registry,
            broadcaster,
            persistence,
            provider,
            fallback,
            spawner,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<MatchRegistry> {
        &self.registry
    }

    fn cell(&self, id: MatchId) -> Result<Arc<MatchCell>, AppError> {
        Ok(self.registry.get(id)?)
    }

    /// Current public snapshot of a match.
    pub fn snapshot(&self, id: MatchId) -> Result<MatchSnapshot, AppError> {
        self.snapshot_with(id, || ()).map(|(snap, ())| snap)
    }

    /// Snapshot the match and run `f` under the same lock, so nothing can be
    /// published between the two.
    pub fn snapshot_with<T>(
        &self,
        id: MatchId,
        f: impl FnOnce() -> T,
    ) -> Result<(MatchSnapshot, T), AppError> {
        let cell = self.cell(id)?;
        let rt = cell.lock();
        let out = f();
        Ok((self.snapshot_of(&rt), out))
    }

    pub fn status(&self, id: MatchId) -> Result<MatchStatus, AppError> {
        Ok(self.cell(id)?.lock().state.info.status)
    }

    pub fn phase(&self, id: MatchId) -> Result<(MatchStatus, Phase), AppError> {
        let cell = self.cell(id)?;
        let rt = cell.lock();
        Ok((rt.state.info.status, rt.state.info.phase))
    }

    /// Forget a match and cancel whatever it still had scheduled.
    pub fn evict(&self, id: MatchId) {
        if self.registry.remove(id).is_some() {
            self.broadcaster.retire(Topic::of(id));
        }
    }

    fn snapshot_of(&self, rt: &MatchRuntime) -> MatchSnapshot {
        public_snapshot(&rt.state, time_remaining(rt))
    }

    fn publish(&self, rt: &MatchRuntime, event: MatchEvent) {
        self.broadcaster.publish(Topic::of(rt.state.id()), event);
    }

    fn publish_snapshot(&self, rt: &MatchRuntime) {
        self.publish(rt, MatchEvent::StateSnapshot(self.snapshot_of(rt)));
    }

    fn persist(&self, op: PersistOp) {
        if let Some(writer) = &self.persistence {
            writer.enqueue(op);
        }
    }

    fn persist_match(&self, rt: &MatchRuntime) {
        self.persist(PersistOp::SaveMatch(rt.state.info.clone()));
    }

    fn persist_participants(&self, rt: &MatchRuntime) {
        for p in &rt.state.participants {
            self.persist(PersistOp::SaveParticipant(p.clone()));
        }
    }

    fn persist_participant(&self, rt: &MatchRuntime, id: ParticipantId) {
        if let Some(p) = rt.state.participant(id) {
            self.persist(PersistOp::SaveParticipant(p.clone()));
        }
    }
}

fn time_remaining(rt: &MatchRuntime) -> Duration {
    match (rt.state.info.status, rt.deadline_at) {
        (MatchStatus::Playing, Some(at)) => at.saturating_duration_since(Instant::now()),
        _ => Duration::ZERO,
    }
}
