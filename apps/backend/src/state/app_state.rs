use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::domain::state::MatchId;
use crate::error::AppError;
use crate::realtime::{BroadcastGateway, Envelope, MatchEvent, MatchSessionRegistry, Topic};
use crate::repos::PersistenceGateway;
use crate::services::{ArenaLoop, GameFlowService};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EngineConfig>,
    /// Match engine entry points
    pub flow: GameFlowService,
    /// In-process event fan-out subscribers attach to
    pub hub: Arc<MatchSessionRegistry>,
    /// Durable mirror behind the ordered writer
    pub persistence: Arc<dyn PersistenceGateway>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        config: Arc<EngineConfig>,
        flow: GameFlowService,
        hub: Arc<MatchSessionRegistry>,
        persistence: Arc<dyn PersistenceGateway>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            flow,
            hub,
            persistence,
            shutdown,
        }
    }

    /// Current snapshot of the match followed by its live events.
    pub fn subscribe(
        &self,
        match_id: MatchId,
    ) -> Result<impl Stream<Item = Envelope> + Send + 'static, AppError> {
        let topic = Topic::of(match_id);
        let (snapshot, live) = self
            .flow
            .snapshot_with(match_id, || self.hub.subscribe(topic))?;
        let first = Envelope::new(topic, MatchEvent::StateSnapshot(snapshot));
        Ok(tokio_stream::once(first).chain(live))
    }

    pub fn subscribe_arena(&self) -> impl Stream<Item = Envelope> + Send + 'static {
        self.hub.subscribe(Topic::Arena)
    }

    /// Start the arena loop; it stops on [`AppState::shutdown`].
    pub fn spawn_arena(&self) -> JoinHandle<()> {
        let announcer: Arc<dyn BroadcastGateway> = self.hub.clone();
        let arena = ArenaLoop::new(self.flow.clone(), announcer);
        tokio::spawn(arena.run(self.shutdown.child_token()))
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stop background loops and the persistence writer.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
