use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::ai::{registry, DecisionProvider};
use crate::config::EngineConfig;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::realtime::{BroadcastGateway, Fanout, MatchSessionRegistry};
use crate::repos::{InMemoryStore, PersistenceGateway, PersistenceWriter};
use crate::services::registry::MatchRegistry;
use crate::services::tasks::Spawner;
use crate::services::GameFlowService;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: Option<EngineConfig>,
    provider: Option<Arc<dyn DecisionProvider>>,
    persistence: Option<Arc<dyn PersistenceGateway>>,
    observers: Vec<Arc<dyn BroadcastGateway>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            provider: None,
            persistence: None,
            observers: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the provider named by the config.
    pub fn with_provider(mut self, provider: Arc<dyn DecisionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_persistence(mut self, persistence: Arc<dyn PersistenceGateway>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Extra sink that sees every published event after the hub.
    pub fn with_observer(mut self, observer: Arc<dyn BroadcastGateway>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Must run inside a tokio runtime; the engine schedules on it.
    pub async fn build(self) -> Result<AppState, AppError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let config = Arc::new(config);

        let spawner = Spawner::current().ok_or_else(|| {
            AppError::internal(ErrorCode::InternalError, "engine requires a tokio runtime")
        })?;

        let provider = match self.provider {
            Some(p) => p,
            None => {
                let factory = registry::by_name(&config.ai_provider).ok_or_else(|| {
                    AppError::config(format!("unknown AI provider '{}'", config.ai_provider))
                })?;
                (factory.make)(config.rng_seed)
            }
        };

        let shutdown = CancellationToken::new();
        let persistence = self
            .persistence
            .unwrap_or_else(|| Arc::new(InMemoryStore::default()) as Arc<dyn PersistenceGateway>);
        let (writer, _handle) = PersistenceWriter::spawn(persistence.clone(), shutdown.child_token());

        let hub = Arc::new(MatchSessionRegistry::new(config.broadcast_capacity));
        let mut fanout = Fanout::new(vec![hub.clone() as Arc<dyn BroadcastGateway>]);
        for observer in self.observers {
            fanout.push(observer);
        }

        let flow = GameFlowService::new(
            config.clone(),
            Arc::new(MatchRegistry::new(config.rng_seed)),
            Arc::new(fanout),
            Some(writer),
            provider,
            spawner,
        );

        info!(provider = %config.ai_provider, seeded = config.rng_seed.is_some(), "Engine state built");
        Ok(AppState::new(config, flow, hub, persistence, shutdown))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
