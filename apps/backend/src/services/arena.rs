//! Continuous AI-only arena: one spectated match at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::state::{MatchId, MatchMode, MatchStatus};
use crate::realtime::{BroadcastGateway, MatchEvent, Topic};
use crate::services::game_flow::GameFlowService;

pub struct ArenaLoop {
    flow: GameFlowService,
    announcer: Arc<dyn BroadcastGateway>,
}

impl ArenaLoop {
    pub fn new(flow: GameFlowService, announcer: Arc<dyn BroadcastGateway>) -> Self {
        Self { flow, announcer }
    }

    /// Run until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let cfg = self.flow.config().clone();
        let mut current: Option<MatchId> = None;
        info!("Arena loop started");

        loop {
            if let Some(id) = current {
                match self.flow.status(id) {
                    Ok(MatchStatus::Finished) => {
                        if !pause(&shutdown, cfg.arena_cooldown).await {
                            break;
                        }
                        self.flow.evict(id);
                        current = None;
                    }
                    Ok(_) => {
                        if !pause(&shutdown, cfg.arena_poll).await {
                            break;
                        }
                    }
                    Err(_) => current = None,
                }
                continue;
            }

            let id = self.flow.create_match(MatchMode::Arena, 0);
            if let Err(err) = self.flow.fill_with_ai(id) {
                warn!(match_id = %id, error = %err, "Arena fill failed");
                self.flow.evict(id);
                if !pause(&shutdown, cfg.arena_cooldown).await {
                    break;
                }
                continue;
            }
            self.announcer
                .publish(Topic::Arena, MatchEvent::ArenaMatchCreated { match_id: id });
            info!(match_id = %id, "Arena match created");
            current = Some(id);

            if !pause(&shutdown, cfg.arena_start_delay).await {
                break;
            }
            if let Err(err) = self.flow.start_match(id) {
                warn!(match_id = %id, error = %err, "Arena start failed");
                self.flow.evict(id);
                current = None;
                if !pause(&shutdown, cfg.arena_cooldown).await {
                    break;
                }
            }
        }

        if let Some(id) = current {
            self.flow.evict(id);
        }
        info!("Arena loop stopped");
    }
}

/// Sleep unless cancelled first. Returns false on cancellation.
async fn pause(shutdown: &CancellationToken, d: Duration) -> bool {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => false,
        _ = tokio::time::sleep(d) => true,
    }
}
