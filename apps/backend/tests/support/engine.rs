//! Engine fixture: an `AppState` wired to a recording broadcaster.

use std::sync::Arc;
use std::time::Duration;

use beanpot::ai::DecisionProvider;
use beanpot::domain::{MatchId, MatchMode, MatchState, ParticipantId, Role, Room};
use beanpot::repos::PersistenceGateway;
use beanpot::{build_state, AppState, EngineConfig, GameFlowService};
use beanpot_test_support::unique_helpers::unique_str;

use super::recorder::RecordingBroadcaster;

pub struct Engine {
    pub state: AppState,
    pub events: Arc<RecordingBroadcaster>,
}

pub async fn engine(provider: Arc<dyn DecisionProvider>) -> Engine {
    engine_with(EngineConfig::for_tests(), provider, None).await
}

pub async fn engine_with(
    config: EngineConfig,
    provider: Arc<dyn DecisionProvider>,
    persistence: Option<Arc<dyn PersistenceGateway>>,
) -> Engine {
    let events = Arc::new(RecordingBroadcaster::default());
    let mut builder = build_state()
        .with_config(config)
        .with_provider(provider)
        .with_observer(events.clone());
    if let Some(store) = persistence {
        builder = builder.with_persistence(store);
    }
    let state = builder.build().await.expect("build engine state");
    Engine { state, events }
}

/// Let spawned work run without moving the clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Move the paused clock forward, firing every timer due on the way.
pub async fn advance(d: Duration) {
    tokio::time::sleep(d).await;
    settle().await;
}

impl Engine {
    pub fn flow(&self) -> &GameFlowService {
        &self.state.flow
    }

    /// Lobby match seated entirely by humans; the fifth join starts it.
    pub fn human_match(&self) -> (MatchId, Vec<ParticipantId>) {
        let id = self.flow().create_match(MatchMode::Lobby, 10);
        let seats = (0..5)
            .map(|_| {
                self.flow()
                    .join(id, &unique_str("wallet"))
                    .expect("join lobby")
            })
            .collect();
        (id, seats)
    }

    pub fn inspect<T>(&self, id: MatchId, f: impl FnOnce(&MatchState) -> T) -> T {
        let cell = self.flow().registry().get(id).expect("match exists");
        let rt = cell.lock();
        f(&rt.state)
    }

    /// Mutate live state directly to set up positions.
    pub fn arrange(&self, id: MatchId, f: impl FnOnce(&mut MatchState)) {
        let cell = self.flow().registry().get(id).expect("match exists");
        let mut rt = cell.lock();
        f(&mut rt.state)
    }

    pub fn impostor(&self, id: MatchId) -> ParticipantId {
        self.inspect(id, |s| s.info.impostor_id.expect("impostor assigned"))
    }

    pub fn crewmates(&self, id: MatchId) -> Vec<ParticipantId> {
        self.inspect(id, |s| {
            s.participants
                .iter()
                .filter(|p| p.role == Role::Crewmate)
                .map(|p| p.id)
                .collect()
        })
    }

    pub fn place(&self, id: MatchId, who: ParticipantId, room: Room) {
        self.arrange(id, |s| {
            if let Some(p) = s.participant_mut(who) {
                p.room = room;
            }
        });
    }

    /// Impostor kills `crew[0]` alone in Electrical, then `crew[1]` walks in
    /// from the Cafeteria and reports. Returns (victim, reporter).
    pub fn kill_and_report(&self, id: MatchId) -> (ParticipantId, ParticipantId) {
        let impostor = self.impostor(id);
        let crew: Vec<ParticipantId> = self
            .crewmates(id)
            .into_iter()
            .filter(|c| self.inspect(id, |s| s.participant(*c).is_some_and(|p| p.alive)))
            .collect();
        for c in &crew {
            self.place(id, *c, Room::Cafeteria);
        }
        self.place(id, impostor, Room::Electrical);
        self.place(id, crew[0], Room::Electrical);

        self.flow().kill(id, impostor).expect("kill");
        self.flow()
            .move_participant(id, crew[1], Room::Electrical)
            .expect("report move");
        (crew[0], crew[1])
    }

    pub fn living(&self, id: MatchId) -> Vec<ParticipantId> {
        self.inspect(id, |s| s.living().map(|p| p.id).collect())
    }
}
