//! Match creation, roster assembly and the lobby countdown.

use time::OffsetDateTime;
use tokio::time::Instant;
use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::phases as rules;
use crate::domain::roster::{self, Seat};
use crate::domain::snapshot::public_snapshot;
use crate::domain::state::{MatchId, MatchMode, MatchStatus, ParticipantId, Phase};
use crate::error::AppError;
use crate::realtime::MatchEvent;
use crate::services::registry::{LobbySummary, MatchRuntime};

impl GameFlowService {
    pub fn create_match(&self, mode: MatchMode, entry_fee: u64) -> MatchId {
        let cell = self.registry.create(mode, entry_fee);
        let rt = cell.lock();
        info!(match_id = %cell.id, ?mode, entry_fee, "Match created");
        self.persist_match(&rt);
        cell.id
    }

    pub fn open_lobbies(&self) -> Vec<LobbySummary> {
        self.registry.open_lobbies()
    }

    /// Seat a human. The seat that completes the roster starts the match;
    /// otherwise the lobby countdown is armed if it is not already.
    pub fn join(&self, match_id: MatchId, identity: &str) -> Result<ParticipantId, AppError> {
        let cell = self.cell(match_id)?;
        let mut rt = cell.lock();
        let rt = &mut *rt;
        let id = roster::admit(
            &mut rt.state,
            Seat::Human {
                identity: identity.to_string(),
            },
            &mut rt.rng,
        )?;
        info!(
            %match_id,
            participant = %id,
            seated = rt.state.participants.len(),
            pot = rt.state.info.pot,
            "Human joined"
        );
        self.persist_participant(rt, id);
        self.persist_match(rt);

        if rt.state.is_full() {
            self.start_locked(rt)?;
        } else {
            self.arm_countdown(rt);
            self.publish_lobby(rt);
        }
        Ok(id)
    }

    /// Fill empty seats with AI without starting.
    pub fn fill_with_ai(&self, match_id: MatchId) -> Result<Vec<ParticipantId>, AppError> {
        let cell = self.cell(match_id)?;
        let mut rt = cell.lock();
        let rt = &mut *rt;
        let added = roster::fill_with_ai(&mut rt.state, &mut rt.rng)?;
        for id in &added {
            self.persist_participant(rt, *id);
        }
        debug!(%match_id, added = added.len(), "Filled with AI");
        self.publish_lobby(rt);
        Ok(added)
    }

    /// Fill any empty seats with AI, assign roles and enter roaming.
    pub fn start_match(&self, match_id: MatchId) -> Result<(), AppError> {
        let cell = self.cell(match_id)?;
        let mut rt = cell.lock();
        self.start_locked(&mut rt)
    }

    fn start_locked(&self, rt: &mut MatchRuntime) -> Result<(), AppError> {
        roster::ensure_roster_open(&rt.state)?;
        roster::fill_with_ai(&mut rt.state, &mut rt.rng)?;
        let impostor = roster::assign_impostor(&mut rt.state, &mut rt.rng)?;
        rules::start(&mut rt.state)?;
        rt.tasks.disarm_lobby();
        rt.lobby_deadline = None;

        info!(match_id = %rt.state.id(), "Match started");
        debug!(match_id = %rt.state.id(), %impostor, "Impostor assigned");
        self.persist_participants(rt);
        self.enter_phase(rt, Phase::Roaming);
        Ok(())
    }

    /// Arm the countdown once per match; later calls are no-ops.
    fn arm_countdown(&self, rt: &mut MatchRuntime) {
        let Some(token) = rt.tasks.arm_lobby() else {
            return;
        };
        let match_id = rt.state.id();
        let delay = self.config.lobby_countdown;
        rt.lobby_deadline = Some(OffsetDateTime::now_utc() + delay);
        info!(%match_id, secs = delay.as_secs(), "Lobby countdown armed");

        let flow = self.clone();
        self.spawner.at(token, Instant::now() + delay, async move {
            flow.on_countdown(match_id);
        });
    }

    fn on_countdown(&self, match_id: MatchId) {
        let Ok(cell) = self.cell(match_id) else {
            return;
        };
        let mut rt = cell.lock();
        if rt.state.info.status != MatchStatus::Waiting {
            debug!(%match_id, "Countdown expired after start; ignored");
            return;
        }
        info!(%match_id, "Lobby countdown expired; filling with AI");
        if let Err(err) = self.start_locked(&mut rt) {
            tracing::warn!(%match_id, error = %err, "Countdown start failed");
        }
    }

    fn publish_lobby(&self, rt: &MatchRuntime) {
        let snapshot = public_snapshot(&rt.state, std::time::Duration::ZERO);
        self.publish(
            rt,
            MatchEvent::LobbyUpdate {
                participants: snapshot.participants,
                countdown_deadline: rt.lobby_deadline,
            },
        );
    }
}
