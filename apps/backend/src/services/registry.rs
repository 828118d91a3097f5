//! Owner of every live match.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::time::Instant;

use crate::domain::state::{Match, MatchId, MatchMode, MatchState, MatchStatus};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::services::tasks::TaskTable;

/// Mutable runtime of one match. Only ever touched under its cell's lock.
#[derive(Debug)]
pub struct MatchRuntime {
    pub state: MatchState,
    pub tasks: TaskTable,
    /// Bumped on every phase entry and at finish; scheduled callbacks carry
    /// the value they were armed under and no-op on mismatch.
    pub phase_seq: u64,
    /// Timer deadline for the current phase.
    pub deadline_at: Option<Instant>,
    pub lobby_deadline: Option<OffsetDateTime>,
    /// Per-match RNG for roster, roles and AI timing.
    pub rng: ChaCha8Rng,
}

#[derive(Debug)]
pub struct MatchCell {
    pub id: MatchId,
    inner: Mutex<MatchRuntime>,
}

impl MatchCell {
    pub fn lock(&self) -> MutexGuard<'_, MatchRuntime> {
        self.inner.lock()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbySummary {
    pub id: MatchId,
    pub participants: usize,
    pub entry_fee: u64,
    pub pot: u64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub countdown_deadline: Option<OffsetDateTime>,
}

pub struct MatchRegistry {
    matches: DashMap<MatchId, Arc<MatchCell>>,
    rng: Mutex<ChaCha8Rng>,
}

impl MatchRegistry {
    /// `Some(seed)` makes match ids, rosters and AI timing reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            matches: DashMap::new(),
            rng: Mutex::new(rng),
        }
    }

    pub fn create(&self, mode: MatchMode, entry_fee: u64) -> Arc<MatchCell> {
        let (id, match_seed) = {
            let mut rng = self.rng.lock();
            (MatchId::from_rng(&mut *rng), rng.random::<u64>())
        };
        let cell = Arc::new(MatchCell {
            id,
            inner: Mutex::new(MatchRuntime {
                state: MatchState::new(Match::new(id, mode, entry_fee)),
                tasks: TaskTable::new(),
                phase_seq: 0,
                deadline_at: None,
                lobby_deadline: None,
                rng: ChaCha8Rng::seed_from_u64(match_seed),
            }),
        });
        self.matches.insert(id, cell.clone());
        cell
    }

    pub fn get(&self, id: MatchId) -> Result<Arc<MatchCell>, DomainError> {
        self.matches
            .get(&id)
            .map(|cell| cell.clone())
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Match, format!("match {id} not found")))
    }

    /// Drop a match, cancelling anything still scheduled for it.
    pub fn remove(&self, id: MatchId) -> Option<Arc<MatchCell>> {
        let (_, cell) = self.matches.remove(&id)?;
        cell.lock().tasks.shutdown();
        Some(cell)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Waiting lobby-mode matches that still accept joins.
    pub fn open_lobbies(&self) -> Vec<LobbySummary> {
        let cells: Vec<Arc<MatchCell>> = self.matches.iter().map(|e| e.value().clone()).collect();
        let mut lobbies: Vec<LobbySummary> = cells
            .iter()
            .filter_map(|cell| {
                let rt = cell.lock();
                let info = &rt.state.info;
                (info.mode == MatchMode::Lobby
                    && info.status == MatchStatus::Waiting
                    && !rt.state.is_full())
                .then(|| LobbySummary {
                    id: cell.id,
                    participants: rt.state.participants.len(),
                    entry_fee: info.entry_fee,
                    pot: info.pot,
                    countdown_deadline: rt.lobby_deadline,
                })
            })
            .collect();
        lobbies.sort_by(|a, b| b.participants.cmp(&a.participants).then(a.id.cmp(&b.id)));
        lobbies
    }
}
