//! Heuristic decision provider.
//!
//! Used on its own for AI-only matches and as the fallback whenever another
//! provider errors or times out. The impostor hunts isolated targets,
//! everybody else wanders.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::prelude::*;

use super::trait_def::{AiError, DecisionProvider, MovementIntent};
use crate::domain::snapshot::PlayerView;
use crate::domain::ParticipantId;

const IMPOSTOR_LINES: [&str; 4] = [
    "where was the body?",
    "idk seems sus",
    "i was doing tasks",
    "who was near reactor?",
];

const CREW_LINES: [&str; 4] = [
    "anyone see anything?",
    "where was everyone?",
    "this is tough",
    "i was in cafeteria",
];

/// Chance that a wanderer moves rather than stays.
const MOVE_PROBABILITY: f64 = 0.7;
/// Chance of voting for someone rather than skipping.
const ACCUSE_PROBABILITY: f64 = 0.8;

pub struct Heuristic {
    rng: Mutex<StdRng>,
}

impl Heuristic {
    pub const NAME: &'static str = "Heuristic";
    pub const VERSION: &'static str = "1.0.0";

    /// `Some(seed)` for reproducible decisions, `None` for OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T, AiError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
        Ok(f(&mut *rng))
    }

    pub fn movement(&self, view: &PlayerView) -> Result<MovementIntent, AiError> {
        if view.is_impostor() {
            if view.living_in(view.me.room) == 1 {
                return Ok(MovementIntent::Kill);
            }
            if let Some(room) = view
                .adjacent_rooms()
                .iter()
                .copied()
                .find(|room| view.living_in(*room) == 1)
            {
                return Ok(MovementIntent::Move(room));
            }
        }

        self.with_rng(|rng| {
            if rng.random_bool(MOVE_PROBABILITY) {
                view.adjacent_rooms()
                    .choose(rng)
                    .copied()
                    .map_or(MovementIntent::Stay, MovementIntent::Move)
            } else {
                MovementIntent::Stay
            }
        })
    }

    pub fn chat(&self, view: &PlayerView) -> Result<Option<String>, AiError> {
        let lines: &[&str] = if view.is_impostor() {
            &IMPOSTOR_LINES
        } else {
            &CREW_LINES
        };
        self.with_rng(|rng| lines.choose(rng).map(|line| (*line).to_string()))
    }

    pub fn vote(&self, view: &PlayerView) -> Result<Option<ParticipantId>, AiError> {
        let candidates: Vec<ParticipantId> = view.living_others().map(|p| p.id).collect();
        self.with_rng(|rng| {
            if candidates.is_empty() || !rng.random_bool(ACCUSE_PROBABILITY) {
                return None;
            }
            candidates.choose(rng).copied()
        })
    }
}

#[async_trait]
impl DecisionProvider for Heuristic {
    async fn choose_movement(&self, view: &PlayerView) -> Result<MovementIntent, AiError> {
        self.movement(view)
    }

    async fn compose_chat(&self, view: &PlayerView) -> Result<Option<String>, AiError> {
        self.chat(view)
    }

    async fn choose_vote(&self, view: &PlayerView) -> Result<Option<ParticipantId>, AiError> {
        self.vote(view)
    }
}
