//! Random decision provider: uniform choice among legal intents.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::prelude::*;

use super::trait_def::{AiError, DecisionProvider, MovementIntent};
use crate::domain::snapshot::PlayerView;
use crate::domain::ParticipantId;

const LINES: [&str; 3] = ["hmm", "not me", "skip?"];

pub struct RandomProvider {
    rng: Mutex<StdRng>,
}

impl RandomProvider {
    pub const NAME: &'static str = "Random";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StdRng>, AiError> {
        self.rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))
    }
}

#[async_trait]
impl DecisionProvider for RandomProvider {
    async fn choose_movement(&self, view: &PlayerView) -> Result<MovementIntent, AiError> {
        let mut options: Vec<MovementIntent> = view
            .adjacent_rooms()
            .iter()
            .copied()
            .map(MovementIntent::Move)
            .collect();
        options.push(MovementIntent::Stay);
        if view.is_impostor() && view.living_in(view.me.room) == 1 {
            options.push(MovementIntent::Kill);
        }
        let mut rng = self.lock()?;
        options
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| AiError::Internal("no movement options".into()))
    }

    async fn compose_chat(&self, _view: &PlayerView) -> Result<Option<String>, AiError> {
        let mut rng = self.lock()?;
        Ok(LINES.choose(&mut *rng).map(|l| (*l).to_string()))
    }

    async fn choose_vote(&self, view: &PlayerView) -> Result<Option<ParticipantId>, AiError> {
        let mut options: Vec<Option<ParticipantId>> =
            view.living_others().map(|p| Some(p.id)).collect();
        options.push(None);
        let mut rng = self.lock()?;
        Ok(options.choose(&mut *rng).copied().flatten())
    }
}
