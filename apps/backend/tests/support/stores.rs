use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use beanpot::domain::{ChatEntry, Match, Participant};
use beanpot::repos::{PersistError, PersistenceGateway};

/// Rejects every write but counts the attempts.
#[derive(Default)]
pub struct FailingStore {
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail(&self) -> Result<(), PersistError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(PersistError::Unavailable("database offline".into()))
    }
}

#[async_trait]
impl PersistenceGateway for FailingStore {
    async fn save_match(&self, _m: &Match) -> Result<(), PersistError> {
        self.fail()
    }

    async fn save_participant(&self, _p: &Participant) -> Result<(), PersistError> {
        self.fail()
    }

    async fn append_chat(&self, _entry: &ChatEntry) -> Result<(), PersistError> {
        self.fail()
    }
}
