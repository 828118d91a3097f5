//! Decision providers with scripted behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use beanpot::ai::{AiError, DecisionProvider, MovementIntent};
use beanpot::domain::snapshot::PlayerView;
use beanpot::domain::ParticipantId;

/// Raw chat line the chatty script sends; the engine strips the quotes.
pub const CHATTY_LINE: &str = "  \"I was in MedBay the whole time\" ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Stay put, stay quiet, skip every vote.
    Idle,
    /// Never answer within any sane timeout.
    Stall,
    /// Fail every call.
    Fail,
    /// Stay put, chat a quoted line, vote for itself.
    Chatty,
}

pub struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn idle() -> Arc<Self> {
        Self::new(Script::Idle)
    }

    pub fn stalling() -> Arc<Self> {
        Self::new(Script::Stall)
    }

    pub fn failing() -> Arc<Self> {
        Self::new(Script::Fail)
    }

    pub fn chatty() -> Arc<Self> {
        Self::new(Script::Chatty)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer<T>(&self, idle: T) -> Result<T, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::Idle | Script::Chatty => Ok(idle),
            Script::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(idle)
            }
            Script::Fail => Err(AiError::Internal("scripted failure".into())),
        }
    }
}

#[async_trait]
impl DecisionProvider for ScriptedProvider {
    async fn choose_movement(&self, _view: &PlayerView) -> Result<MovementIntent, AiError> {
        self.answer(MovementIntent::Stay).await
    }

    async fn compose_chat(&self, _view: &PlayerView) -> Result<Option<String>, AiError> {
        let line = (self.script == Script::Chatty).then(|| CHATTY_LINE.to_string());
        self.answer(line).await
    }

    async fn choose_vote(&self, view: &PlayerView) -> Result<Option<ParticipantId>, AiError> {
        let target = (self.script == Script::Chatty).then_some(view.me.id);
        self.answer(target).await
    }
}
