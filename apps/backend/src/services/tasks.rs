//! Cancellable task table, one per match.
//!
//! Tokens form a tree: the match root owns a phase token (rotated on every
//! transition) and an optional lobby-countdown token. Cancelling the root at
//! finish tears down everything still scheduled for the match.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct TaskTable {
    root: CancellationToken,
    phase: CancellationToken,
    lobby: Option<CancellationToken>,
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTable {
    pub fn new() -> Self {
        let root = CancellationToken::new();
        let phase = root.child_token();
        Self {
            root,
            phase,
            lobby: None,
        }
    }

    /// Cancel everything scheduled for the outgoing phase and hand out the
    /// token for the incoming one.
    pub fn rotate_phase(&mut self) -> CancellationToken {
        self.phase.cancel();
        self.phase = self.root.child_token();
        self.phase.clone()
    }

    pub fn phase_token(&self) -> CancellationToken {
        self.phase.clone()
    }

    /// Arm the lobby countdown. `None` if one is already armed.
    pub fn arm_lobby(&mut self) -> Option<CancellationToken> {
        if self.lobby.is_some() || self.root.is_cancelled() {
            return None;
        }
        let token = self.root.child_token();
        self.lobby = Some(token.clone());
        Some(token)
    }

    pub fn lobby_armed(&self) -> bool {
        self.lobby.is_some()
    }

    pub fn disarm_lobby(&mut self) {
        if let Some(token) = self.lobby.take() {
            token.cancel();
        }
    }

    /// Permanent: no token handed out afterwards is ever live.
    pub fn shutdown(&mut self) {
        self.lobby = None;
        self.root.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

/// Spawns work bound to a cancellation token.
#[derive(Clone, Debug)]
pub struct Spawner {
    handle: Handle,
}

impl Spawner {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Try to capture the current runtime.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Run `work` at `at` unless `token` is cancelled first. Cancellation also
    /// aborts `work` mid-flight at its next suspension point.
    pub fn at<F>(&self, token: CancellationToken, at: Instant, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.run(token, async move {
            tokio::time::sleep_until(at).await;
            work.await;
        });
    }

    pub fn after<F>(&self, token: CancellationToken, delay: Duration, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.at(token, Instant::now() + delay, work);
    }

    /// Run `work` until it completes or `token` is cancelled.
    pub fn run<F>(&self, token: CancellationToken, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = work => {}
            }
        });
    }
}
