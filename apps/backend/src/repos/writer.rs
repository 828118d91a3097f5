//! Ordered background writer in front of a `PersistenceGateway`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{PersistOp, PersistenceGateway};

/// Cheap handle for queueing writes from synchronous, locked code.
#[derive(Clone)]
pub struct PersistenceWriter {
    tx: mpsc::UnboundedSender<PersistOp>,
}

impl PersistenceWriter {
    /// Spawn the writer task. It drains queued writes until every handle is
    /// dropped or `shutdown` is cancelled.
    pub fn spawn(
        gateway: Arc<dyn PersistenceGateway>,
        shutdown: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(gateway, rx, shutdown));
        (Self { tx }, handle)
    }

    /// Queue a write. Never blocks; a stopped writer drops the op.
    pub fn enqueue(&self, op: PersistOp) {
        if let Err(err) = self.tx.send(op) {
            debug!(op = err.0.kind(), "Persistence writer stopped; dropping write");
        }
    }
}

async fn run(
    gateway: Arc<dyn PersistenceGateway>,
    mut rx: mpsc::UnboundedReceiver<PersistOp>,
    shutdown: CancellationToken,
) {
    loop {
        let op = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            op = rx.recv() => match op {
                Some(op) => op,
                None => break,
            },
        };

        let kind = op.kind();
        let result = match &op {
            PersistOp::SaveMatch(m) => gateway.save_match(m).await,
            PersistOp::SaveParticipant(p) => gateway.save_participant(p).await,
            PersistOp::AppendChat(entry) => gateway.append_chat(entry).await,
        };
        if let Err(err) = result {
            warn!(op = kind, error = %err, "Persistence write failed; live state unaffected");
        }
    }
    debug!("Persistence writer exiting");
}
