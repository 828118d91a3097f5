//! In-process fan-out of match events over tokio broadcast channels.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::realtime::gateway::BroadcastGateway;
use crate::realtime::protocol::{Envelope, MatchEvent, Topic};

pub struct MatchSessionRegistry {
    channels: DashMap<Topic, broadcast::Sender<Envelope>>,
    capacity: usize,
}

impl MatchSessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    fn sender(&self, topic: Topic) -> broadcast::Sender<Envelope> {
        self.channels
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Live events for `topic`. Subscribers that fall behind skip the
    /// missed events rather than stalling publishers.
    pub fn subscribe(&self, topic: Topic) -> impl Stream<Item = Envelope> + Send + 'static {
        BroadcastStream::new(self.sender(topic).subscribe()).filter_map(move |item| match item {
            Ok(envelope) => Some(envelope),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(?topic, skipped, "Subscriber lagged; events dropped");
                None
            }
        })
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels
            .get(&topic)
            .map_or(0, |sender| sender.receiver_count())
    }

    /// Drop a topic's channel. Open streams end once drained.
    pub fn close(&self, topic: Topic) {
        if self.channels.remove(&topic).is_some() {
            debug!(?topic, "Closed topic channel");
        }
    }
}

impl BroadcastGateway for MatchSessionRegistry {
    fn publish(&self, topic: Topic, event: MatchEvent) {
        let Some(sender) = self.channels.get(&topic).map(|s| s.clone()) else {
            return;
        };
        // No receivers is not an error.
        let _ = sender.send(Envelope::new(topic, event));
    }

    fn retire(&self, topic: Topic) {
        self.close(topic);
    }
}
