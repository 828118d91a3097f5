use std::sync::Arc;

use crate::realtime::protocol::{MatchEvent, Topic};

/// Outbound event sink injected into the engine.
///
/// `publish` is called while the match is locked, so implementations must
/// not block and must not call back into the engine.
pub trait BroadcastGateway: Send + Sync {
    fn publish(&self, topic: Topic, event: MatchEvent);

    /// The topic will see no further events.
    fn retire(&self, _topic: Topic) {}
}

/// Publishes every event to each inner gateway in order.
#[derive(Default, Clone)]
pub struct Fanout {
    sinks: Vec<Arc<dyn BroadcastGateway>>,
}

impl Fanout {
    pub fn new(sinks: Vec<Arc<dyn BroadcastGateway>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn BroadcastGateway>) {
        self.sinks.push(sink);
    }
}

impl BroadcastGateway for Fanout {
    fn publish(&self, topic: Topic, event: MatchEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.publish(topic, event.clone());
            }
            last.publish(topic, event);
        }
    }

    fn retire(&self, topic: Topic) {
        for sink in &self.sinks {
            sink.retire(topic);
        }
    }
}
