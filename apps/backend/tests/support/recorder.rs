//! Broadcast sink that keeps every event for later assertions.

use std::sync::Mutex;

use beanpot::domain::MatchId;
use beanpot::realtime::{BroadcastGateway, MatchEvent, Topic};

#[derive(Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<(Topic, MatchEvent)>>,
}

impl RecordingBroadcaster {
    pub fn all(&self) -> Vec<(Topic, MatchEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Events published to one match, in order.
    pub fn for_match(&self, id: MatchId) -> Vec<MatchEvent> {
        let topic = Topic::of(id);
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == topic)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn kinds(&self, id: MatchId) -> Vec<&'static str> {
        self.for_match(id).iter().map(MatchEvent::kind).collect()
    }

    pub fn count(&self, id: MatchId, kind: &str) -> usize {
        self.kinds(id).into_iter().filter(|k| *k == kind).count()
    }
}

impl BroadcastGateway for RecordingBroadcaster {
    fn publish(&self, topic: Topic, event: MatchEvent) {
        self.events.lock().unwrap().push((topic, event));
    }
}
