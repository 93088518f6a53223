//! Status notification side channel
//!
//! Fire-and-forget: a publisher never reports failure back to the entry.

use showseq_common::events::{EventBus, ShowEvent};
use showseq_common::time;
use tracing::trace;

/// Sink for entry status notifications
pub trait StatusPublisher: Send + Sync {
    fn publish(&self, topic: &str, payload: &str);
}

/// Topic sequence entries publish on
pub fn sequence_status_topic(prefix: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        "sequence/status".to_string()
    } else {
        format!("{}/sequence/status", prefix)
    }
}

/// Publishes status onto the shared [`EventBus`]
#[derive(Clone)]
pub struct BroadcastPublisher {
    bus: EventBus,
}

impl BroadcastPublisher {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl StatusPublisher for BroadcastPublisher {
    fn publish(&self, topic: &str, payload: &str) {
        trace!("Publishing '{}' on {}", payload, topic);
        self.bus.emit_lossy(ShowEvent::StatusPublished {
            topic: topic.to_string(),
            payload: payload.to_string(),
            timestamp: time::now(),
        });
    }
}
