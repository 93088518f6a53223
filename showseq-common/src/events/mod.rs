//! Event types for the show sequencer event system
//!
//! Provides shared event definitions and the EventBus.

mod entry_types;

pub use entry_types::{EntryOutcome, EntryTimingInfo};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

/// Show sequencer event types
///
/// Events are broadcast via EventBus and can be serialized for status transports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShowEvent {
    /// Status message handed to the publish side channel
    ///
    /// An empty payload means "nothing playing".
    StatusPublished {
        /// Topic the status was published on
        topic: String,
        /// Raw payload (sequence name, or empty)
        payload: String,
        /// When the status was published
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playlist entry started playing
    EntryStarted {
        /// Entry instance id
        entry_id: Uuid,
        /// Entry kind ("sequence")
        entry_type: String,
        /// Name of the item being played
        name: String,
        /// When the entry started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Periodic progress while an entry plays
    EntryProgress {
        /// Entry instance id
        entry_id: Uuid,
        /// Live session timing
        timing: EntryTimingInfo,
        /// When the progress was sampled
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playlist entry left the Playing state (or never entered it)
    EntryEnded {
        /// Entry instance id
        entry_id: Uuid,
        /// Name of the item
        name: String,
        /// How the entry ended
        outcome: EntryOutcome,
        /// When the entry ended
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ShowEvent {
    /// Event type name for logs and transports
    pub fn event_type(&self) -> &'static str {
        match self {
            ShowEvent::StatusPublished { .. } => "StatusPublished",
            ShowEvent::EntryStarted { .. } => "EntryStarted",
            ShowEvent::EntryProgress { .. } => "EntryProgress",
            ShowEvent::EntryEnded { .. } => "EntryEnded",
        }
    }
}

/// Fan-out channel for [`ShowEvent`]s
///
/// Thin wrapper over a tokio broadcast channel. Producers never wait on
/// consumers; a consumer that falls more than `capacity` events behind
/// sees `RecvError::Lagged` and continues from the oldest retained event.
///
/// ```
/// use showseq_common::events::{EventBus, ShowEvent};
///
/// let bus = EventBus::new(16);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(ShowEvent::StatusPublished {
///     topic: "playlist/sequence/status".to_string(),
///     payload: "show.fseq".to_string(),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ShowEvent>,
    capacity: usize,
}

impl EventBus {
    /// Bus retaining at most `capacity` undelivered events per receiver
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// New receiver; sees only events emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ShowEvent> {
        self.tx.subscribe()
    }

    /// Send to every receiver, returning how many there were
    ///
    /// Fails when nobody is subscribed.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ShowEvent,
    ) -> Result<usize, broadcast::error::SendError<ShowEvent>> {
        self.tx.send(event)
    }

    /// Send, dropping the event when nobody is subscribed
    pub fn emit_lossy(&self, event: ShowEvent) {
        if self.tx.send(event).is_err() {
            trace!("No event subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
