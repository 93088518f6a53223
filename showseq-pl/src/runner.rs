//! Single-entry scheduler loop
//!
//! Starts one entry and ticks it until the session ends or the caller asks
//! to stop. There is never more than one active entry.

use std::future::Future;
use std::time::Duration;

use showseq_common::events::{EntryOutcome, EventBus, ShowEvent};
use showseq_common::time;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::entry::{LifecycleState, PlaylistEntry};
use crate::error::Result;

/// Drives a [`PlaylistEntry`] through its lifecycle on a fixed tick
pub struct EntryRunner {
    bus: EventBus,
    tick_interval: Duration,
    progress_interval: Duration,
}

impl EntryRunner {
    pub fn new(bus: EventBus, tick_interval: Duration, progress_interval: Duration) -> Self {
        Self {
            bus,
            tick_interval,
            progress_interval,
        }
    }

    pub fn from_config(bus: EventBus, config: &Config) -> Self {
        Self::new(bus, config.tick_interval, config.progress_interval)
    }

    /// Play `entry` until it finishes or `shutdown` resolves
    ///
    /// Returns how the entry ended. Prepare failures are returned as errors
    /// with the entry already back in Idle.
    pub async fn run<F>(&self, entry: &mut dyn PlaylistEntry, shutdown: F) -> Result<EntryOutcome>
    where
        F: Future<Output = ()>,
    {
        match entry.start_playing() {
            Ok(()) => {}
            Err(e) if e.is_control_flow() => {
                info!("Skipping {}: {}", entry.name(), e);
                self.emit_ended(entry, EntryOutcome::Skipped);
                return Ok(EntryOutcome::Skipped);
            }
            Err(e) => {
                if entry.lifecycle_state() == LifecycleState::Playing {
                    // Session is running but the start hook failed
                    if let Err(stop_err) = entry.stop() {
                        warn!("Stop after failed start of {}: {}", entry.name(), stop_err);
                    }
                }
                return Err(e);
            }
        }

        self.bus.emit_lossy(ShowEvent::EntryStarted {
            entry_id: entry.id(),
            entry_type: entry.kind().to_string(),
            name: entry.name().to_string(),
            timestamp: time::now(),
        });

        let mut tick = interval(self.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut progress = interval(self.progress_interval);
        progress.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = entry.process() {
                        warn!("Process failed for {}: {}", entry.name(), e);
                    }
                    if entry.lifecycle_state() == LifecycleState::Idle {
                        let outcome = entry.last_outcome().unwrap_or(EntryOutcome::Finished);
                        self.emit_ended(entry, outcome);
                        return Ok(outcome);
                    }
                }
                _ = progress.tick() => {
                    let timing = entry.timing();
                    debug!(
                        "{}: {}ms elapsed, {}ms remaining",
                        entry.name(),
                        timing.elapsed_ms,
                        timing.remaining_ms
                    );
                    self.bus.emit_lossy(ShowEvent::EntryProgress {
                        entry_id: entry.id(),
                        timing: timing.into(),
                        timestamp: time::now(),
                    });
                }
                _ = &mut shutdown => {
                    info!("Stopping {}", entry.name());
                    if let Err(e) = entry.stop() {
                        warn!("Stop hook failed for {}: {}", entry.name(), e);
                    }
                    self.emit_ended(entry, EntryOutcome::Stopped);
                    return Ok(EntryOutcome::Stopped);
                }
            }
        }
    }

    fn emit_ended(&self, entry: &dyn PlaylistEntry, outcome: EntryOutcome) {
        self.bus.emit_lossy(ShowEvent::EntryEnded {
            entry_id: entry.id(),
            name: entry.name().to_string(),
            outcome,
            timestamp: time::now(),
        });
    }
}

/// Log every event from `rx` until all senders are gone
///
/// Returns the number of events logged. Events still buffered when the
/// last sender drops are drained before returning.
pub async fn log_events(mut rx: broadcast::Receiver<ShowEvent>) -> usize {
    let mut logged = 0;
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event log lagged, skipped {} events", skipped);
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        match &event {
            ShowEvent::StatusPublished { topic, payload, .. } => {
                info!("[{}] '{}'", topic, payload);
            }
            ShowEvent::EntryProgress { timing, .. } => {
                info!("{}s / {}s", timing.elapsed_ms / 1000, timing.total_ms / 1000);
            }
            other => info!("{}", other.event_type()),
        }
        logged += 1;
    }
    logged
}
