//! Real-time playback session contract

use serde::Serialize;
use showseq_common::events::EntryTimingInfo;

use crate::error::Result;

/// Live counters of an open session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTiming {
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    pub total_ms: u64,
}

impl From<SessionTiming> for EntryTimingInfo {
    fn from(timing: SessionTiming) -> Self {
        Self {
            elapsed_ms: timing.elapsed_ms,
            remaining_ms: timing.remaining_ms,
            total_ms: timing.total_ms,
        }
    }
}

/// Handle onto the engine that streams sequence frames in real time
///
/// Only one session can be open at a time. Implementations are driven from
/// a single control thread; none of these calls may block on unbounded I/O.
pub trait SequencePlaybackHandle: Send {
    /// Open `sequence_name` and return its total duration in milliseconds
    fn open(&mut self, sequence_name: &str) -> Result<u64>;

    /// Begin real-time playback of the open sequence
    fn start(&mut self) -> Result<()>;

    /// True while the open sequence still has frames to output
    fn is_running(&self) -> bool;

    /// Close the open sequence. No-op when nothing is open.
    fn close(&mut self);

    /// Current counters; all zero when nothing is open
    fn timing(&self) -> SessionTiming;
}
