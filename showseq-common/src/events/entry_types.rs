//! Playlist entry type definitions
//!
//! Supporting types for entry lifecycle reporting.

use serde::{Deserialize, Serialize};

/// How an entry left the Playing state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum EntryOutcome {
    /// Session reported end of file during a tick
    Finished,
    /// Caller stopped the entry explicitly
    Stopped,
    /// Eligibility check refused the entry before it started
    Skipped,
}

impl std::fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryOutcome::Finished => write!(f, "Finished"),
            EntryOutcome::Stopped => write!(f, "Stopped"),
            EntryOutcome::Skipped => write!(f, "Skipped"),
        }
    }
}

/// Live timing snapshot for an entry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryTimingInfo {
    /// Milliseconds played so far
    pub elapsed_ms: u64,
    /// Milliseconds left in the session
    pub remaining_ms: u64,
    /// Total session length in milliseconds
    pub total_ms: u64,
}
