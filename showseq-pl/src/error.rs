//! Error types for showseq-pl
//!
//! Every failure in the entry lifecycle degrades the entry to Idle and is
//! reported through one of these variants. None of them is fatal to the
//! surrounding playlist.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Main error type for showseq-pl
#[derive(Error, Debug)]
pub enum Error {
    /// Required entry configuration field is absent
    #[error("Missing {field} entry")]
    MissingConfigField { field: &'static str },

    /// Entry configuration field has the wrong shape
    #[error("Invalid {field} entry: {reason}")]
    InvalidConfigField { field: &'static str, reason: String },

    /// Opening the sequence for playback failed
    ///
    /// Recoverable: the entry stays Idle and a later start may retry.
    #[error("Error opening sequence {sequence}: {reason}")]
    PrepareFailed { sequence: String, reason: String },

    /// Base entry eligibility check refused playback
    ///
    /// Normal control flow (play-once already played, entry disabled).
    #[error("Sequence {sequence} cannot play")]
    NotPlayable { sequence: String },

    /// A base entry hook reported failure
    #[error("{hook} hook failed for {entry}")]
    HookFailed { hook: &'static str, entry: String },

    /// The shared playback session belongs to another entry
    #[error("Playback session is held by entry {held_by}")]
    SessionBusy { held_by: Uuid },

    /// Caller does not own the playback session
    #[error("Entry {owner} does not hold the playback session")]
    SessionNotHeld { owner: Uuid },

    /// Session operation issued with no sequence open
    #[error("No sequence is open")]
    NoOpenSession,

    /// Sequence file does not exist
    #[error("Sequence file not found: {}", path.display())]
    SequenceNotFound { path: PathBuf },

    /// Sequence file could not be read far enough to cover its header
    #[error("Invalid sequence header in {}: {reason}", path.display())]
    Header { path: PathBuf, reason: String },

    /// Header bytes are not a supported sequence header
    #[error("Malformed sequence header: {reason}")]
    MalformedHeader { reason: String },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for outcomes that are ordinary control flow rather than faults
    pub fn is_control_flow(&self) -> bool {
        matches!(self, Error::NotPlayable { .. })
    }
}

/// Convenience Result type using showseq-pl Error
pub type Result<T> = std::result::Result<T, Error>;
