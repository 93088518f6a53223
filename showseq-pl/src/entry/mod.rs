//! Playlist entries
//!
//! A playlist is an ordered list of entries of different kinds. Each kind
//! implements [`PlaylistEntry`]; shared bookkeeping lives in
//! [`base::EntryBase`]. Only the sequence kind is provided here.

pub mod base;
pub mod duration;
pub mod sequence;

pub use base::{BaseEntryHooks, EntryBase};
pub use duration::DurationCache;
pub use sequence::SequenceEntry;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use showseq_common::events::EntryOutcome;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::fseq::HeaderReader;
use crate::playback::{PlaybackArbiter, SessionTiming};
use crate::status::{sequence_status_topic, StatusPublisher};

/// Entry kinds this crate can bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Sequence,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Sequence => "sequence",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sequence" => Ok(EntryKind::Sequence),
            other => Err(Error::InvalidConfigField {
                field: "type",
                reason: format!("unsupported entry type '{}'", other),
            }),
        }
    }
}

/// Resting states visible from outside an entry
///
/// How the entry last left `Playing` is reported separately as an
/// [`EntryOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Playing,
}

/// Collaborators shared by every entry of a playlist
#[derive(Clone)]
pub struct EntryContext {
    pub player: PlaybackArbiter,
    pub header_reader: Arc<dyn HeaderReader>,
    pub publisher: Arc<dyn StatusPublisher>,
    /// Folder sequence names are resolved against
    pub sequence_dir: PathBuf,
    pub status_topic: String,
}

impl EntryContext {
    pub fn new(
        player: PlaybackArbiter,
        header_reader: Arc<dyn HeaderReader>,
        publisher: Arc<dyn StatusPublisher>,
        sequence_dir: impl Into<PathBuf>,
        status_topic_prefix: &str,
    ) -> Self {
        Self {
            player,
            header_reader,
            publisher,
            sequence_dir: sequence_dir.into(),
            status_topic: sequence_status_topic(status_topic_prefix),
        }
    }
}

/// Capability set shared by all playlist entry kinds
pub trait PlaylistEntry: Send {
    fn id(&self) -> Uuid;
    fn kind(&self) -> EntryKind;
    /// Name of the item this entry plays
    fn name(&self) -> &str;
    fn can_play(&self) -> bool;
    fn prepare(&mut self) -> Result<()>;
    fn start_playing(&mut self) -> Result<()>;
    /// Called once per scheduler tick while active
    fn process(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn lifecycle_state(&self) -> LifecycleState;
    fn last_outcome(&self) -> Option<EntryOutcome>;
    fn elapsed_ms(&self) -> u64;
    /// Total length in milliseconds, 0 when unknown
    fn length_ms(&mut self) -> u64;
    fn timing(&self) -> SessionTiming;
    fn dump(&self);
    fn get_config(&self) -> Value;
    fn get_status(&self) -> Value;
}

/// Build an entry from its JSON configuration
///
/// `type` defaults to `"sequence"` when absent.
pub fn bind_entry(config: &Value, ctx: &EntryContext) -> Result<Box<dyn PlaylistEntry>> {
    let kind = match config.get("type") {
        None | Some(Value::Null) => EntryKind::Sequence,
        Some(Value::String(s)) => s.parse()?,
        Some(other) => {
            return Err(Error::InvalidConfigField {
                field: "type",
                reason: format!("expected string, got {}", other),
            })
        }
    };

    match kind {
        EntryKind::Sequence => Ok(Box::new(SequenceEntry::bind(config, ctx)?)),
    }
}
