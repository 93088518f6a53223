//! Generic playlist entry behavior
//!
//! Every entry kind carries an [`EntryBase`] for the bookkeeping that is the
//! same across kinds: enable flag, play-once limit, started/playing/finished
//! flags and the JSON fields common to config and status output.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::EntryKind;
use crate::error::{Error, Result};

/// Hooks an entry kind delegates to around its own lifecycle work
pub trait BaseEntryHooks: Send {
    /// Eligibility check consulted before starting
    fn can_play(&self) -> bool;

    /// Called once the entry has started playing
    fn on_start_playing(&mut self) -> bool;

    /// Completion / cleanup path
    fn on_finish_play(&mut self);

    /// Called every scheduler tick
    fn on_process(&mut self) -> bool;

    /// Called after an explicit stop
    fn on_stop(&mut self) -> bool;

    /// Common config fields
    fn config(&self) -> Map<String, Value>;

    /// Common status fields
    fn status(&self) -> Map<String, Value>;

    /// Log the common fields
    fn dump(&self);
}

/// Default [`BaseEntryHooks`] implementation
#[derive(Debug, Clone)]
pub struct EntryBase {
    entry_type: EntryKind,
    enabled: bool,
    play_once: bool,
    play_count: u32,
    note: Option<String>,
    is_started: bool,
    is_playing: bool,
    is_finished: bool,
}

impl EntryBase {
    pub fn new(entry_type: EntryKind) -> Self {
        Self {
            entry_type,
            enabled: true,
            play_once: false,
            play_count: 0,
            note: None,
            is_started: false,
            is_playing: false,
            is_finished: false,
        }
    }

    /// Read the generic fields (`enabled`, `playOnce`, `note`)
    pub fn from_config(entry_type: EntryKind, config: &Value) -> Result<Self> {
        let mut base = Self::new(entry_type);
        if let Some(enabled) = optional_bool(config, "enabled")? {
            base.enabled = enabled;
        }
        if let Some(play_once) = optional_bool(config, "playOnce")? {
            base.play_once = play_once;
        }
        base.note = optional_string(config, "note")?;
        Ok(base)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_play_once(mut self, play_once: bool) -> Self {
        self.play_once = play_once;
        self
    }

    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }
}

impl BaseEntryHooks for EntryBase {
    fn can_play(&self) -> bool {
        if !self.enabled {
            return false;
        }
        !(self.play_once && self.play_count > 0)
    }

    fn on_start_playing(&mut self) -> bool {
        self.is_started = true;
        self.is_playing = true;
        self.is_finished = false;
        self.play_count += 1;
        true
    }

    fn on_finish_play(&mut self) {
        self.is_playing = false;
        self.is_finished = true;
    }

    fn on_process(&mut self) -> bool {
        true
    }

    fn on_stop(&mut self) -> bool {
        self.on_finish_play();
        true
    }

    fn config(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".to_string(), json!(self.entry_type.as_str()));
        map.insert("enabled".to_string(), json!(self.enabled));
        map.insert("playOnce".to_string(), json!(self.play_once));
        if let Some(note) = &self.note {
            map.insert("note".to_string(), json!(note));
        }
        map
    }

    fn status(&self) -> Map<String, Value> {
        let mut map = self.config();
        map.insert("isStarted".to_string(), json!(self.is_started));
        map.insert("isPlaying".to_string(), json!(self.is_playing));
        map.insert("isFinished".to_string(), json!(self.is_finished));
        map.insert("playCount".to_string(), json!(self.play_count));
        map
    }

    fn dump(&self) {
        debug!("Entry Type   : {}", self.entry_type);
        debug!("Enabled      : {}", self.enabled);
        debug!("Play Once    : {}", self.play_once);
        debug!("Play Count   : {}", self.play_count);
        debug!("Note         : {}", self.note.as_deref().unwrap_or(""));
        debug!(
            "Started/Playing/Finished: {}/{}/{}",
            self.is_started, self.is_playing, self.is_finished
        );
    }
}

fn optional_bool(config: &Value, field: &'static str) -> Result<Option<bool>> {
    match config.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(Error::InvalidConfigField {
            field,
            reason: format!("expected boolean, got {}", other),
        }),
    }
}

fn optional_string(config: &Value, field: &'static str) -> Result<Option<String>> {
    match config.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::InvalidConfigField {
            field,
            reason: format!("expected string, got {}", other),
        }),
    }
}
