//! Sequence playlist entry
//!
//! Drives one show file through prepare → play → monitor → stop. Frame
//! output is delegated to the shared playback session (through the
//! [`PlaybackArbiter`]); this entry only decides when to open, start and
//! close it, and keeps the cached duration and prepared flag honest.
//!
//! State machine:
//! ```text
//! Idle ──prepare──▶ Idle+prepared ──start_playing──▶ Playing
//!   ▲                                                   │
//!   └──── process (session ended) / stop / not playable ┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use showseq_common::events::EntryOutcome;
use showseq_common::time::millis_to_whole_seconds;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::base::{BaseEntryHooks, EntryBase};
use super::duration::DurationCache;
use super::{EntryContext, EntryKind, LifecycleState, PlaylistEntry};
use crate::error::{Error, Result};
use crate::fseq::HeaderReader;
use crate::playback::{PlaybackArbiter, SessionTiming};
use crate::status::StatusPublisher;

/// Config key naming the sequence file
pub const SEQUENCE_NAME_FIELD: &str = "sequenceName";

/// Sequence-specific fields of config and status output
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SequenceFields<'a> {
    sequence_name: &'a str,
    seconds_elapsed: u64,
    seconds_remaining: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seconds_total: Option<u64>,
}

/// Playlist entry that plays one sequence file
pub struct SequenceEntry<B: BaseEntryHooks = EntryBase> {
    id: Uuid,
    base: B,
    sequence_name: String,
    sequence_path: PathBuf,
    duration: DurationCache,
    /// True only while this entry holds an open session
    prepared: bool,
    state: LifecycleState,
    last_outcome: Option<EntryOutcome>,
    player: PlaybackArbiter,
    header_reader: Arc<dyn HeaderReader>,
    publisher: Arc<dyn StatusPublisher>,
    status_topic: String,
}

impl SequenceEntry<EntryBase> {
    /// Construct from entry JSON (`sequenceName` plus generic base fields)
    pub fn bind(config: &Value, ctx: &EntryContext) -> Result<Self> {
        debug!("SequenceEntry::bind()");

        let sequence_name = match config.get(SEQUENCE_NAME_FIELD) {
            None | Some(Value::Null) => {
                error!("Missing {} entry", SEQUENCE_NAME_FIELD);
                return Err(Error::MissingConfigField {
                    field: SEQUENCE_NAME_FIELD,
                });
            }
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) => {
                return Err(Error::InvalidConfigField {
                    field: SEQUENCE_NAME_FIELD,
                    reason: "empty name".to_string(),
                });
            }
            Some(other) => {
                return Err(Error::InvalidConfigField {
                    field: SEQUENCE_NAME_FIELD,
                    reason: format!("expected string, got {}", other),
                });
            }
        };

        let base = EntryBase::from_config(EntryKind::Sequence, config)?;
        Ok(Self::with_base(sequence_name, base, ctx))
    }
}

impl<B: BaseEntryHooks> SequenceEntry<B> {
    /// Construct around an explicit base implementation
    pub fn with_base(sequence_name: impl Into<String>, base: B, ctx: &EntryContext) -> Self {
        let sequence_name = sequence_name.into();
        Self {
            id: Uuid::new_v4(),
            base,
            sequence_path: ctx.sequence_dir.join(&sequence_name),
            sequence_name,
            duration: DurationCache::new(),
            prepared: false,
            state: LifecycleState::Idle,
            last_outcome: None,
            player: ctx.player.clone(),
            header_reader: Arc::clone(&ctx.header_reader),
            publisher: Arc::clone(&ctx.publisher),
            status_topic: ctx.status_topic.clone(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sequence_name(&self) -> &str {
        &self.sequence_name
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.state
    }

    pub fn last_outcome(&self) -> Option<EntryOutcome> {
        self.last_outcome
    }

    /// Cached duration without triggering a header read
    pub fn cached_duration_ms(&self) -> Option<u64> {
        self.duration.get()
    }

    /// Open the sequence on the shared session
    ///
    /// No-op when already prepared. On failure the entry stays unprepared.
    pub fn prepare(&mut self) -> Result<()> {
        if self.prepared {
            debug!("Sequence {} already prepared", self.sequence_name);
            return Ok(());
        }

        match self.player.open(self.id, &self.sequence_name) {
            Ok(total_ms) => {
                self.prepared = true;
                self.duration.record_live(total_ms);
                debug!("Prepared sequence {} ({}ms)", self.sequence_name, total_ms);
                Ok(())
            }
            Err(e) => {
                self.prepared = false;
                warn!("Error opening sequence {}: {}", self.sequence_name, e);
                Err(Error::PrepareFailed {
                    sequence: self.sequence_name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Start playback, preparing first if needed
    ///
    /// `Error::NotPlayable` is ordinary control flow: the entry has run its
    /// finish path and the caller should move on. Calling this while already
    /// Playing is a no-op.
    pub fn start_playing(&mut self) -> Result<()> {
        debug!("SequenceEntry::start_playing() {}", self.sequence_name);

        if self.state == LifecycleState::Playing {
            debug!("Sequence {} already playing", self.sequence_name);
            return Ok(());
        }

        if !self.base.can_play() {
            debug!("Sequence {} not eligible to play", self.sequence_name);
            if self.prepared {
                self.player.close(self.id);
            }
            self.prepared = false;
            self.finish(EntryOutcome::Skipped);
            return Err(Error::NotPlayable {
                sequence: self.sequence_name.clone(),
            });
        }

        if !self.prepared {
            if let Err(e) = self.prepare() {
                self.base.on_finish_play();
                self.state = LifecycleState::Idle;
                return Err(e);
            }
        }

        if let Err(e) = self.player.start(self.id) {
            warn!("Error starting sequence {}: {}", self.sequence_name, e);
            self.player.close(self.id);
            self.prepared = false;
            self.base.on_finish_play();
            self.state = LifecycleState::Idle;
            return Err(Error::PrepareFailed {
                sequence: self.sequence_name.clone(),
                reason: e.to_string(),
            });
        }

        self.state = LifecycleState::Playing;
        self.last_outcome = None;
        info!("Started sequence {}", self.sequence_name);
        self.publisher.publish(&self.status_topic, &self.sequence_name);

        hook_result(self.base.on_start_playing(), "start_playing", &self.sequence_name)
    }

    /// Per-tick poll; detects natural end of the sequence
    pub fn process(&mut self) -> Result<()> {
        let active = self.prepared || self.state == LifecycleState::Playing;
        if active && !self.player.is_running(self.id) {
            info!("Sequence {} finished", self.sequence_name);
            self.player.close(self.id);
            self.finish(EntryOutcome::Finished);
            self.publisher.publish(&self.status_topic, "");
        }

        hook_result(self.base.on_process(), "process", &self.sequence_name)
    }

    /// Close the session and return to Idle; safe from any state
    pub fn stop(&mut self) -> Result<()> {
        debug!("SequenceEntry::stop() {}", self.sequence_name);

        let was_active = self.prepared || self.state == LifecycleState::Playing;
        let held_elsewhere = self.player.holder().is_some_and(|owner| owner != self.id);
        self.player.close(self.id);
        self.prepared = false;
        self.state = LifecycleState::Idle;
        if was_active {
            self.last_outcome = Some(EntryOutcome::Stopped);
        }

        // Another entry's session is still live; leave its status alone
        if held_elsewhere {
            debug!("Sequence {} stopped while another entry plays", self.sequence_name);
        } else {
            self.publisher.publish(&self.status_topic, "");
        }

        hook_result(self.base.on_stop(), "stop", &self.sequence_name)
    }

    /// Total duration, reading only the file header if not yet known
    ///
    /// `None` when the file is absent or unreadable.
    pub fn duration_ms(&mut self) -> Option<u64> {
        self.duration
            .resolve(&self.sequence_path, self.header_reader.as_ref())
    }

    /// Time left to play in milliseconds, 0 when unknown
    ///
    /// Uses the live session while prepared, otherwise the full duration.
    pub fn remaining_duration_ms(&mut self) -> u64 {
        if self.prepared {
            if let Some(timing) = self.player.timing(self.id) {
                return timing.remaining_ms;
            }
        }
        self.duration_ms().unwrap_or(0)
    }

    /// Elapsed play time; 0 unless prepared
    pub fn elapsed_ms(&self) -> u64 {
        self.timing().elapsed_ms
    }

    /// Live session counters; all zero unless prepared
    pub fn timing(&self) -> SessionTiming {
        if !self.prepared {
            return SessionTiming::default();
        }
        self.player.timing(self.id).unwrap_or_default()
    }

    pub fn get_config(&self) -> Value {
        let mut map = self.base.config();
        self.merge_fields(&mut map, false);
        Value::Object(map)
    }

    pub fn get_status(&self) -> Value {
        let mut map = self.base.status();
        self.merge_fields(&mut map, true);
        Value::Object(map)
    }

    pub fn dump(&self) {
        self.base.dump();
        debug!("Sequence Filename: {}", self.sequence_name);
    }

    fn merge_fields(&self, map: &mut Map<String, Value>, with_total: bool) {
        let timing = self.timing();
        let fields = SequenceFields {
            sequence_name: &self.sequence_name,
            seconds_elapsed: millis_to_whole_seconds(timing.elapsed_ms),
            seconds_remaining: millis_to_whole_seconds(timing.remaining_ms),
            seconds_total: with_total.then(|| millis_to_whole_seconds(timing.total_ms)),
        };
        if let Ok(Value::Object(extra)) = serde_json::to_value(fields) {
            map.extend(extra);
        }
    }

    fn finish(&mut self, outcome: EntryOutcome) {
        self.base.on_finish_play();
        self.prepared = false;
        self.state = LifecycleState::Idle;
        self.last_outcome = Some(outcome);
    }
}

fn hook_result(ok: bool, hook: &'static str, entry: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::HookFailed {
            hook,
            entry: entry.to_string(),
        })
    }
}

impl<B: BaseEntryHooks> Drop for SequenceEntry<B> {
    fn drop(&mut self) {
        if self.prepared {
            warn!(
                "Sequence entry {} dropped while prepared, closing session",
                self.sequence_name
            );
            self.player.close(self.id);
        }
    }
}

impl<B: BaseEntryHooks> PlaylistEntry for SequenceEntry<B> {
    fn id(&self) -> Uuid {
        self.id
    }

    fn kind(&self) -> EntryKind {
        EntryKind::Sequence
    }

    fn name(&self) -> &str {
        &self.sequence_name
    }

    fn can_play(&self) -> bool {
        self.base.can_play()
    }

    fn prepare(&mut self) -> Result<()> {
        SequenceEntry::prepare(self)
    }

    fn start_playing(&mut self) -> Result<()> {
        SequenceEntry::start_playing(self)
    }

    fn process(&mut self) -> Result<()> {
        SequenceEntry::process(self)
    }

    fn stop(&mut self) -> Result<()> {
        SequenceEntry::stop(self)
    }

    fn lifecycle_state(&self) -> LifecycleState {
        self.state
    }

    fn last_outcome(&self) -> Option<EntryOutcome> {
        self.last_outcome
    }

    fn elapsed_ms(&self) -> u64 {
        SequenceEntry::elapsed_ms(self)
    }

    fn length_ms(&mut self) -> u64 {
        self.duration_ms().unwrap_or(0)
    }

    fn timing(&self) -> SessionTiming {
        SequenceEntry::timing(self)
    }

    fn dump(&self) {
        SequenceEntry::dump(self)
    }

    fn get_config(&self) -> Value {
        SequenceEntry::get_config(self)
    }

    fn get_status(&self) -> Value {
        SequenceEntry::get_status(self)
    }
}
