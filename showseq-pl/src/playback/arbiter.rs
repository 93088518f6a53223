//! Single-owner access to the shared playback session
//!
//! The surrounding system has exactly one playback engine. Every entry
//! holds a clone of the same [`PlaybackArbiter`]; the arbiter remembers
//! which entry opened the current session and refuses session operations
//! from anyone else.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;

use super::session::{SequencePlaybackHandle, SessionTiming};
use crate::error::{Error, Result};

struct ArbiterInner {
    handle: Box<dyn SequencePlaybackHandle>,
    owner: Option<Uuid>,
}

/// Shared, owner-checked wrapper around a [`SequencePlaybackHandle`]
#[derive(Clone)]
pub struct PlaybackArbiter {
    inner: Arc<Mutex<ArbiterInner>>,
}

impl PlaybackArbiter {
    pub fn new(handle: impl SequencePlaybackHandle + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ArbiterInner {
                handle: Box::new(handle),
                owner: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ArbiterInner> {
        // Holder bookkeeping stays valid even if a handle call panicked
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entry currently holding the session
    pub fn holder(&self) -> Option<Uuid> {
        self.lock().owner
    }

    /// Open `sequence_name` on behalf of `owner`
    ///
    /// Fails with `SessionBusy` if another entry holds the session. The
    /// owner may reopen its own session.
    pub fn open(&self, owner: Uuid, sequence_name: &str) -> Result<u64> {
        let mut inner = self.lock();
        if let Some(held_by) = inner.owner {
            if held_by != owner {
                warn!(
                    "Entry {} tried to open {} while {} holds the session",
                    owner, sequence_name, held_by
                );
                return Err(Error::SessionBusy { held_by });
            }
        }

        match inner.handle.open(sequence_name) {
            Ok(total_ms) => {
                inner.owner = Some(owner);
                Ok(total_ms)
            }
            Err(e) => {
                inner.handle.close();
                inner.owner = None;
                Err(e)
            }
        }
    }

    /// Start real-time playback of the owner's open session
    pub fn start(&self, owner: Uuid) -> Result<()> {
        let mut inner = self.lock();
        if inner.owner != Some(owner) {
            return Err(Error::SessionNotHeld { owner });
        }
        inner.handle.start()
    }

    /// True while the owner's session is still outputting frames
    pub fn is_running(&self, owner: Uuid) -> bool {
        let inner = self.lock();
        inner.owner == Some(owner) && inner.handle.is_running()
    }

    /// Close the session if `owner` holds it or nobody does
    ///
    /// Idempotent. A session held by another entry is left untouched.
    pub fn close(&self, owner: Uuid) {
        let mut inner = self.lock();
        match inner.owner {
            Some(held_by) if held_by != owner => {
                debug!("Entry {} close ignored, session held by {}", owner, held_by);
            }
            _ => {
                inner.handle.close();
                inner.owner = None;
            }
        }
    }

    /// Live counters of the owner's session
    pub fn timing(&self, owner: Uuid) -> Option<SessionTiming> {
        let inner = self.lock();
        (inner.owner == Some(owner)).then(|| inner.handle.timing())
    }
}
