//! Timing-only playback engine
//!
//! Opens sequences by reading their header and derives the live counters
//! from a clock. No frame data is output; this drives the lifecycle when
//! no hardware engine is attached.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::session::{SequencePlaybackHandle, SessionTiming};
use crate::error::{Error, Result};
use crate::fseq::HeaderReader;

#[derive(Debug)]
struct OpenSession {
    name: String,
    total_ms: u64,
    /// Clock reading at start; None until started
    started_at: Option<u64>,
}

/// Clock-driven [`SequencePlaybackHandle`]
pub struct TimedSequencePlayer<C: Clock = SystemClock> {
    sequence_dir: PathBuf,
    reader: Arc<dyn HeaderReader>,
    clock: C,
    session: Option<OpenSession>,
}

impl TimedSequencePlayer<SystemClock> {
    pub fn new(sequence_dir: impl Into<PathBuf>, reader: Arc<dyn HeaderReader>) -> Self {
        Self::with_clock(sequence_dir, reader, SystemClock::new())
    }
}

impl<C: Clock> TimedSequencePlayer<C> {
    pub fn with_clock(
        sequence_dir: impl Into<PathBuf>,
        reader: Arc<dyn HeaderReader>,
        clock: C,
    ) -> Self {
        Self {
            sequence_dir: sequence_dir.into(),
            reader,
            clock,
            session: None,
        }
    }

    /// Name of the open sequence, if any
    pub fn open_sequence(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.name.as_str())
    }

    fn elapsed_ms(&self, session: &OpenSession) -> u64 {
        match session.started_at {
            Some(start) => self
                .clock
                .now_ms()
                .saturating_sub(start)
                .min(session.total_ms),
            None => 0,
        }
    }
}

impl<C: Clock> SequencePlaybackHandle for TimedSequencePlayer<C> {
    fn open(&mut self, sequence_name: &str) -> Result<u64> {
        if self.session.is_some() {
            // Opening a new file replaces whatever was open
            self.close();
        }

        let path = self.sequence_dir.join(sequence_name);
        let header = self.reader.read_header(&path)?;
        let total_ms = header.total_time_ms();

        debug!("Opened sequence {} ({}ms)", sequence_name, total_ms);
        self.session = Some(OpenSession {
            name: sequence_name.to_string(),
            total_ms,
            started_at: None,
        });
        Ok(total_ms)
    }

    fn start(&mut self) -> Result<()> {
        let now = self.clock.now_ms();
        let session = self.session.as_mut().ok_or(Error::NoOpenSession)?;
        if session.started_at.is_none() {
            session.started_at = Some(now);
            info!("Sequence {} running", session.name);
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        match &self.session {
            // Opened but not yet started still holds the file
            Some(session) if session.started_at.is_none() => true,
            Some(session) => self.elapsed_ms(session) < session.total_ms,
            None => false,
        }
    }

    fn close(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("Closed sequence {}", session.name);
        }
    }

    fn timing(&self) -> SessionTiming {
        match &self.session {
            Some(session) => {
                let elapsed_ms = self.elapsed_ms(session);
                SessionTiming {
                    elapsed_ms,
                    remaining_ms: session.total_ms - elapsed_ms,
                    total_ms: session.total_ms,
                }
            }
            None => SessionTiming::default(),
        }
    }
}
