//! Scripted playback session for entry tests
//!
//! Clones share state, so a test keeps one clone to drive and inspect
//! the session while the arbiter owns the other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use showseq_pl::error::{Error, Result};
use showseq_pl::playback::{SequencePlaybackHandle, SessionTiming};

#[derive(Debug, Default)]
pub struct MockState {
    /// Sequences the session can open, with their durations
    pub files: HashMap<String, u64>,
    pub open: Option<String>,
    pub started: bool,
    pub running: bool,
    pub elapsed_ms: u64,
    pub open_calls: usize,
    pub start_calls: usize,
    pub close_calls: usize,
}

#[derive(Clone, Default)]
pub struct MockPlayback {
    state: Arc<Mutex<MockState>>,
}

impl MockPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, name: &str, total_ms: u64) -> Self {
        self.state().files.insert(name.to_string(), total_ms);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Simulate the engine reaching (or leaving) end of file
    pub fn set_running(&self, running: bool) {
        self.state().running = running;
    }

    pub fn set_elapsed(&self, elapsed_ms: u64) {
        self.state().elapsed_ms = elapsed_ms;
    }
}

impl SequencePlaybackHandle for MockPlayback {
    fn open(&mut self, sequence_name: &str) -> Result<u64> {
        let mut state = self.state();
        state.open_calls += 1;
        match state.files.get(sequence_name).copied() {
            Some(total_ms) => {
                state.open = Some(sequence_name.to_string());
                state.started = false;
                state.running = true;
                state.elapsed_ms = 0;
                Ok(total_ms)
            }
            None => Err(Error::SequenceNotFound {
                path: sequence_name.into(),
            }),
        }
    }

    fn start(&mut self) -> Result<()> {
        let mut state = self.state();
        state.start_calls += 1;
        if state.open.is_none() {
            return Err(Error::NoOpenSession);
        }
        state.started = true;
        Ok(())
    }

    fn is_running(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.open.is_some() && state.running
    }

    fn close(&mut self) {
        let mut state = self.state();
        state.close_calls += 1;
        state.open = None;
        state.started = false;
        state.running = false;
    }

    fn timing(&self) -> SessionTiming {
        let state = self.state.lock().unwrap();
        match state.open.as_ref().and_then(|name| state.files.get(name)) {
            Some(&total_ms) => SessionTiming {
                elapsed_ms: state.elapsed_ms,
                remaining_ms: total_ms.saturating_sub(state.elapsed_ms),
                total_ms,
            },
            None => SessionTiming::default(),
        }
    }
}
