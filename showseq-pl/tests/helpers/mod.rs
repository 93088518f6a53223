//! Test helper modules for showseq-pl integration tests
//!
//! Provides reusable test infrastructure components:
//! - MockPlayback: scripted playback session
//! - SequenceFixtures: sequence files on disk
//! - CountingHeaderReader / RecordingPublisher: call-recording collaborators
//! - Harness: an EntryContext wired to all of the above

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_playback;

pub use fixtures::SequenceFixtures;
pub use mock_playback::MockPlayback;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use showseq_pl::entry::{EntryContext, SequenceEntry};
use showseq_pl::error::Result;
use showseq_pl::fseq::{FseqHeaderReader, HeaderReader, SequenceHeader};
use showseq_pl::playback::PlaybackArbiter;
use showseq_pl::status::StatusPublisher;

pub const STATUS_TOPIC: &str = "playlist/sequence/status";

/// Header reader that counts how often it is consulted
#[derive(Default)]
pub struct CountingHeaderReader {
    calls: AtomicUsize,
}

impl CountingHeaderReader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HeaderReader for CountingHeaderReader {
    fn read_header(&self, path: &Path) -> Result<SequenceHeader> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FseqHeaderReader.read_header(path)
    }
}

/// Publisher that keeps every message
#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.messages().into_iter().map(|(_, payload)| payload).collect()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

impl StatusPublisher for RecordingPublisher {
    fn publish(&self, topic: &str, payload: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
    }
}

/// Entry context wired to mock collaborators
pub struct Harness {
    pub fixtures: SequenceFixtures,
    pub playback: MockPlayback,
    pub reader: Arc<CountingHeaderReader>,
    pub publisher: Arc<RecordingPublisher>,
    pub ctx: EntryContext,
}

impl Harness {
    /// `files` are the sequences the mock session can open
    pub fn new(files: &[(&str, u64)]) -> Self {
        let fixtures = SequenceFixtures::new().expect("Failed to create fixtures");
        let playback = files
            .iter()
            .fold(MockPlayback::new(), |p, (name, ms)| p.with_file(name, *ms));
        let reader = Arc::new(CountingHeaderReader::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let ctx = EntryContext::new(
            PlaybackArbiter::new(playback.clone()),
            reader.clone(),
            publisher.clone(),
            fixtures.dir(),
            "playlist",
        );
        Self {
            fixtures,
            playback,
            reader,
            publisher,
            ctx,
        }
    }

    pub fn entry(&self, sequence_name: &str) -> SequenceEntry {
        SequenceEntry::bind(
            &json!({ "type": "sequence", "sequenceName": sequence_name }),
            &self.ctx,
        )
        .expect("Failed to bind entry")
    }
}
