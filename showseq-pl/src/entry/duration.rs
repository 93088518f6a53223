//! Lazily resolved sequence duration

use std::path::Path;

use tracing::{debug, warn};

use crate::fseq::HeaderReader;

/// Cached total runtime of a sequence
///
/// `None` means unknown. A zero-length sequence is `Some(0)` and is never
/// looked up again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationCache {
    value: Option<u64>,
}

impl DurationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value without any lookup
    pub fn get(&self) -> Option<u64> {
        self.value
    }

    /// Store the duration reported by a live session
    ///
    /// The live value always wins over a header-derived one.
    pub fn record_live(&mut self, total_ms: u64) {
        if self.value != Some(total_ms) {
            debug!("Duration from live session: {}ms (was {:?})", total_ms, self.value);
        }
        self.value = Some(total_ms);
    }

    /// Return the cached duration, reading the file header if unknown
    ///
    /// Checks the file exists first, then reads only its header. A missing
    /// or unreadable file leaves the duration unknown.
    pub fn resolve(&mut self, path: &Path, reader: &dyn HeaderReader) -> Option<u64> {
        if self.value.is_some() {
            return self.value;
        }

        if !path.exists() {
            debug!("Sequence {} not on disk, duration unknown", path.display());
            return None;
        }

        match reader.read_header(path) {
            Ok(header) => {
                let total_ms = header.total_time_ms();
                self.value = Some(total_ms);
                Some(total_ms)
            }
            Err(e) => {
                warn!("Unable to read duration of {}: {}", path.display(), e);
                None
            }
        }
    }
}
