//! On-disk sequence fixtures
//!
//! Builds valid, corrupted and missing sequence files in a temporary
//! folder for header reader and entry tests.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use showseq_pl::fseq::encode_header_prefix;

/// Result type for fixture operations
pub type FixtureResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Temporary sequence folder
pub struct SequenceFixtures {
    temp_dir: TempDir,
}

impl SequenceFixtures {
    pub fn new() -> FixtureResult<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Path of the sequence folder
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write a valid sequence lasting `frames * step_ms` milliseconds
    pub fn sequence(&self, name: &str, frames: u32, step_ms: u8) -> FixtureResult<PathBuf> {
        let path = self.file_path(name);
        let mut file = fs::File::create(&path)?;
        file.write_all(&encode_header_prefix(frames, step_ms, 512))?;
        // A little channel data after the header
        file.write_all(&[0u8; 512])?;
        Ok(path)
    }

    /// Write a file whose header is garbage
    pub fn corrupted_sequence(&self, name: &str) -> FixtureResult<PathBuf> {
        let path = self.file_path(name);
        let mut file = fs::File::create(&path)?;
        file.write_all(b"PSEQ")?;
        file.write_all(&[0xFF; 4])?;
        Ok(path)
    }
}
