//! Header-only access to sequence files
//!
//! Reads just the fixed-size header of an FSEQ show file to learn its frame
//! count and step time. Channel data is never touched here; frame decoding
//! belongs to the playback engine.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Bytes of the fixed header prefix needed to compute timing
const HEADER_PREFIX_LEN: usize = 20;

/// Magic for current files
const MAGIC_PSEQ: &[u8; 4] = b"PSEQ";
/// Magic written by older sequencers
const MAGIC_FSEQ: &[u8; 4] = b"FSEQ";

/// Timing fields from a sequence file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceHeader {
    pub major_version: u8,
    pub minor_version: u8,
    /// Offset of the first frame of channel data
    pub channel_data_offset: u16,
    pub channel_count: u32,
    pub frame_count: u32,
    /// Milliseconds per frame
    pub step_time_ms: u8,
}

impl SequenceHeader {
    /// Total runtime of the sequence
    pub fn total_time_ms(&self) -> u64 {
        u64::from(self.frame_count) * u64::from(self.step_time_ms)
    }

    /// Parse the header prefix
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_PREFIX_LEN {
            return Err(malformed(format!(
                "header too short: {} bytes, need {}",
                bytes.len(),
                HEADER_PREFIX_LEN
            )));
        }
        if &bytes[0..4] != MAGIC_PSEQ && &bytes[0..4] != MAGIC_FSEQ {
            return Err(malformed("bad magic".to_string()));
        }

        let major_version = bytes[7];
        if major_version != 1 && major_version != 2 {
            return Err(malformed(format!("unsupported version {}", major_version)));
        }

        Ok(Self {
            major_version,
            minor_version: bytes[6],
            channel_data_offset: u16::from_le_bytes([bytes[4], bytes[5]]),
            channel_count: u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
            frame_count: u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]),
            step_time_ms: bytes[18],
        })
    }
}

fn malformed(reason: String) -> Error {
    Error::MalformedHeader { reason }
}

/// Passive metadata reader for sequence files
///
/// Implementations must not interfere with a live playback session that
/// may have the same file open.
pub trait HeaderReader: Send + Sync {
    /// Read the header of the file at `path`
    ///
    /// Returns `Error::SequenceNotFound` when the file is absent.
    fn read_header(&self, path: &Path) -> Result<SequenceHeader>;
}

/// Reads FSEQ v1/v2 headers from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FseqHeaderReader;

impl HeaderReader for FseqHeaderReader {
    fn read_header(&self, path: &Path) -> Result<SequenceHeader> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::SequenceNotFound { path: path.to_path_buf() });
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let mut buf = [0u8; HEADER_PREFIX_LEN];
        file.read_exact(&mut buf).map_err(|e| Error::Header {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let header = SequenceHeader::parse(&buf)?;

        debug!(
            "Read header of {}: v{}.{}, {} frames @ {}ms",
            path.display(),
            header.major_version,
            header.minor_version,
            header.frame_count,
            header.step_time_ms
        );
        Ok(header)
    }
}

/// Build a minimal v2 header prefix (test fixtures and tooling)
pub fn encode_header_prefix(frame_count: u32, step_time_ms: u8, channel_count: u32) -> Vec<u8> {
    let mut buf = vec![0u8; 32];
    buf[0..4].copy_from_slice(MAGIC_PSEQ);
    buf[4..6].copy_from_slice(&32u16.to_le_bytes());
    buf[6] = 0;
    buf[7] = 2;
    buf[8..10].copy_from_slice(&32u16.to_le_bytes());
    buf[10..14].copy_from_slice(&channel_count.to_le_bytes());
    buf[14..18].copy_from_slice(&frame_count.to_le_bytes());
    buf[18] = step_time_ms;
    buf
}
