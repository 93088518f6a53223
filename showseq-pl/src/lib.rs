//! # Show Sequencer Playlist Library (showseq-pl)
//!
//! Playlist entry controller for sequence show files.
//!
//! **Purpose:** Drive a sequence entry through prepare → play → monitor →
//! stop while a separate engine streams the frames, publish status on every
//! visible transition, and resolve durations from file headers.
//!
//! **Architecture:** entries hold a [`playback::PlaybackArbiter`] onto the
//! single shared session; a [`runner::EntryRunner`] ticks the active entry.

pub mod config;
pub mod entry;
pub mod error;
pub mod fseq;
pub mod playback;
pub mod runner;
pub mod status;

pub use entry::{bind_entry, EntryContext, PlaylistEntry, SequenceEntry};
pub use error::{Error, Result};
