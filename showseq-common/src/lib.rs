//! # Show Sequencer Common Library
//!
//! Shared code for the show-sequencing services including:
//! - Event types (ShowEvent enum) and the EventBus
//! - Bootstrap configuration loading
//! - Error types
//! - Time helpers

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
