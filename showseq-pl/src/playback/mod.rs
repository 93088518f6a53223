//! Playback session contract and its implementations
//!
//! The entry controller never talks to a session directly. It goes through
//! [`PlaybackArbiter`], which owns the single process-wide session and
//! records which entry currently holds it.

pub mod arbiter;
pub mod clock;
pub mod session;
pub mod timed_player;

pub use arbiter::PlaybackArbiter;
pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{SequencePlaybackHandle, SessionTiming};
pub use timed_player::TimedSequencePlayer;
