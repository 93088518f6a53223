//! Common error types for the show sequencer

use thiserror::Error;

/// Common result type for show sequencer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the show sequencer crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
