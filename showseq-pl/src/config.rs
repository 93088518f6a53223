//! showseq-pl specific configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use showseq_common::config::{resolve_sequence_dir, TomlConfig, SEQUENCE_DIR_ENV};
use showseq_common::time::millis_to_duration;

/// Playlist player configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub sequence_dir: PathBuf,
    pub status_topic_prefix: String,
    pub tick_interval: Duration,
    pub progress_interval: Duration,
}

impl Config {
    /// Combine the bootstrap TOML with command-line overrides
    pub fn resolve(toml_config: &TomlConfig, cli_sequence_dir: Option<&Path>) -> Self {
        Self {
            sequence_dir: resolve_sequence_dir(cli_sequence_dir, SEQUENCE_DIR_ENV, toml_config),
            status_topic_prefix: toml_config.status_topic_prefix.clone(),
            tick_interval: millis_to_duration(toml_config.tick_interval_ms),
            progress_interval: millis_to_duration(toml_config.progress_interval_ms),
        }
    }
}
