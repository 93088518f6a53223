//! Bootstrap configuration loading and sequence folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the sequence folder
pub const SEQUENCE_DIR_ENV: &str = "SHOWSEQ_SEQUENCE_DIR";

/// Bootstrap configuration loaded from TOML
///
/// Every field has a built-in default, so an empty file is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Folder holding sequence files
    #[serde(default)]
    pub sequence_dir: Option<PathBuf>,

    /// Prefix for status topics (`{prefix}/sequence/status`)
    #[serde(default = "default_status_topic_prefix")]
    pub status_topic_prefix: String,

    /// Scheduler tick interval in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Progress event interval in milliseconds
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            sequence_dir: None,
            status_topic_prefix: default_status_topic_prefix(),
            tick_interval_ms: default_tick_interval_ms(),
            progress_interval_ms: default_progress_interval_ms(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_status_topic_prefix() -> String {
    "playlist".to_string()
}

fn default_tick_interval_ms() -> u64 {
    25
}

fn default_progress_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        if config.tick_interval_ms == 0 || config.progress_interval_ms == 0 {
            return Err(Error::Config(
                "tick_interval_ms and progress_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, degrading to defaults when no file is available
    ///
    /// An explicit path that cannot be read is an error. A missing platform
    /// config file is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => {
                warn!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Sequence folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_sequence_dir(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.sequence_dir {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_sequence_dir()
}

/// Platform config file location (`<config dir>/showseq/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("showseq").join("config.toml"))
}

/// OS-dependent default sequence folder
pub fn default_sequence_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("showseq").join("sequences"))
        .unwrap_or_else(|| PathBuf::from("./showseq_data/sequences"))
}
