//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve the database path and logging settings for core callers.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - `log_level` is always one of `trace|debug|info|warn|error`.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Path of the SQLite agenda database.
pub const DB_PATH_ENV: &str = "AGENDA_DB_PATH";
/// Log level (`trace|debug|info|warn|error`).
pub const LOG_LEVEL_ENV: &str = "AGENDA_LOG_LEVEL";
/// Absolute directory for rolling log files; logging stays off when unset.
pub const LOG_DIR_ENV: &str = "AGENDA_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "agenda.sqlite3";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => write!(
                f,
                "{LOG_LEVEL_ENV}=`{value}` is not one of trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(value) => {
                write!(f, "{LOG_DIR_ENV}=`{value}` must be an absolute path")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AgendaConfig {
    /// Reads configuration from `AGENDA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level =
                normalize_level(&level).map_err(|_| ConfigError::InvalidLogLevel(level))?;
        }

        if let Some(dir) = read(LOG_DIR_ENV) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir));
            }
            config.log_dir = Some(path);
        }

        Ok(config)
    }
}
