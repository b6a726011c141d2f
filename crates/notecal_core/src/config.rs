//! Core configuration and store bootstrap.
//!
//! # Responsibility
//! - Describe where notes are stored and how the core logs.
//! - Wire logging, SQLite and hydration into one `open_store` call.
//!
//! # Invariants
//! - Missing JSON fields fall back to defaults.
//! - A config is validated before any side effect happens.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::{default_log_level, init_logging, parse_level};
use crate::storage::{SqliteNoteStorage, StorageError, DEFAULT_STORAGE_KEY};
use crate::store::{NoteStore, StoreError};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Runtime configuration of the note core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite file; `None` keeps notes in an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Key the serialized store is saved under.
    pub storage_key: String,
    pub log_level: String,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key cannot be empty".to_string()));
        }
        parse_level(&self.log_level).map_err(ConfigError::Invalid)?;
        if let Some(dir) = self.log_dir.as_deref() {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Failure while bringing up the note store.
#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Storage(StorageError),
    Store(StoreError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for BootstrapError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StorageError> for BootstrapError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<StoreError> for BootstrapError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Opens the SQLite-backed store described by `config`.
///
/// # Side effects
/// - Starts file logging when `log_dir` is set.
/// - Creates the database file and applies migrations.
pub fn open_store(config: &CoreConfig) -> Result<NoteStore<SqliteNoteStorage>, BootstrapError> {
    config.validate()?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).map_err(BootstrapError::Logging)?;
    }

    let conn = match config.db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let storage = SqliteNoteStorage::try_new(conn, config.storage_key.as_str())?;
    let store = NoteStore::open(storage)?;

    info!(
        "event=core_bootstrap module=config status=ok storage_key={} persistent={}",
        config.storage_key,
        config.db_path.is_some()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use crate::storage::DEFAULT_STORAGE_KEY;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = CoreConfig::from_json_str(r#"{"db_path": "/tmp/notes.db"}"#).unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.log_dir, None);
        assert_eq!(
            config.db_path.as_deref(),
            Some(std::path::Path::new("/tmp/notes.db"))
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CoreConfig::from_json_str(r#"{"log_level": "loud"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_json_str(r#"{"log_dir": "relative/logs"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_json_str(r#"{"storage_key": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
