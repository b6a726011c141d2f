//! Durable key-value storage for the serialized note store.
//!
//! # Responsibility
//! - Define the load/save contract the note store persists through.
//! - Keep backend details (SQLite, memory) behind that contract.
//!
//! # Invariants
//! - `save` replaces the whole payload; there is no incremental write.
//! - `load` returns `None` when nothing was ever saved.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryNoteStorage;
pub use sqlite::SqliteNoteStorage;

/// Storage key used by the calendar widget.
pub const DEFAULT_STORAGE_KEY: &str = "calendarNotes2026";

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend failure while reading or writing the payload.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    /// Payload could not be serialized.
    Serialize(serde_json::Error),
    /// Failure reported by a backend without a richer error type.
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "storage table `{table}` is missing; run migrations first")
            }
            Self::Serialize(err) => write!(f, "failed to serialize notes: {err}"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract consumed by `NoteStore`.
pub trait NoteStorage {
    /// Returns the last saved payload, if any.
    fn load(&self) -> StorageResult<Option<String>>;
    /// Replaces the saved payload.
    fn save(&mut self, payload: &str) -> StorageResult<()>;
}

impl<S: NoteStorage + ?Sized> NoteStorage for Box<S> {
    fn load(&self) -> StorageResult<Option<String>> {
        (**self).load()
    }

    fn save(&mut self, payload: &str) -> StorageResult<()> {
        (**self).save(payload)
    }
}
