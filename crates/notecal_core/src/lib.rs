//! Core domain logic for the notes calendar.
//! This crate is the single source of truth for note invariants; views
//! (calendar grid, forms, charts) call into it and render its outputs.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::{open_store, BootstrapError, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{
    is_known_subject, priority_label, priority_rank, subject_label, Priority, SUBJECTS,
};
pub use model::date_key::{DateKey, DateKeyError, MonthKey};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError};
pub use ordering::{sort_for_display, SortPolicy};
pub use stats::{compute as compute_stats, StatsSnapshot, TOP_SUBJECTS_LIMIT};
pub use storage::{
    MemoryNoteStorage, NoteStorage, SqliteNoteStorage, StorageError, StorageResult,
    DEFAULT_STORAGE_KEY,
};
pub use store::codec::DecodeError;
pub use store::{NoteMap, NoteStore, StoreError, StoreResult, DAY_CAPACITY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
