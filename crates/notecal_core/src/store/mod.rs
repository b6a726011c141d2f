//! Date-keyed note store.
//!
//! # Responsibility
//! - Own the mapping from `DateKey` to the ordered notes of that day.
//! - Persist the whole mapping after every successful mutation.
//!
//! # Invariants
//! - Every stored bucket is non-empty and holds at most `DAY_CAPACITY` notes.
//! - Insertion order is the storage order; display order is derived elsewhere.
//! - No two notes of one bucket share an id or a timestamp.
//! - A failed save leaves the mutation applied and marks the store dirty.

pub mod codec;

use crate::model::date_key::DateKey;
use crate::model::note::{now_millis, Note, NoteDraft, NoteId, NoteValidationError};
use crate::storage::{MemoryNoteStorage, NoteStorage, StorageError};
use chrono::{DateTime, Duration, Utc};
use codec::DecodeError;
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum number of notes attached to one day.
pub const DAY_CAPACITY: usize = 5;

/// Full store contents, ordered chronologically by day.
pub type NoteMap = BTreeMap<DateKey, Vec<Note>>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure.
#[derive(Debug)]
pub enum StoreError {
    /// Note input was rejected before touching the store.
    Validation(NoteValidationError),
    /// The day already holds `capacity` notes.
    CapacityExceeded { date_key: DateKey, capacity: usize },
    /// Target day (and note, when given) does not exist.
    NotFound {
        date_key: DateKey,
        note_id: Option<NoteId>,
    },
    /// Mutation applied in memory but the save did not complete.
    PersistenceFailure(StorageError),
    /// Storage could not be read while opening the store.
    Storage(StorageError),
    /// Persisted payload is corrupt.
    Decode(DecodeError),
    /// No free millisecond is left after the requested instant on this day.
    TimestampOutOfRange { date_key: DateKey },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CapacityExceeded { date_key, capacity } => {
                write!(f, "date {date_key} already holds {capacity} notes")
            }
            Self::NotFound {
                date_key,
                note_id: Some(note_id),
            } => write!(f, "note {note_id} not found on {date_key}"),
            Self::NotFound {
                date_key,
                note_id: None,
            } => write!(f, "no notes on {date_key}"),
            Self::PersistenceFailure(err) => {
                write!(f, "change applied but not saved, it may be lost on restart: {err}")
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::TimestampOutOfRange { date_key } => {
                write!(f, "no representable timestamp left for a note on {date_key}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::PersistenceFailure(err) | Self::Storage(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::CapacityExceeded { .. }
            | Self::NotFound { .. }
            | Self::TimestampOutOfRange { .. } => None,
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DecodeError> for StoreError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

/// Process-lifetime note store backed by a `NoteStorage`.
pub struct NoteStore<S: NoteStorage> {
    notes: NoteMap,
    storage: S,
    dirty: bool,
}

impl NoteStore<MemoryNoteStorage> {
    /// Creates an empty store that persists to an in-process slot.
    pub fn in_memory() -> Self {
        Self {
            notes: NoteMap::new(),
            storage: MemoryNoteStorage::new(),
            dirty: false,
        }
    }
}

impl<S: NoteStorage> NoteStore<S> {
    /// Hydrates a store from `storage`; starts empty when nothing was saved.
    ///
    /// Notes saved without an id get one here and the store starts dirty, so
    /// the next `flush` or mutation writes the ids back.
    ///
    /// # Errors
    /// - `Storage` when the backend cannot be read.
    /// - `Decode` when the saved payload violates store invariants.
    pub fn open(storage: S) -> StoreResult<Self> {
        let payload = storage.load().map_err(|err| {
            error!("event=store_open module=store status=error error_code=load_failed error={err}");
            StoreError::Storage(err)
        })?;

        let (notes, assigned_ids) = match payload {
            Some(payload) => {
                let decoded = codec::decode(&payload).map_err(|err| {
                    error!(
                        "event=store_open module=store status=error error_code=decode_failed error={err}"
                    );
                    err
                })?;
                (decoded.notes, decoded.assigned_ids)
            }
            None => (NoteMap::new(), 0),
        };

        info!(
            "event=store_open module=store status=ok days={} notes={} assigned_ids={assigned_ids}",
            notes.len(),
            notes.values().map(Vec::len).sum::<usize>()
        );
        // Freshly assigned ids are only stable once saved.
        Ok(Self {
            notes,
            storage,
            dirty: assigned_ids > 0,
        })
    }

    /// Appends a note to `date_key`, stamped with the current instant.
    ///
    /// # Errors
    /// - `Validation` for blank text, missing priority or unknown subject.
    /// - `CapacityExceeded` when the day is full; nothing changes.
    /// - `TimestampOutOfRange` when no free instant is left; nothing changes.
    /// - `PersistenceFailure` when the save fails; the note stays added.
    pub fn add(&mut self, date_key: DateKey, draft: &NoteDraft) -> StoreResult<Note> {
        self.add_with_timestamp(date_key, draft, now_millis())
    }

    /// Appends a note stamped at a caller-provided instant.
    ///
    /// Used by import paths that already know when a note was written. The
    /// instant is moved forward by whole milliseconds while it collides with
    /// another note of the same day.
    pub fn add_with_timestamp(
        &mut self,
        date_key: DateKey,
        draft: &NoteDraft,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<Note> {
        let valid = draft.validate()?;
        if self.note_count(date_key) >= DAY_CAPACITY {
            warn!(
                "event=note_add module=store status=rejected reason=capacity date_key={date_key}"
            );
            return Err(StoreError::CapacityExceeded {
                date_key,
                capacity: DAY_CAPACITY,
            });
        }

        let mut timestamp = timestamp;
        while self.get(date_key).iter().any(|note| note.timestamp == timestamp) {
            timestamp = timestamp
                .checked_add_signed(Duration::milliseconds(1))
                .ok_or_else(|| {
                    warn!(
                        "event=note_add module=store status=rejected reason=timestamp_range date_key={date_key}"
                    );
                    StoreError::TimestampOutOfRange { date_key }
                })?;
        }
        let bucket = self.notes.entry(date_key).or_default();
        let note = Note::create(valid, timestamp);
        bucket.push(note.clone());

        info!(
            "event=note_add module=store status=ok date_key={date_key} note_id={} count={}",
            note.id,
            bucket.len()
        );
        self.persist()?;
        Ok(note)
    }

    /// Removes one note; drops the day entry when it becomes empty.
    ///
    /// # Errors
    /// - `NotFound` when the day or note does not exist; nothing changes.
    /// - `PersistenceFailure` when the save fails; the note stays removed.
    pub fn delete(&mut self, date_key: DateKey, note_id: NoteId) -> StoreResult<Note> {
        let not_found = StoreError::NotFound {
            date_key,
            note_id: Some(note_id),
        };
        let Some(bucket) = self.notes.get_mut(&date_key) else {
            return Err(not_found);
        };
        let Some(position) = bucket.iter().position(|note| note.id == note_id) else {
            return Err(not_found);
        };

        let removed = bucket.remove(position);
        let remaining = bucket.len();
        if remaining == 0 {
            self.notes.remove(&date_key);
        }

        info!(
            "event=note_delete module=store status=ok date_key={date_key} note_id={note_id} remaining={remaining}"
        );
        self.persist()?;
        Ok(removed)
    }

    /// Removes every note of `date_key`.
    ///
    /// # Errors
    /// - `NotFound` when the day holds no notes.
    /// - `PersistenceFailure` when the save fails; the day stays cleared.
    pub fn clear_date(&mut self, date_key: DateKey) -> StoreResult<Vec<Note>> {
        let removed = self.notes.remove(&date_key).ok_or(StoreError::NotFound {
            date_key,
            note_id: None,
        })?;

        info!(
            "event=date_clear module=store status=ok date_key={date_key} removed={}",
            removed.len()
        );
        self.persist()?;
        Ok(removed)
    }

    /// Notes of `date_key` in storage order; empty when the day has none.
    pub fn get(&self, date_key: DateKey) -> &[Note] {
        self.notes.get(&date_key).map_or(&[][..], Vec::as_slice)
    }

    pub fn note_count(&self, date_key: DateKey) -> usize {
        self.get(date_key).len()
    }

    /// How many more notes `date_key` accepts.
    pub fn remaining_capacity(&self, date_key: DateKey) -> usize {
        DAY_CAPACITY.saturating_sub(self.note_count(date_key))
    }

    pub fn is_full(&self, date_key: DateKey) -> bool {
        self.remaining_capacity(date_key) == 0
    }

    /// Days holding at least one note, chronologically.
    pub fn dates(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.notes.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Read-only view of the whole store for derived views.
    pub fn snapshot(&self) -> &NoteMap {
        &self.notes
    }

    /// Whether in-memory state has changes the last save did not record.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Retries persisting when the store is dirty; no-op otherwise.
    pub fn flush(&mut self) -> StoreResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> StoreResult<()> {
        let result = codec::encode(&self.notes)
            .map_err(StorageError::from)
            .and_then(|payload| self.storage.save(&payload));

        match result {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                self.dirty = true;
                error!(
                    "event=store_persist module=store status=error error_code=save_failed error={err}"
                );
                Err(StoreError::PersistenceFailure(err))
            }
        }
    }
}
