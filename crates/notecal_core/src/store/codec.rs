//! Serialized form of the whole note store.
//!
//! # Responsibility
//! - Encode the date-keyed note map as one JSON object.
//! - Decode persisted blobs and reject state that breaks store invariants.
//!
//! # Invariants
//! - Decoded buckets are non-empty, within capacity, and free of duplicate
//!   ids or timestamps.
//! - Empty buckets in a blob are dropped, not rejected.
//! - Notes stored without an `id` get a fresh one, and the count of such
//!   notes is reported so the caller can save the assigned ids.

use crate::model::catalog::Priority;
use crate::model::date_key::{DateKey, DateKeyError};
use crate::model::note::{deserialize_priority_lenient, Note, NoteId};
use crate::store::{NoteMap, DAY_CAPACITY};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted blob does not describe a valid note store.
#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    InvalidDateKey {
        key: String,
        source: DateKeyError,
    },
    OverCapacity {
        date_key: DateKey,
        len: usize,
    },
    BlankText {
        date_key: DateKey,
    },
    DuplicateNote {
        date_key: DateKey,
        detail: String,
    },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed notes payload: {err}"),
            Self::InvalidDateKey { key, source } => {
                write!(f, "invalid date key `{key}` in notes payload: {source}")
            }
            Self::OverCapacity { date_key, len } => write!(
                f,
                "date {date_key} holds {len} notes, more than the limit of {DAY_CAPACITY}"
            ),
            Self::BlankText { date_key } => write!(f, "date {date_key} holds a note without text"),
            Self::DuplicateNote { date_key, detail } => {
                write!(f, "date {date_key} holds duplicate notes: {detail}")
            }
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidDateKey { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Persisted note shape; `id` is absent in blobs written before ids existed.
#[derive(Debug, Deserialize)]
struct StoredNote {
    #[serde(default)]
    id: Option<NoteId>,
    text: String,
    #[serde(default)]
    subject: String,
    #[serde(default, deserialize_with = "deserialize_priority_lenient")]
    priority: Option<Priority>,
    timestamp: DateTime<Utc>,
}

impl StoredNote {
    fn into_note(self, assigned_ids: &mut usize) -> Note {
        let id = self.id.unwrap_or_else(|| {
            *assigned_ids += 1;
            NoteId::new_v4()
        });
        Note {
            id,
            text: self.text,
            subject: self.subject,
            priority: self.priority,
            timestamp: self.timestamp,
        }
    }
}

/// Result of decoding a persisted blob.
#[derive(Debug)]
pub struct Decoded {
    pub notes: NoteMap,
    /// Notes that had no stored id and received a new one.
    pub assigned_ids: usize,
}

/// Serializes the whole store.
pub fn encode(notes: &NoteMap) -> Result<String, serde_json::Error> {
    serde_json::to_string(notes)
}

/// Parses a persisted blob into a validated note map.
pub fn decode(payload: &str) -> Result<Decoded, DecodeError> {
    let raw: BTreeMap<String, Vec<StoredNote>> = serde_json::from_str(payload)?;
    let mut notes = NoteMap::new();
    let mut assigned_ids = 0;

    for (key, bucket) in raw {
        let date_key = key
            .parse::<DateKey>()
            .map_err(|source| DecodeError::InvalidDateKey {
                key: key.clone(),
                source,
            })?;

        if bucket.is_empty() {
            warn!("event=store_decode module=store status=skip reason=empty_bucket date_key={date_key}");
            continue;
        }
        let bucket = bucket
            .into_iter()
            .map(|stored| stored.into_note(&mut assigned_ids))
            .collect::<Vec<_>>();
        validate_bucket(date_key, &bucket)?;
        notes.insert(date_key, bucket);
    }

    Ok(Decoded {
        notes,
        assigned_ids,
    })
}

fn validate_bucket(date_key: DateKey, bucket: &[Note]) -> Result<(), DecodeError> {
    if bucket.len() > DAY_CAPACITY {
        return Err(DecodeError::OverCapacity {
            date_key,
            len: bucket.len(),
        });
    }

    let mut ids = HashSet::new();
    let mut timestamps = HashSet::new();
    for note in bucket {
        if note.text.trim().is_empty() {
            return Err(DecodeError::BlankText { date_key });
        }
        if !ids.insert(note.id) {
            return Err(DecodeError::DuplicateNote {
                date_key,
                detail: format!("id {}", note.id),
            });
        }
        if !timestamps.insert(note.timestamp) {
            return Err(DecodeError::DuplicateNote {
                date_key,
                detail: format!("timestamp {}", note.timestamp.to_rfc3339()),
            });
        }
    }

    Ok(())
}
