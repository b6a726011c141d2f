//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record attached to one calendar day.
//! - Validate raw form input before it reaches the store.
//!
//! # Invariants
//! - `id` is stable and never reused for another note. Notes stored before
//!   ids existed get one assigned when the store is opened; it stays stable
//!   once the store is saved.
//! - `text` is trimmed and non-empty.
//! - `subject` is empty or a catalog key when created through a draft.
//! - `timestamp` is UTC with millisecond precision.

use crate::model::catalog::{is_known_subject, Priority};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Validation failure for note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Text is empty after trimming.
    EmptyText,
    /// No priority was selected.
    MissingPriority,
    /// Priority value is not one of `low|medium|high`.
    InvalidPriority(String),
    /// Subject is not part of the fixed catalog.
    UnknownSubject(String),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "note text must not be empty"),
            Self::MissingPriority => write!(f, "note priority must be selected"),
            Self::InvalidPriority(value) => write!(f, "invalid note priority: `{value}`"),
            Self::UnknownSubject(value) => write!(f, "unknown note subject: `{value}`"),
        }
    }
}

impl Error for NoteValidationError {}

/// One annotated entry attached to a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Deletion identity.
    pub id: NoteId,
    pub text: String,
    /// Catalog key, or empty when no subject was chosen.
    #[serde(default)]
    pub subject: String,
    /// Absent only for legacy or hand-edited data.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_priority_lenient"
    )]
    pub priority: Option<Priority>,
    pub timestamp: DateTime<Utc>,
}

impl Note {
    /// Creates a note with a generated id, stamped at `timestamp`.
    pub(crate) fn create(draft: ValidDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: draft.text,
            subject: draft.subject,
            priority: Some(draft.priority),
            timestamp,
        }
    }

    /// Subject key, or `None` when empty.
    pub fn subject(&self) -> Option<&str> {
        if self.subject.is_empty() {
            None
        } else {
            Some(self.subject.as_str())
        }
    }
}

/// Current instant at the precision notes are stored with.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn deserialize_priority_lenient<'de, D>(
    deserializer: D,
) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Unvalidated note input, as submitted by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub text: String,
    pub subject: Option<String>,
    pub priority: Option<Priority>,
}

impl NoteDraft {
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            subject: None,
            priority: Some(priority),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Builds a draft from raw form field values.
    ///
    /// Empty `subject` means no subject; empty `priority` means nothing was
    /// selected.
    pub fn from_form(
        text: &str,
        subject: &str,
        priority: &str,
    ) -> Result<Self, NoteValidationError> {
        if text.trim().is_empty() {
            return Err(NoteValidationError::EmptyText);
        }
        let priority = match priority.trim() {
            "" => return Err(NoteValidationError::MissingPriority),
            value => value
                .parse::<Priority>()
                .map_err(|_| NoteValidationError::InvalidPriority(value.to_string()))?,
        };
        let subject = match subject.trim() {
            "" => None,
            value => Some(value.to_string()),
        };
        let draft = Self {
            text: text.to_string(),
            subject,
            priority: Some(priority),
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Checks the draft and returns its normalized form.
    pub fn validate(&self) -> Result<ValidDraft, NoteValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(NoteValidationError::EmptyText);
        }
        let priority = self.priority.ok_or(NoteValidationError::MissingPriority)?;
        let subject = self
            .subject
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if !subject.is_empty() && !is_known_subject(subject) {
            return Err(NoteValidationError::UnknownSubject(subject.to_string()));
        }

        Ok(ValidDraft {
            text: text.to_string(),
            subject: subject.to_string(),
            priority,
        })
    }
}

/// Normalized note input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    text: String,
    subject: String,
    priority: Priority,
}
