//! Fixed priority levels, subject catalog and their display labels.
//!
//! # Invariants
//! - Subject keys are the persisted values; labels are display-only.
//! - Priority rank is used for ordering only and never rewrites a note.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Note priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Wire value (`low|medium|high`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Display rank: high=3, medium=2, low=1.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Низкий",
            Self::Medium => "Средний",
            Self::High => "Высокий",
        }
    }
}

/// Rank for a possibly absent priority; absent ranks as medium.
pub fn priority_rank(priority: Option<Priority>) -> u8 {
    priority.unwrap_or(Priority::Medium).rank()
}

/// Label for a possibly absent priority; absent displays as medium.
pub fn priority_label(priority: Option<Priority>) -> &'static str {
    priority.unwrap_or(Priority::Medium).label()
}

/// Error returned when a priority string is not one of `low|medium|high`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

/// Subject catalog: persisted key and display label.
pub const SUBJECTS: &[(&str, &str)] = &[
    ("русский", "Русский язык"),
    ("литература", "Литература"),
    ("история", "История"),
    ("математика", "Математика"),
    ("информатика", "Информатика"),
    ("биология", "Биология"),
    ("физика", "Физика"),
    ("химия", "Химия"),
    ("география", "География"),
    ("обществознание", "Обществознание"),
];

/// Returns whether `key` is a catalog subject.
pub fn is_known_subject(key: &str) -> bool {
    SUBJECTS.iter().any(|(known, _)| *known == key)
}

/// Display label for a subject key, falling back to the raw key.
pub fn subject_label(key: &str) -> &str {
    SUBJECTS
        .iter()
        .find(|(known, _)| *known == key)
        .map_or(key, |(_, label)| label)
}
