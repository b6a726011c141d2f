//! Aggregate statistics over the whole note store.
//!
//! # Responsibility
//! - Recompute exact counts from a full snapshot on every call.
//! - Offer ordering/percentage helpers that chart views build on.
//!
//! # Invariants
//! - `compute` is pure and keeps no state between calls.
//! - Absent priority and empty subject are not counted in their mappings.
//! - Mappings are unordered; ordering is applied by the helper methods.

use crate::model::catalog::Priority;
use crate::model::date_key::MonthKey;
use crate::store::NoteMap;
use std::collections::HashMap;

/// Subjects shown by the subject chart.
pub const TOP_SUBJECTS_LIMIT: usize = 8;

/// Derived aggregate view; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_notes: usize,
    pub high_priority: usize,
    pub days_with_notes: usize,
    /// Keyed by raw subject value.
    pub subject_counts: HashMap<String, usize>,
    pub priority_counts: HashMap<Priority, usize>,
    pub monthly_activity: HashMap<MonthKey, usize>,
}

/// Recomputes statistics from scratch.
pub fn compute(notes: &NoteMap) -> StatsSnapshot {
    let mut stats = StatsSnapshot::default();

    for (date_key, bucket) in notes {
        if bucket.is_empty() {
            continue;
        }
        stats.days_with_notes += 1;
        stats.total_notes += bucket.len();
        *stats
            .monthly_activity
            .entry(date_key.month_key())
            .or_default() += bucket.len();

        for note in bucket {
            if let Some(priority) = note.priority {
                *stats.priority_counts.entry(priority).or_default() += 1;
                if priority == Priority::High {
                    stats.high_priority += 1;
                }
            }
            if let Some(subject) = note.subject() {
                *stats
                    .subject_counts
                    .entry(subject.to_string())
                    .or_default() += 1;
            }
        }
    }

    stats
}

impl StatsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.total_notes == 0
    }

    /// Number of different subjects used at least once.
    pub fn distinct_subjects(&self) -> usize {
        self.subject_counts.len()
    }

    pub fn priority_count(&self, priority: Priority) -> usize {
        self.priority_counts.get(&priority).copied().unwrap_or(0)
    }

    /// Subjects by descending count (ties by key), at most `limit` entries.
    pub fn subjects_by_count(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked = self
            .subject_counts
            .iter()
            .map(|(subject, count)| (subject.as_str(), *count))
            .collect::<Vec<_>>();
        ranked.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(right.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Monthly activity in chronological order.
    pub fn months_chronological(&self) -> Vec<(MonthKey, usize)> {
        let mut months = self
            .monthly_activity
            .iter()
            .map(|(month, count)| (*month, *count))
            .collect::<Vec<_>>();
        months.sort_unstable_by_key(|(month, _)| *month);
        months
    }

    /// Share of all notes as a whole percent, rounded half up.
    ///
    /// Returns `None` when there are no notes, so callers show a placeholder.
    pub fn share_percent(&self, count: usize) -> Option<u32> {
        if self.total_notes == 0 {
            return None;
        }
        let rounded = (count * 200 + self.total_notes) / (self.total_notes * 2);
        Some(u32::try_from(rounded).unwrap_or(u32::MAX))
    }
}
