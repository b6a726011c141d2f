//! Display ordering for one day's notes.
//!
//! # Invariants
//! - Sorting never mutates the input or the stored order.
//! - Both policies are stable: equal keys keep their input order.
//! - Output depends only on the notes and the policy passed in.

use crate::model::catalog::priority_rank;
use crate::model::note::Note;
use std::cmp::Reverse;

/// Sort policy chosen by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortPolicy {
    /// Most recent first.
    #[default]
    ByRecency,
    /// High, then medium, then low; absent priority ranks as medium.
    ByPriority,
}

/// Returns `notes` ordered for display under `policy`.
pub fn sort_for_display(notes: &[Note], policy: SortPolicy) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    match policy {
        SortPolicy::ByRecency => sorted.sort_by_key(|note| Reverse(note.timestamp)),
        SortPolicy::ByPriority => sorted.sort_by_key(|note| Reverse(priority_rank(note.priority))),
    }
    sorted
}
