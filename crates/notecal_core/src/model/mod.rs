//! Domain model for calendar notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep labels and enumerations in one fixed catalog.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Every calendar day is identified by a `DateKey`; month buckets derive
//!   from it and are never stored.

pub mod catalog;
pub mod date_key;
pub mod note;
