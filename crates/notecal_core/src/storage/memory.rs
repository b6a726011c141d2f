//! In-process storage slot.
//!
//! Useful for ephemeral sessions and tests; nothing survives the process.

use super::{NoteStorage, StorageResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStorage {
    payload: Option<String>,
    save_count: usize,
}

impl MemoryNoteStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a previously serialized payload, as if loaded from disk.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            save_count: 0,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl NoteStorage for MemoryNoteStorage {
    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.payload.clone())
    }

    fn save(&mut self, payload: &str) -> StorageResult<()> {
        self.payload = Some(payload.to_string());
        self.save_count += 1;
        Ok(())
    }
}
