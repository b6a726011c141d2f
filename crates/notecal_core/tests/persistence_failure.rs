use notecal_core::{
    DateKey, MemoryNoteStorage, NoteDraft, NoteStorage, NoteStore, Priority, StorageError,
    StorageResult, StoreError,
};

/// Memory storage whose saves can be switched off.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryNoteStorage,
    failing: bool,
}

impl NoteStorage for FlakyStorage {
    fn load(&self) -> StorageResult<Option<String>> {
        self.inner.load()
    }

    fn save(&mut self, payload: &str) -> StorageResult<()> {
        if self.failing {
            return Err(StorageError::Backend("disk full".to_string()));
        }
        self.inner.save(payload)
    }
}

fn day() -> DateKey {
    DateKey::new(20, 6, 2026).unwrap()
}

#[test]
fn failed_save_keeps_mutation_and_marks_store_dirty() {
    let mut store = NoteStore::open(FlakyStorage::default()).unwrap();
    store.storage_mut().failing = true;

    let err = store
        .add(day(), &NoteDraft::new("unsaved", Priority::High))
        .unwrap_err();
    assert!(matches!(err, StoreError::PersistenceFailure(_)));
    assert_eq!(store.note_count(day()), 1);
    assert!(store.is_dirty());
    assert_eq!(store.storage().inner.payload(), None);

    let err = store.flush().unwrap_err();
    assert!(matches!(err, StoreError::PersistenceFailure(_)));
    assert!(store.is_dirty());
}

#[test]
fn flush_after_recovery_persists_pending_state() {
    let mut store = NoteStore::open(FlakyStorage::default()).unwrap();
    store.storage_mut().failing = true;
    let _ = store.add(day(), &NoteDraft::new("pending", Priority::Low));

    store.storage_mut().failing = false;
    store.flush().unwrap();
    assert!(!store.is_dirty());

    let payload = store.storage().inner.payload().unwrap().to_string();
    let reopened = NoteStore::open(MemoryNoteStorage::with_payload(payload)).unwrap();
    assert_eq!(reopened.get(day()).len(), 1);
    assert_eq!(reopened.get(day())[0].text, "pending");
}

#[test]
fn next_successful_mutation_clears_dirty_flag() {
    let mut store = NoteStore::open(FlakyStorage::default()).unwrap();
    store.storage_mut().failing = true;
    let _ = store.add(day(), &NoteDraft::new("one", Priority::Low));

    store.storage_mut().failing = false;
    store
        .add(day(), &NoteDraft::new("two", Priority::Low))
        .unwrap();
    assert!(!store.is_dirty());
    assert_eq!(store.storage().inner.save_count(), 1);
}

#[test]
fn flush_on_clean_store_does_not_save() {
    let mut store = NoteStore::in_memory();
    store.flush().unwrap();
    assert_eq!(store.storage().save_count(), 0);
}
