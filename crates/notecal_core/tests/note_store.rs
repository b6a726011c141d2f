use notecal_core::{
    sort_for_display, DateKey, MemoryNoteStorage, NoteDraft, NoteStore, NoteValidationError,
    Priority, SortPolicy, StoreError, DAY_CAPACITY,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

fn day(key: &str) -> DateKey {
    key.parse().unwrap()
}

#[test]
fn add_appends_and_get_returns_notes_in_insertion_order() {
    let mut store = NoteStore::in_memory();
    let date = day("01.03.2026");

    let first = store
        .add(date, &NoteDraft::new("  first ", Priority::Low))
        .unwrap();
    let second = store
        .add(
            date,
            &NoteDraft::new("second", Priority::High).with_subject("физика"),
        )
        .unwrap();

    let notes = store.get(date);
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0], first);
    assert_eq!(notes[1], second);
    assert_eq!(first.text, "first");
    assert_eq!(second.subject(), Some("физика"));
    assert_eq!(second.priority, Some(Priority::High));
    assert_ne!(first.timestamp, second.timestamp);
    assert_eq!(store.storage().save_count(), 2);
}

#[test]
fn get_on_unknown_date_is_empty_and_absent_from_payload() {
    let mut store = NoteStore::in_memory();
    let other = day("02.03.2026");
    store
        .add(day("01.03.2026"), &NoteDraft::new("x", Priority::Medium))
        .unwrap();

    assert!(store.get(other).is_empty());
    let payload: serde_json::Value =
        serde_json::from_str(store.storage().payload().unwrap()).unwrap();
    assert!(payload.get("02.03.2026").is_none());
    assert!(payload.get("01.03.2026").is_some());
}

#[test]
fn add_rejects_invalid_input_without_touching_store() {
    let mut store = NoteStore::in_memory();
    let date = day("01.03.2026");

    let err = store
        .add(date, &NoteDraft::new("   ", Priority::Low))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(NoteValidationError::EmptyText)
    ));

    let no_priority = NoteDraft {
        text: "text".to_string(),
        subject: None,
        priority: None,
    };
    let err = store.add(date, &no_priority).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(NoteValidationError::MissingPriority)
    ));

    assert!(store.get(date).is_empty());
    assert!(store.is_empty());
    assert_eq!(store.storage().save_count(), 0);
}

#[test]
fn capacity_scenario_blocks_sixth_note_and_priority_sort_is_stable() {
    let mut store = NoteStore::in_memory();
    let date = day("01.03.2026");
    let priorities = [
        Priority::Low,
        Priority::High,
        Priority::Medium,
        Priority::High,
        Priority::Low,
    ];
    for (idx, priority) in priorities.into_iter().enumerate() {
        store
            .add(date, &NoteDraft::new(format!("note {idx}"), priority))
            .unwrap();
    }
    assert!(store.is_full(date));
    assert_eq!(store.remaining_capacity(date), 0);

    let err = store
        .add(date, &NoteDraft::new("sixth", Priority::High))
        .unwrap_err();
    match err {
        StoreError::CapacityExceeded { date_key, capacity } => {
            assert_eq!(date_key, date);
            assert_eq!(capacity, DAY_CAPACITY);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.note_count(date), DAY_CAPACITY);

    let sorted = sort_for_display(store.get(date), SortPolicy::ByPriority);
    let texts = sorted
        .iter()
        .map(|note| note.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        texts,
        vec!["note 1", "note 3", "note 2", "note 0", "note 4"]
    );

    let recent = sort_for_display(store.get(date), SortPolicy::ByRecency);
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].timestamp >= pair[1].timestamp));
}

#[test]
fn delete_last_note_removes_date_entirely() {
    let mut store = NoteStore::in_memory();
    let date = day("10.04.2026");
    let note = store
        .add(date, &NoteDraft::new("only", Priority::Medium))
        .unwrap();

    let removed = store.delete(date, note.id).unwrap();
    assert_eq!(removed, note);
    assert!(store.get(date).is_empty());
    assert_eq!(store.dates().count(), 0);
    assert_eq!(store.storage().payload(), Some("{}"));
}

#[test]
fn delete_middle_note_keeps_others_in_order() {
    let mut store = NoteStore::in_memory();
    let date = day("10.04.2026");
    let ids = ["a", "b", "c"]
        .into_iter()
        .map(|text| {
            store
                .add(date, &NoteDraft::new(text, Priority::Low))
                .unwrap()
                .id
        })
        .collect::<Vec<_>>();

    store.delete(date, ids[1]).unwrap();
    let remaining = store
        .get(date)
        .iter()
        .map(|note| note.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(remaining, vec!["a", "c"]);
}

#[test]
fn delete_and_clear_report_not_found() {
    let mut store = NoteStore::in_memory();
    let date = day("10.04.2026");

    let err = store.delete(date, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { note_id: Some(_), .. }));

    store
        .add(date, &NoteDraft::new("kept", Priority::Low))
        .unwrap();
    let err = store.delete(date, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(store.note_count(date), 1);

    let err = store.clear_date(day("11.04.2026")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { note_id: None, .. }));
}

#[test]
fn clear_date_removes_whole_day_only() {
    let mut store = NoteStore::in_memory();
    let cleared = day("01.01.2026");
    let kept = day("02.01.2026");
    for text in ["a", "b"] {
        store
            .add(cleared, &NoteDraft::new(text, Priority::High))
            .unwrap();
    }
    store
        .add(kept, &NoteDraft::new("c", Priority::High))
        .unwrap();

    let removed = store.clear_date(cleared).unwrap();
    assert_eq!(removed.len(), 2);
    assert!(store.get(cleared).is_empty());
    assert_eq!(store.dates().collect::<Vec<_>>(), vec![kept]);
}

#[test]
fn colliding_timestamps_are_moved_forward() {
    let mut store = NoteStore::in_memory();
    let date = day("05.05.2026");
    let instant = "2026-05-05T12:00:00.000Z".parse().unwrap();

    let first = store
        .add_with_timestamp(date, &NoteDraft::new("a", Priority::Low), instant)
        .unwrap();
    let second = store
        .add_with_timestamp(date, &NoteDraft::new("b", Priority::Low), instant)
        .unwrap();

    assert_eq!(first.timestamp, instant);
    assert_eq!(
        (second.timestamp - first.timestamp).num_milliseconds(),
        1
    );
}

#[test]
fn collision_at_latest_instant_is_rejected_without_changes() {
    let mut store = NoteStore::in_memory();
    let date = day("31.12.2026");
    let latest = DateTime::<Utc>::MAX_UTC;

    store
        .add_with_timestamp(date, &NoteDraft::new("a", Priority::Low), latest)
        .unwrap();
    let saves = store.storage().save_count();
    let err = store
        .add_with_timestamp(date, &NoteDraft::new("b", Priority::Low), latest)
        .unwrap_err();

    assert!(matches!(err, StoreError::TimestampOutOfRange { date_key } if date_key == date));
    assert_eq!(store.note_count(date), 1);
    assert_eq!(store.storage().save_count(), saves);
}

#[test]
fn legacy_notes_get_ids_that_flush_persists() {
    let payload = r#"{
        "02.03.2026": [
            {"text": "old a", "subject": "", "priority": "high", "timestamp": "2026-03-02T08:00:00.000Z"},
            {"text": "old b", "subject": "", "priority": "low", "timestamp": "2026-03-02T09:00:00.000Z"}
        ]
    }"#;
    let mut store = NoteStore::open(MemoryNoteStorage::with_payload(payload)).unwrap();
    assert!(store.is_dirty());
    let ids: Vec<Uuid> = store.get(day("02.03.2026")).iter().map(|note| note.id).collect();

    store.flush().unwrap();
    assert!(!store.is_dirty());

    let saved = store.storage().payload().unwrap().to_string();
    let reopened = NoteStore::open(MemoryNoteStorage::with_payload(saved)).unwrap();
    let reopened_ids: Vec<Uuid> = reopened
        .get(day("02.03.2026"))
        .iter()
        .map(|note| note.id)
        .collect();

    assert_eq!(reopened_ids, ids);
    assert!(!reopened.is_dirty());
}

#[test]
fn reopening_from_payload_restores_identical_store() {
    let mut store = NoteStore::in_memory();
    store
        .add(
            day("01.01.2026"),
            &NoteDraft::new("alpha", Priority::High).with_subject("математика"),
        )
        .unwrap();
    store
        .add(day("01.01.2026"), &NoteDraft::new("beta", Priority::Low))
        .unwrap();
    store
        .add(day("15.02.2026"), &NoteDraft::new("gamma", Priority::Medium))
        .unwrap();

    let payload = store.storage().payload().unwrap().to_string();
    let reopened = NoteStore::open(MemoryNoteStorage::with_payload(payload)).unwrap();

    assert_eq!(reopened.snapshot(), store.snapshot());
    assert!(!reopened.is_dirty());
}

#[test]
fn opening_corrupt_payload_fails_with_decode_error() {
    let err = NoteStore::open(MemoryNoteStorage::with_payload("not json")).err().unwrap();
    assert!(matches!(err, StoreError::Decode(_)));
}
