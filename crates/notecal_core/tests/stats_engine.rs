use notecal_core::{
    compute_stats, DateKey, MemoryNoteStorage, MonthKey, NoteDraft, NoteStore, Priority,
    TOP_SUBJECTS_LIMIT,
};

fn day(key: &str) -> DateKey {
    key.parse().unwrap()
}

#[test]
fn empty_store_yields_zero_stats() {
    let store = NoteStore::in_memory();
    let stats = compute_stats(store.snapshot());

    assert_eq!(stats.total_notes, 0);
    assert_eq!(stats.days_with_notes, 0);
    assert_eq!(stats.high_priority, 0);
    assert!(stats.subject_counts.is_empty());
    assert!(stats.priority_counts.is_empty());
    assert!(stats.monthly_activity.is_empty());
    assert!(stats.is_empty());
    assert_eq!(stats.share_percent(0), None);
}

#[test]
fn subjects_days_and_months_are_counted() {
    let mut store = NoteStore::in_memory();
    for text in ["a", "b"] {
        store
            .add(
                day("01.01.2026"),
                &NoteDraft::new(text, Priority::High).with_subject("математика"),
            )
            .unwrap();
    }
    store
        .add(
            day("15.02.2026"),
            &NoteDraft::new("c", Priority::Low).with_subject("физика"),
        )
        .unwrap();

    let stats = compute_stats(store.snapshot());
    assert_eq!(stats.total_notes, 3);
    assert_eq!(stats.days_with_notes, 2);
    assert_eq!(stats.high_priority, 2);
    assert_eq!(stats.subject_counts.len(), 2);
    assert_eq!(stats.subject_counts["математика"], 2);
    assert_eq!(stats.subject_counts["физика"], 1);
    assert_eq!(
        stats.monthly_activity[&MonthKey {
            year: 2026,
            month: 1
        }],
        2
    );
    assert_eq!(
        stats.monthly_activity[&MonthKey {
            year: 2026,
            month: 2
        }],
        1
    );
    assert_eq!(stats.priority_count(Priority::High), 2);
    assert_eq!(stats.priority_count(Priority::Low), 1);
    assert_eq!(stats.priority_count(Priority::Medium), 0);
    assert_eq!(
        stats.subjects_by_count(TOP_SUBJECTS_LIMIT),
        vec![("математика", 2), ("физика", 1)]
    );
}

#[test]
fn absent_priority_and_subject_are_not_bucketed() {
    let payload = r#"{"03.03.2026": [
        {"text": "legacy", "subject": "", "timestamp": "2026-03-03T09:00:00.000Z"},
        {"text": "tagged", "subject": "химия", "priority": "medium", "timestamp": "2026-03-03T10:00:00.000Z"}
    ]}"#;
    let store = NoteStore::open(MemoryNoteStorage::with_payload(payload)).unwrap();
    let stats = compute_stats(store.snapshot());

    assert_eq!(stats.total_notes, 2);
    assert_eq!(stats.priority_counts.values().sum::<usize>(), 1);
    assert_eq!(stats.priority_count(Priority::Medium), 1);
    assert_eq!(stats.subject_counts.values().sum::<usize>(), 1);
    assert_eq!(stats.distinct_subjects(), 1);
}

#[test]
fn compute_reflects_deletions_on_next_call() {
    let mut store = NoteStore::in_memory();
    let date = day("01.01.2026");
    let note = store
        .add(date, &NoteDraft::new("gone", Priority::High))
        .unwrap();
    assert_eq!(compute_stats(store.snapshot()).total_notes, 1);

    store.delete(date, note.id).unwrap();
    let stats = compute_stats(store.snapshot());
    assert_eq!(stats.total_notes, 0);
    assert_eq!(stats.high_priority, 0);
    assert!(stats.monthly_activity.is_empty());
}
