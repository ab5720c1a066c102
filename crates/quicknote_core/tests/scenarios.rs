use quicknote_core::{
    KeyValuePersistence, KeyValueStore, MemoryKeyValueStore, NoteStore,
    RecordingNotificationSink, StoreError, ValidationError, DEFAULT_NOTES_KEY,
};

fn strings(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|text| text.to_string()).collect()
}

fn store_over(
    backend: MemoryKeyValueStore,
) -> NoteStore<KeyValuePersistence<MemoryKeyValueStore>, RecordingNotificationSink> {
    NoteStore::initialize(
        KeyValuePersistence::new(backend),
        RecordingNotificationSink::new(),
    )
}

#[test]
fn first_note_on_empty_store() {
    let mut store = store_over(MemoryKeyValueStore::new());
    store.create("buy milk").unwrap();
    assert_eq!(store.texts(), strings(&["buy milk"]));
}

#[test]
fn edit_middle_note() {
    let mut backend = MemoryKeyValueStore::new();
    backend.set(DEFAULT_NOTES_KEY, r#"["a","b","c"]"#).unwrap();
    let mut store = store_over(backend);

    store.begin_edit(1).unwrap();
    store.update_draft("bb");
    store.commit_edit().unwrap();

    assert_eq!(store.texts(), strings(&["a", "bb", "c"]));
    assert!(store.edit_slot().is_none());
}

#[test]
fn whitespace_note_is_rejected_in_any_state() {
    let mut store = store_over(MemoryKeyValueStore::new());
    assert!(matches!(
        store.create("   ").unwrap_err(),
        StoreError::Validation(ValidationError::EmptyNote)
    ));
    assert!(store.is_empty());

    store.create("x").unwrap();
    store.begin_edit(0).unwrap();
    assert!(matches!(
        store.create("   ").unwrap_err(),
        StoreError::Validation(ValidationError::EmptyNote)
    ));
    assert_eq!(store.texts(), strings(&["x"]));
    assert!(store.edit_slot().is_some());
}

#[test]
fn garbage_in_storage_starts_empty() {
    let mut backend = MemoryKeyValueStore::new();
    backend.set(DEFAULT_NOTES_KEY, "not json").unwrap();

    let store = store_over(backend);

    assert!(store.is_empty());
    assert!(store.sink().received().is_empty());
}

#[test]
fn notes_survive_a_restart_over_the_same_backend() {
    let mut store = store_over(MemoryKeyValueStore::new());
    store.create("one").unwrap();
    store.create("two").unwrap();
    store.begin_edit(0).unwrap();
    store.update_draft("ONE");
    store.commit_edit().unwrap();

    let backend = store.persistence().backend().clone();
    let reopened = store_over(backend);
    assert_eq!(reopened.texts(), strings(&["ONE", "two"]));
}
