//! Core state logic for QuickNote.
//! Owns the note list, the edit slot and the persisted note blob.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{preview_text, Note, NoteId, ValidationError, PREVIEW_MAX_CHARS};
pub use notify::{LogNotificationSink, Notification, NotificationSink, RecordingNotificationSink};
pub use storage::{
    KeyValuePersistence, KeyValueStore, MemoryKeyValueStore, PersistenceAdapter,
    SqliteKeyValueStore, StorageError, StorageResult, DEFAULT_NOTES_KEY,
};
pub use store::{
    EditSlot, NoteStore, StateError, StoreError, StoreEvent, StoreMode, StoreObserver,
    SubscriptionId,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
