//! `NoteStore` state machine.
//!
//! States: `Idle` (no edit slot) and `Editing` (one edit slot).
//! - `begin_edit*`: Idle/Editing -> Editing.
//! - `commit_edit` success -> Idle; blank draft -> stays Editing;
//!   stale target -> Idle.

use super::error::{StateError, StoreError};
use super::observer::{ObserverRegistry, StoreEvent, StoreObserver, SubscriptionId};
use crate::model::note::{validate_text, Note, NoteId};
use crate::notify::{Notification, NotificationSink};
use crate::storage::{PersistenceAdapter, StorageError};
use log::{debug, error, info, warn};

pub const MSG_NOTE_SAVED: &str = "Note saved!";
pub const MSG_NOTE_EMPTY: &str = "Note cannot be empty";
pub const MSG_NOTE_UPDATED: &str = "Note updated!";
pub const MSG_EDIT_EMPTY: &str = "Edited note cannot be empty";
pub const MSG_EDIT_STALE: &str = "Edited note no longer exists";
pub const MSG_SAVE_FAILED: &str = "Failed to save notes";

/// Coarse store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Idle,
    Editing,
}

/// The note currently being edited and its draft text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSlot {
    /// Target note; resolved again at commit time.
    pub note_id: NoteId,
    /// Position of the target when the edit began.
    pub index: usize,
    /// Text of the target when the edit began.
    pub original: String,
    /// Current draft, unvalidated until commit.
    pub draft: String,
}

impl EditSlot {
    /// Whether the draft differs from the text the edit started from.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }
}

/// Ordered note list with a single edit slot and write-through persistence.
///
/// `P` is the persistence effect, `N` the user notification channel.
pub struct NoteStore<P: PersistenceAdapter, N: NotificationSink> {
    notes: Vec<Note>,
    edit_slot: Option<EditSlot>,
    input: String,
    persistence: P,
    sink: N,
    observers: ObserverRegistry,
}

impl<P: PersistenceAdapter, N: NotificationSink> NoteStore<P, N> {
    /// Builds a store hydrated from `persistence`.
    ///
    /// Absent or malformed stored data yields an empty list. Blank stored
    /// entries are dropped. Nothing is surfaced to the user.
    pub fn initialize(persistence: P, sink: N) -> Self {
        let stored = persistence.load();
        let found_blob = stored.is_some();
        let stored = stored.unwrap_or_default();
        let stored_count = stored.len();
        let notes = stored
            .into_iter()
            .filter_map(|text| Note::new(text).ok())
            .collect::<Vec<_>>();

        let dropped = stored_count - notes.len();
        if dropped > 0 {
            warn!("event=store_init module=store status=degraded dropped_blank={dropped}");
        }
        info!(
            "event=store_init module=store status=ok found_blob={found_blob} hydrated={}",
            notes.len()
        );

        Self {
            notes,
            edit_slot: None,
            input: String::new(),
            persistence,
            sink,
            observers: ObserverRegistry::default(),
        }
    }

    /// Appends a note and persists the list.
    ///
    /// `text` is stored untrimmed. On success the pending input is cleared.
    ///
    /// # Errors
    /// - `StoreError::Validation` when `text` is blank; nothing changes.
    /// - `StoreError::Storage` when the write fails; nothing changes.
    pub fn create(&mut self, text: impl Into<String>) -> Result<NoteId, StoreError> {
        let note = match Note::new(text) {
            Ok(note) => note,
            Err(err) => {
                info!("event=note_create module=store status=rejected reason=empty_note");
                self.sink.notify(Notification::Error(MSG_NOTE_EMPTY.to_string()));
                return Err(err.into());
            }
        };

        let mut texts = self.texts();
        texts.push(note.text.clone());
        self.write(&texts)?;

        let note_id = note.id;
        let index = self.notes.len();
        self.notes.push(note);
        self.input.clear();

        info!(
            "event=note_create module=store status=ok note_id={note_id} count={}",
            self.notes.len()
        );
        self.sink
            .notify(Notification::Success(MSG_NOTE_SAVED.to_string()));
        self.observers
            .publish(&StoreEvent::NoteCreated { note_id, index });
        Ok(note_id)
    }

    /// Replaces the pending input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.observers.publish(&StoreEvent::InputChanged);
    }

    /// Pending input text not yet saved as a note.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Creates a note from the pending input.
    ///
    /// The input is cleared only when the note is saved.
    pub fn submit_input(&mut self) -> Result<NoteId, StoreError> {
        let text = self.input.clone();
        self.create(text)
    }

    /// Opens an edit on the note at `index`, replacing any open edit.
    ///
    /// # Errors
    /// - `StateError::IndexOutOfRange` when `index >= len()`.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), StoreError> {
        if index >= self.notes.len() {
            return Err(StateError::IndexOutOfRange {
                index,
                len: self.notes.len(),
            }
            .into());
        }
        self.open_slot(index);
        Ok(())
    }

    /// Opens an edit on the note with `note_id`, replacing any open edit.
    ///
    /// # Errors
    /// - `StateError::UnknownNote` when no such note exists.
    pub fn begin_edit_by_id(&mut self, note_id: NoteId) -> Result<(), StoreError> {
        let index = self
            .position_of(note_id)
            .ok_or(StateError::UnknownNote(note_id))?;
        self.open_slot(index);
        Ok(())
    }

    /// Overwrites the draft of the open edit. No-op when idle.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        let Some(slot) = self.edit_slot.as_mut() else {
            debug!("event=draft_update module=store status=ignored reason=not_editing");
            return;
        };
        slot.draft = text.into();
        let note_id = slot.note_id;
        self.observers.publish(&StoreEvent::DraftChanged { note_id });
    }

    /// Writes the draft into its note and closes the edit.
    ///
    /// # Errors
    /// - `StateError::NotEditing` when no edit is open.
    /// - `StoreError::Validation` when the draft is blank; the edit stays open.
    /// - `StateError::StaleIndex` when the target note is gone; the edit is
    ///   discarded and the list is untouched.
    /// - `StoreError::Storage` when the write fails; the edit stays open.
    pub fn commit_edit(&mut self) -> Result<NoteId, StoreError> {
        let Some(slot) = self.edit_slot.take() else {
            info!("event=note_update module=store status=rejected reason=not_editing");
            self.sink.notify(Notification::Error(MSG_EDIT_EMPTY.to_string()));
            return Err(StateError::NotEditing.into());
        };

        if let Err(err) = validate_text(&slot.draft) {
            info!(
                "event=note_update module=store status=rejected reason=empty_note note_id={}",
                slot.note_id
            );
            self.edit_slot = Some(slot);
            self.sink.notify(Notification::Error(MSG_EDIT_EMPTY.to_string()));
            return Err(err.into());
        }

        let note_id = slot.note_id;
        let Some(index) = self.position_of(note_id) else {
            warn!(
                "event=note_update module=store status=discarded reason=stale_index note_id={note_id} started_index={}",
                slot.index
            );
            self.sink.notify(Notification::Error(MSG_EDIT_STALE.to_string()));
            self.observers.publish(&StoreEvent::EditDiscarded { note_id });
            return Err(StateError::StaleIndex {
                note_id,
                index: slot.index,
            }
            .into());
        };

        let mut texts = self.texts();
        texts[index] = slot.draft.clone();
        if let Err(err) = self.write(&texts) {
            self.edit_slot = Some(slot);
            return Err(err);
        }

        self.notes[index].text = slot.draft;
        info!("event=note_update module=store status=ok note_id={note_id} index={index}");
        self.sink
            .notify(Notification::Success(MSG_NOTE_UPDATED.to_string()));
        self.observers
            .publish(&StoreEvent::NoteUpdated { note_id, index });
        Ok(note_id)
    }

    /// Registers an observer for subsequent store events.
    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) -> SubscriptionId {
        self.observers.subscribe(Box::new(observer))
    }

    /// Removes an observer. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Note texts in insertion order, as they are persisted.
    pub fn texts(&self) -> Vec<String> {
        self.notes.iter().map(|note| note.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    /// Current position of `note_id`, if present.
    pub fn position_of(&self, note_id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == note_id)
    }

    pub fn edit_slot(&self) -> Option<&EditSlot> {
        self.edit_slot.as_ref()
    }

    pub fn mode(&self) -> StoreMode {
        if self.edit_slot.is_some() {
            StoreMode::Editing
        } else {
            StoreMode::Idle
        }
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    fn open_slot(&mut self, index: usize) {
        let note = &self.notes[index];
        let replaced_unsaved_draft = self.edit_slot.as_ref().is_some_and(EditSlot::is_dirty);
        let slot = EditSlot {
            note_id: note.id,
            index,
            original: note.text.clone(),
            draft: note.text.clone(),
        };
        let note_id = slot.note_id;
        self.edit_slot = Some(slot);

        if replaced_unsaved_draft {
            warn!("event=edit_begin module=store status=ok note_id={note_id} index={index} discarded_unsaved_draft=true");
        } else {
            debug!("event=edit_begin module=store status=ok note_id={note_id} index={index}");
        }
        self.observers.publish(&StoreEvent::EditStarted {
            note_id,
            index,
            replaced_unsaved_draft,
        });
    }

    fn write(&mut self, texts: &[String]) -> Result<(), StoreError> {
        self.persistence.save(texts).map_err(|err: StorageError| {
            error!(
                "event=notes_save module=store status=error count={} error={err}",
                texts.len()
            );
            self.sink
                .notify(Notification::Error(MSG_SAVE_FAILED.to_string()));
            StoreError::Storage(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteStore, StoreMode, MSG_EDIT_STALE};
    use crate::model::note::Note;
    use crate::notify::{Notification, RecordingNotificationSink};
    use crate::storage::{KeyValuePersistence, MemoryKeyValueStore, PersistenceAdapter};
    use crate::store::{StateError, StoreError, StoreEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    type MemoryStore =
        NoteStore<KeyValuePersistence<MemoryKeyValueStore>, RecordingNotificationSink>;

    fn store_with(texts: &[&str]) -> MemoryStore {
        let mut persistence = KeyValuePersistence::new(MemoryKeyValueStore::new());
        let texts = texts.iter().map(|text| text.to_string()).collect::<Vec<_>>();
        persistence.save(&texts).unwrap();
        NoteStore::initialize(persistence, RecordingNotificationSink::new())
    }

    #[test]
    fn commit_on_removed_note_discards_edit_without_touching_list() {
        let mut store = store_with(&["a", "b"]);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event: &StoreEvent| sink.borrow_mut().push(event.clone()));

        store.begin_edit(1).unwrap();
        store.update_draft("bb");
        let target = store.notes[1].id;
        store.notes.remove(1);
        let writes_before = store.persistence().backend().write_count();

        let err = store.commit_edit().unwrap_err();
        assert!(matches!(
            err,
            StoreError::State(StateError::StaleIndex { note_id, index: 1 }) if note_id == target
        ));
        assert_eq!(store.mode(), StoreMode::Idle);
        assert_eq!(store.texts(), vec!["a".to_string()]);
        assert_eq!(store.persistence().backend().write_count(), writes_before);
        assert_eq!(
            store.sink().last(),
            Some(&Notification::Error(MSG_EDIT_STALE.to_string()))
        );
        assert_eq!(
            events.borrow().last(),
            Some(&StoreEvent::EditDiscarded { note_id: target })
        );
    }

    #[test]
    fn commit_follows_note_when_its_position_moves() {
        let mut store = store_with(&["a", "b"]);
        store.begin_edit(1).unwrap();
        store.update_draft("bb");
        store.notes.insert(0, Note::new("front").unwrap());

        let updated = store.commit_edit().unwrap();
        assert_eq!(store.position_of(updated), Some(2));
        assert_eq!(
            store.texts(),
            vec!["front".to_string(), "a".to_string(), "bb".to_string()]
        );
    }
}
