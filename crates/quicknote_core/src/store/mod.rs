//! Note store: the in-memory note list, its edit slot and change events.
//!
//! # Responsibility
//! - Own the ordered note list and the single in-progress edit.
//! - Enforce the non-blank rule on every write path.
//! - Persist the full list after every successful mutation.
//! - Publish change events to subscribed observers.
//!
//! # Invariants
//! - Persistence happens before in-memory state changes; a failed write
//!   leaves the store untouched.
//! - At most one edit slot exists; a new `begin_edit` replaces it.

mod error;
mod note_store;
mod observer;

pub use error::{StateError, StoreError};
pub use note_store::{
    EditSlot, NoteStore, StoreMode, MSG_EDIT_EMPTY, MSG_EDIT_STALE, MSG_NOTE_EMPTY,
    MSG_NOTE_SAVED, MSG_NOTE_UPDATED, MSG_SAVE_FAILED,
};
pub use observer::{StoreEvent, StoreObserver, SubscriptionId};
