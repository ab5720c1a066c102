use crate::model::note::{NoteId, ValidationError};
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Edit-state violations raised by store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// `commit_edit` was called with no edit in progress.
    NotEditing,
    /// `begin_edit` was given a position outside the list.
    IndexOutOfRange { index: usize, len: usize },
    /// `begin_edit_by_id` was given an id the store does not hold.
    UnknownNote(NoteId),
    /// The note being edited is no longer in the list.
    StaleIndex { note_id: NoteId, index: usize },
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing => write!(f, "no note is being edited"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "note index {index} out of range for list of {len}")
            }
            Self::UnknownNote(note_id) => write!(f, "note not found: {note_id}"),
            Self::StaleIndex { note_id, index } => write!(
                f,
                "edited note {note_id} (started at index {index}) no longer exists"
            ),
        }
    }
}

impl Error for StateError {}

/// Error returned by `NoteStore` operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    State(StateError),
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::State(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "failed to persist notes: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::State(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StateError> for StoreError {
    fn from(value: StateError) -> Self {
        Self::State(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
