//! Persistence slot for the note list.
//!
//! # Responsibility
//! - Define the raw key/value backend contract (`KeyValueStore`).
//! - Define the note-list persistence contract (`PersistenceAdapter`).
//! - Bind a backend and a fixed key to the JSON blob codec.
//!
//! # Invariants
//! - The whole list is written as one blob; there are no partial writes.
//! - `load` never fails: missing, unreadable or malformed blobs are `None`.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
pub mod memory;
pub mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

/// Storage key used for the note list unless the caller overrides it.
pub const DEFAULT_NOTES_KEY: &str = "notes";

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by key/value backends and the blob codec.
#[derive(Debug)]
pub enum StorageError {
    /// Backend database failure.
    Db(DbError),
    /// Note list could not be serialized.
    Encode(serde_json::Error),
    /// Storage key is empty or whitespace-only.
    InvalidKey(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode note list: {err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key: `{key}`"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw string key/value backend (the role local storage plays in a browser).
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// Note-list persistence contract used by `NoteStore`.
pub trait PersistenceAdapter {
    /// Returns the stored note list, or `None` when absent or unparseable.
    fn load(&self) -> Option<Vec<String>>;
    /// Overwrites the stored note list with `notes`.
    fn save(&mut self, notes: &[String]) -> StorageResult<()>;
}

/// JSON-array persistence of the note list under one fixed key.
#[derive(Debug)]
pub struct KeyValuePersistence<S: KeyValueStore> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> KeyValuePersistence<S> {
    /// Binds `backend` to [`DEFAULT_NOTES_KEY`].
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            key: DEFAULT_NOTES_KEY.to_string(),
        }
    }

    /// Binds `backend` to a caller-chosen key.
    ///
    /// # Errors
    /// - `StorageError::InvalidKey` when `key` is blank.
    pub fn with_key(backend: S, key: impl Into<String>) -> StorageResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(StorageError::InvalidKey(key));
        }
        Ok(Self { backend, key })
    }

    /// Returns the storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Returns the underlying backend mutably.
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Unwraps the adapter into its backend.
    pub fn into_backend(self) -> S {
        self.backend
    }
}

impl<S: KeyValueStore> PersistenceAdapter for KeyValuePersistence<S> {
    fn load(&self) -> Option<Vec<String>> {
        let blob = match self.backend.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(err) => {
                log::warn!(
                    "event=notes_load module=storage status=error error_code=backend_read_failed error={err}"
                );
                return None;
            }
        };
        codec::decode_notes(&blob)
    }

    fn save(&mut self, notes: &[String]) -> StorageResult<()> {
        let blob = codec::encode_notes(notes)?;
        self.backend.set(&self.key, &blob)
    }
}
