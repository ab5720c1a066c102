//! Note domain model.
//!
//! # Responsibility
//! - Define the note record and its session-stable identifier.
//! - Own the blank-text validation rule shared by create and edit paths.
//! - Derive single-line previews for list rendering.
//!
//! # Invariants
//! - `Note::new` never yields a note with blank text.
//! - Note text is stored exactly as supplied (never trimmed).

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Default maximum number of characters in a list-row preview.
pub const PREVIEW_MAX_CHARS: usize = 80;

/// Stable identifier for one note inside a store session.
///
/// Identity is not persisted: the storage format is a plain array of texts,
/// so ids are reassigned on every hydration.
pub type NoteId = Uuid;

/// Validation failures for user-supplied note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Text is empty or whitespace-only.
    EmptyNote,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note text cannot be blank"),
        }
    }
}

impl Error for ValidationError {}

/// One user-authored text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Session-stable id; never reused for another note.
    pub id: NoteId,
    /// Text exactly as the user typed it.
    pub text: String,
}

impl Note {
    /// Creates a note with a freshly generated id.
    ///
    /// # Errors
    /// - `ValidationError::EmptyNote` when `text` is blank after trimming.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        validate_text(&text)?;
        Ok(Self {
            id: Uuid::new_v4(),
            text,
        })
    }

    /// Returns a single-line preview of the note text.
    pub fn preview(&self, max_chars: usize) -> String {
        preview_text(&self.text, max_chars)
    }
}

/// Rejects text that is blank after trimming.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyNote);
    }
    Ok(())
}

/// Collapses whitespace runs to single spaces and truncates to `max_chars`.
///
/// Truncated previews end with `...`.
pub fn preview_text(text: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text.trim(), " ");
    let mut preview = collapsed.chars().take(max_chars).collect::<String>();
    if collapsed.chars().count() > max_chars {
        preview.push_str("...");
    }
    preview
}
