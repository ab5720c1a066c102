//! Domain model for the note list.
//!
//! # Responsibility
//! - Define the note record held by the store and its validation rules.
//!
//! # Invariants
//! - Every note held by the store has non-blank text.
//! - Every note carries a stable `NoteId` for the lifetime of the session.

pub mod note;
