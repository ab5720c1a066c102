//! JSON blob codec for the persisted note list.
//!
//! Wire format: a JSON array of strings, e.g. `["buy milk","call mom"]`.
//! A JSON `null` is read as "nothing stored".

use super::{StorageError, StorageResult};
use log::warn;

/// Serializes the note list as a JSON array of strings.
pub fn encode_notes(notes: &[String]) -> StorageResult<String> {
    serde_json::to_string(notes).map_err(StorageError::Encode)
}

/// Parses a stored blob into a note list.
///
/// Returns `None` for `null` and for anything that is not an array of
/// strings. Parse failures are logged without echoing the blob.
pub fn decode_notes(blob: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Option<Vec<String>>>(blob) {
        Ok(notes) => notes,
        Err(err) => {
            warn!(
                "event=notes_decode module=storage status=error error_code=malformed_blob blob_len={} line={} column={}",
                blob.len(),
                err.line(),
                err.column()
            );
            None
        }
    }
}
