//! Helpers for naming and typing stored content.

use uuid::Uuid;

/// Storage location for a new blob owned by `owner_id`.
///
/// Locations never contain the user-supplied file name, so renames never
/// touch storage.
pub fn blob_location(owner_id: Uuid, blob_id: Uuid) -> String {
    format!("{owner_id}/{blob_id}")
}

/// MIME type for a file name, falling back to `application/octet-stream`.
pub fn content_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
