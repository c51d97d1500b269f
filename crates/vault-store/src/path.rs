//! Document path validity
//!
//! The registry itself trusts its callers, so validation lives here as a
//! helper for the request-handling layer that sits in front of it.

/// Longest accepted document path, in bytes.
pub const MAX_DOCUMENT_PATH_BYTES: usize = 4096;

/// Check whether a path is acceptable as a document key.
///
/// Accepted paths are non-empty, length-bounded, relative (no leading `/`),
/// free of `..` segments, and contain no NUL or backslash bytes.
pub fn document_path_is_valid(path: &str) -> bool {
    if path.is_empty() || path.len() > MAX_DOCUMENT_PATH_BYTES {
        return false;
    }
    if path.starts_with('/') {
        return false;
    }
    if path.bytes().any(|b| b == 0 || b == b'\\') {
        return false;
    }
    !path.split('/').any(|segment| segment == "..")
}
