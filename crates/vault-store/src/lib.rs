//! Document model and in-memory registry for Vault Sync
//!
//! This crate is the leaf of the workspace: it defines what a document is,
//! how its content is fingerprinted for change detection, and the in-memory
//! registry that tracks live documents and deletion tombstones per tenant.
//! It performs no I/O and never touches the remote host.

pub mod document;
pub mod fingerprint;
pub mod path;
pub mod registry;

pub use document::{Document, RemoteCoords, Snapshot};
pub use fingerprint::content_fingerprint;
pub use path::document_path_is_valid;
pub use registry::Registry;
