//! Reconciliation engine and seed importer for Vault Sync
//!
//! Projects local registry state (upserts plus deletion tombstones) onto a
//! remote content host using optimistic concurrency: every write is keyed by
//! the version token fetched just before it, and a token conflict is retried
//! exactly once. The seed importer walks the remote tree at startup to
//! repopulate the in-memory registry.
//!
//! Both sides of the seam are deliberate: this crate consumes the abstract
//! [`vault_remote::RemoteHost`] capability via a [`vault_remote::HostFactory`]
//! and is tested entirely against in-memory fakes.

pub mod engine;
pub mod error;
pub mod seed;

pub use engine::SyncEngine;
pub use error::{Error, Result};
pub use seed::{DOCUMENT_EXTENSION, SeedImporter};
