//! Remote content host capability for Vault Sync
//!
//! Defines the abstract [`RemoteHost`] capability the reconciliation engine
//! and seed importer are written against, plus the concrete GitHub Contents
//! API implementation. The trait seam exists so the engine can be tested
//! against an in-memory fake without any network dependency.

pub mod error;
pub mod github;
pub mod host;

pub use error::{Error, Result};
pub use github::{GitHubHost, GitHubHostFactory};
pub use host::{EntryKind, HostFactory, RemoteBlob, RemoteEntry, RemoteHost, VersionToken};
