//! Remote content host trait and related types

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use vault_store::RemoteCoords;

use crate::Result;

/// Opaque revision identifier from the remote host.
///
/// Used for optimistic-concurrency compare-and-swap: fetched alongside
/// content, forwarded with the next write, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a directory entry on the remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules, and anything else — skipped by consumers.
    Other,
}

/// One entry in a remote directory listing.
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Decoded remote content plus its current version token.
#[derive(Debug, Clone)]
pub struct RemoteBlob {
    pub content: String,
    pub version: VersionToken,
}

/// Capability for reading and writing content on a remote git-hosted
/// repository.
///
/// An implementation is scoped to a single repository and a fixed branch
/// reference at construction time; every operation addresses one file by
/// relative path. Writes are keyed by the expected version token and fail
/// with a conflict when the remote moved underneath the caller.
#[async_trait]
pub trait RemoteHost: Send + Sync {
    /// Fetch the content and current version token at `path`.
    async fn get_content(&self, path: &str) -> Result<RemoteBlob>;

    /// Create a new file at `path`. Fails if it already exists.
    async fn create_content(&self, path: &str, content: &str, message: &str)
    -> Result<VersionToken>;

    /// Replace the file at `path`, keyed by its expected version token.
    async fn update_content(
        &self,
        path: &str,
        content: &str,
        expected: &VersionToken,
        message: &str,
    ) -> Result<VersionToken>;

    /// Delete the file at `path`, keyed by its expected version token.
    async fn delete_content(
        &self,
        path: &str,
        expected: &VersionToken,
        message: &str,
    ) -> Result<()>;

    /// List the entries of the directory at `path` (empty string for the
    /// repository root).
    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>>;
}

/// Builds a [`RemoteHost`] scoped to one tenant's repository coordinates.
///
/// The seam between per-tenant addressing and the repository-scoped host
/// capability; fakes implement this in tests.
pub trait HostFactory: Send + Sync {
    fn open(&self, coords: &RemoteCoords) -> Arc<dyn RemoteHost>;
}
