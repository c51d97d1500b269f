//! Reconciliation engine
//!
//! Given a batch of documents and deleted paths from a registry snapshot,
//! the engine replays them against the remote host. Deletions run before
//! upserts, so a path appearing both in a stale upsert batch and a racing
//! delete batch ends up deleted — a documented policy choice.
//!
//! Concurrent reconciliations for the same tenant are not serialized here;
//! the single retry on a version conflict is the only protection against
//! that race, and a second collision is a hard failure for the caller.

use std::sync::Arc;

use vault_remote::{HostFactory, RemoteHost};
use vault_store::{Document, RemoteCoords};

use crate::error::{Error, Result};

/// Projects registry state onto a remote content host.
pub struct SyncEngine {
    factory: Arc<dyn HostFactory>,
}

impl SyncEngine {
    pub fn new(factory: Arc<dyn HostFactory>) -> Self {
        Self { factory }
    }

    /// Reconcile one tenant's registry state with its remote repository.
    ///
    /// Absent coordinates or an empty credential are "not configured":
    /// defined as a successful no-op with zero remote calls, so callers can
    /// invoke reconciliation unconditionally after every mutation.
    ///
    /// Fail-fast: the first fatal error aborts the remaining batch. Items
    /// after the failure are not attempted, and the local registry is never
    /// rolled back — local mutation and remote projection are independent.
    pub async fn reconcile(
        &self,
        coords: Option<&RemoteCoords>,
        documents: &[Document],
        deleted: &[String],
    ) -> Result<()> {
        let Some(coords) = coords.filter(|c| !c.credential.is_empty()) else {
            tracing::debug!("remote not configured; skipping reconciliation");
            return Ok(());
        };
        let host = self.factory.open(coords);
        tracing::info!(
            documents = documents.len(),
            deleted = deleted.len(),
            owner = %coords.repo_owner,
            repo = %coords.repo_name,
            "reconciling registry state with remote"
        );

        // Deletions first: a racing delete must win over a stale upsert.
        for path in deleted {
            if let Err(err) = self.delete_remote(host.as_ref(), path).await {
                tracing::warn!(%path, error = %err, "reconciliation aborted");
                return Err(err);
            }
        }
        for document in documents {
            if let Err(err) = self.push_document(host.as_ref(), document).await {
                tracing::warn!(path = %document.path, error = %err, "reconciliation aborted");
                return Err(err);
            }
        }
        tracing::info!("reconciliation complete");
        Ok(())
    }

    /// Delete `path` on the remote, keyed by its current version token.
    /// A path the remote already reports as absent is success.
    async fn delete_remote(&self, host: &dyn RemoteHost, path: &str) -> Result<()> {
        let blob = match host.get_content(path).await {
            Ok(blob) => blob,
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(Error::sync(path, err)),
        };
        let message = format!("vault: delete {path}");
        host.delete_content(path, &blob.version, &message)
            .await
            .map_err(|err| Error::sync(path, err))
    }

    /// Create or update one document on the remote.
    ///
    /// A missing remote object becomes a create. An existing one is updated
    /// keyed by the fetched token; on a version conflict the token is
    /// re-fetched and the update re-issued exactly once. Any other failure,
    /// or a failure of the retry itself, aborts.
    async fn push_document(&self, host: &dyn RemoteHost, document: &Document) -> Result<()> {
        let path = document.path.as_str();
        let message = format!("vault: sync {path}");

        let blob = match host.get_content(path).await {
            Ok(blob) => blob,
            Err(err) if err.is_not_found() => {
                host.create_content(path, &document.content, &message)
                    .await
                    .map_err(|err| Error::sync(path, err))?;
                return Ok(());
            }
            Err(err) => return Err(Error::sync(path, err)),
        };

        match host
            .update_content(path, &document.content, &blob.version, &message)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if err.is_conflict() => {
                // The remote moved between fetch and update. One retry with
                // a fresh token; a losing writer past this point is a hard
                // failure (last-writer-wins, no content re-diff).
                tracing::warn!(%path, "version conflict, retrying once with fresh token");
                let fresh = host
                    .get_content(path)
                    .await
                    .map_err(|err| Error::sync(path, err))?;
                host.update_content(path, &document.content, &fresh.version, &message)
                    .await
                    .map_err(|err| Error::sync(path, err))?;
                Ok(())
            }
            Err(err) => Err(Error::sync(path, err)),
        }
    }
}
