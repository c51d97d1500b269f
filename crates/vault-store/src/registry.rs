//! In-memory, tenant-partitioned document registry
//!
//! The registry is the single shared mutable resource of the system. Each
//! tenant owns one partition guarded by a reader/writer lock; mutations are
//! linearized under that lock and never block on I/O. A path is either a live
//! document or a tombstone, never both; tombstones let deletions propagate to
//! the remote instead of being silently forgotten.
//!
//! Registry state lives only in process memory. It is reseeded from the
//! remote at startup and never rolled back when a remote reconciliation
//! fails — local mutation and remote projection are independent steps.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use crate::document::{Document, RemoteCoords, Snapshot};
use crate::fingerprint::content_fingerprint;

/// One tenant's partition: live documents, deletion tombstones, and the
/// remote repository coordinates, all guarded by the partition lock.
#[derive(Debug, Default)]
struct TenantState {
    documents: HashMap<String, Document>,
    /// path -> deletion stamp, Unix milliseconds
    tombstones: HashMap<String, i64>,
    remote: Option<RemoteCoords>,
}

/// In-memory registry of documents and tombstones, partitioned per tenant.
///
/// All operations are safe for concurrent invocation. Mutations take the
/// partition's exclusive lock for their full duration; reads take the shared
/// lock and may run concurrently with each other but never with a mutation.
/// No operation here can fail — path validity is the caller's job.
#[derive(Debug, Default)]
pub struct Registry {
    tenants: RwLock<HashMap<String, Arc<RwLock<TenantState>>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the document at `path`.
    ///
    /// Clears any tombstone for `path` and stamps the current wall-clock
    /// time. An empty `fingerprint` means "recompute from content"; a
    /// non-empty value is trusted as-is.
    pub fn upsert(&self, tenant: &str, path: &str, content: &str, fingerprint: &str) {
        let partition = self.partition(tenant);
        let mut state = write_lock(&partition);
        let fingerprint = if fingerprint.is_empty() {
            content_fingerprint(content)
        } else {
            fingerprint.to_string()
        };
        state.tombstones.remove(path);
        state.documents.insert(
            path.to_string(),
            Document {
                path: path.to_string(),
                content: content.to_string(),
                fingerprint,
                updated_at_ms: Utc::now().timestamp_millis(),
            },
        );
    }

    /// Remove any document at `path` and install a tombstone.
    ///
    /// Idempotent: deleting an already-deleted or never-existing path still
    /// (re)stamps the tombstone with the current time.
    pub fn delete(&self, tenant: &str, path: &str) {
        let partition = self.partition(tenant);
        let mut state = write_lock(&partition);
        state.documents.remove(path);
        state
            .tombstones
            .insert(path.to_string(), Utc::now().timestamp_millis());
    }

    /// Take a point-in-time copy of the tenant's documents and tombstoned
    /// paths. Ordering is unspecified.
    pub fn snapshot(&self, tenant: &str) -> Snapshot {
        let partition = self.partition(tenant);
        let state = read_lock(&partition);
        Snapshot {
            documents: state.documents.values().cloned().collect(),
            deleted: state.tombstones.keys().cloned().collect(),
        }
    }

    /// Link the tenant to a remote repository.
    pub fn set_remote(&self, tenant: &str, coords: RemoteCoords) {
        let partition = self.partition(tenant);
        let mut state = write_lock(&partition);
        state.remote = Some(coords);
    }

    /// Remote coordinates for the tenant, if linked.
    pub fn remote(&self, tenant: &str) -> Option<RemoteCoords> {
        let partition = self.partition(tenant);
        let state = read_lock(&partition);
        state.remote.clone()
    }

    /// Fetch the tenant's partition, creating it on first use.
    fn partition(&self, tenant: &str) -> Arc<RwLock<TenantState>> {
        {
            let tenants = self
                .tenants
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(partition) = tenants.get(tenant) {
                return Arc::clone(partition);
            }
        }
        let mut tenants = self
            .tenants
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(tenants.entry(tenant.to_string()).or_default())
    }
}

// Lock poisoning is absorbed rather than propagated: the guarded maps stay
// structurally valid even if a writer panicked mid-call, and registry
// operations are contractually infallible.
fn write_lock(partition: &RwLock<TenantState>) -> std::sync::RwLockWriteGuard<'_, TenantState> {
    partition.write().unwrap_or_else(PoisonError::into_inner)
}

fn read_lock(partition: &RwLock<TenantState>) -> std::sync::RwLockReadGuard<'_, TenantState> {
    partition.read().unwrap_or_else(PoisonError::into_inner)
}
