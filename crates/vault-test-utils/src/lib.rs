//! Shared test utilities for the vault-sync workspace.
//!
//! Provides an in-memory [`FakeHost`] implementing the remote content host
//! capability, with call recording and failure injection, so the engine and
//! seed importer can be exercised without any network dependency. It is a
//! dev-dependency only — never published.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use vault_remote::{
    EntryKind, Error, HostFactory, RemoteBlob, RemoteEntry, RemoteHost, Result, VersionToken,
};
use vault_store::RemoteCoords;

/// One recorded remote call, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Create(String),
    Update(String),
    Delete(String),
    List(String),
}

#[derive(Debug, Clone)]
struct FakeFile {
    content: String,
    version: u64,
}

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<String, FakeFile>,
    /// Extra non-file, non-dir entries surfaced in directory listings.
    other_entries: BTreeMap<String, Vec<String>>,
    calls: Vec<Call>,
    /// Paths whose reads fail with a transport error.
    broken: Vec<String>,
    /// Per-path count of update attempts to reject with a conflict,
    /// regardless of the token presented.
    forced_conflicts: BTreeMap<String, usize>,
    next_version: u64,
}

impl Inner {
    fn next_token(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }
}

/// In-memory remote host with compare-and-swap semantics.
///
/// Writes are keyed by version tokens exactly like the real host: presenting
/// a stale token yields a conflict. Tests can additionally force conflicts,
/// break paths, and inspect the recorded call sequence.
#[derive(Debug, Default)]
pub struct FakeHost {
    inner: Mutex<Inner>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Plant a file on the remote without recording a call.
    pub fn seed_file(&self, path: &str, content: &str) {
        let mut inner = self.lock();
        let version = inner.next_token();
        inner.files.insert(
            path.to_string(),
            FakeFile {
                content: content.to_string(),
                version,
            },
        );
    }

    /// Surface an extra entry of unrecognized type in `dir`'s listing.
    pub fn seed_other_entry(&self, dir: &str, name: &str) {
        self.lock()
            .other_entries
            .entry(dir.to_string())
            .or_default()
            .push(name.to_string());
    }

    /// Reject the next `count` updates at `path` with a conflict, as if a
    /// concurrent external writer moved the version between fetch and write.
    pub fn force_conflicts(&self, path: &str, count: usize) {
        self.lock().forced_conflicts.insert(path.to_string(), count);
    }

    /// Make reads (get/list) of `path` fail with a transport error.
    pub fn break_path(&self, path: &str) {
        self.lock().broken.push(path.to_string());
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Current remote content at `path`, if present.
    pub fn content(&self, path: &str) -> Option<String> {
        self.lock().files.get(path).map(|f| f.content.clone())
    }

    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    fn transport(path: &str) -> Error {
        Error::Transport {
            message: format!("injected failure at {path}"),
        }
    }
}

fn token(version: u64) -> VersionToken {
    VersionToken::new(format!("v{version}"))
}

#[async_trait]
impl RemoteHost for FakeHost {
    async fn get_content(&self, path: &str) -> Result<RemoteBlob> {
        let mut inner = self.lock();
        inner.calls.push(Call::Get(path.to_string()));
        if inner.broken.iter().any(|p| p == path) {
            return Err(Self::transport(path));
        }
        match inner.files.get(path) {
            Some(file) => Ok(RemoteBlob {
                content: file.content.clone(),
                version: token(file.version),
            }),
            None => Err(Error::not_found(path)),
        }
    }

    async fn create_content(
        &self,
        path: &str,
        content: &str,
        _message: &str,
    ) -> Result<VersionToken> {
        let mut inner = self.lock();
        inner.calls.push(Call::Create(path.to_string()));
        if inner.files.contains_key(path) {
            return Err(Error::RemoteApi {
                path: path.to_string(),
                status: 422,
            });
        }
        let version = inner.next_token();
        inner.files.insert(
            path.to_string(),
            FakeFile {
                content: content.to_string(),
                version,
            },
        );
        Ok(token(version))
    }

    async fn update_content(
        &self,
        path: &str,
        content: &str,
        expected: &VersionToken,
        _message: &str,
    ) -> Result<VersionToken> {
        let mut inner = self.lock();
        inner.calls.push(Call::Update(path.to_string()));
        if let Some(remaining) = inner.forced_conflicts.get_mut(path) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::conflict(path));
            }
        }
        let current = match inner.files.get(path) {
            Some(file) => file.version,
            None => return Err(Error::not_found(path)),
        };
        if expected != &token(current) {
            return Err(Error::conflict(path));
        }
        let version = inner.next_token();
        let file = inner.files.get_mut(path).unwrap();
        file.content = content.to_string();
        file.version = version;
        Ok(token(version))
    }

    async fn delete_content(
        &self,
        path: &str,
        expected: &VersionToken,
        _message: &str,
    ) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(Call::Delete(path.to_string()));
        let current = match inner.files.get(path) {
            Some(file) => file.version,
            None => return Err(Error::not_found(path)),
        };
        if expected != &token(current) {
            return Err(Error::conflict(path));
        }
        inner.files.remove(path);
        Ok(())
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let mut inner = self.lock();
        inner.calls.push(Call::List(path.to_string()));
        if inner.broken.iter().any(|p| p == path) {
            return Err(Self::transport(path));
        }
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let mut dirs: Vec<String> = Vec::new();
        let mut entries: Vec<RemoteEntry> = Vec::new();
        for key in inner.files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    if !dirs.iter().any(|d| d == dir) {
                        dirs.push(dir.to_string());
                        entries.push(RemoteEntry {
                            name: dir.to_string(),
                            kind: EntryKind::Dir,
                        });
                    }
                }
                None => entries.push(RemoteEntry {
                    name: rest.to_string(),
                    kind: EntryKind::File,
                }),
            }
        }
        if let Some(names) = inner.other_entries.get(path) {
            for name in names {
                entries.push(RemoteEntry {
                    name: name.clone(),
                    kind: EntryKind::Other,
                });
            }
        }
        Ok(entries)
    }
}

/// [`HostFactory`] handing out one shared [`FakeHost`], recording the
/// coordinates of every open.
pub struct FakeFactory {
    host: Arc<FakeHost>,
    opened: Mutex<Vec<RemoteCoords>>,
}

impl FakeFactory {
    pub fn new(host: Arc<FakeHost>) -> Arc<Self> {
        Arc::new(Self {
            host,
            opened: Mutex::new(Vec::new()),
        })
    }

    /// How many times the engine asked for a host.
    pub fn open_count(&self) -> usize {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl HostFactory for FakeFactory {
    fn open(&self, coords: &RemoteCoords) -> Arc<dyn RemoteHost> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(coords.clone());
        Arc::clone(&self.host) as Arc<dyn RemoteHost>
    }
}

/// Coordinates with a non-empty credential, for tests that should sync.
pub fn linked_coords() -> RemoteCoords {
    RemoteCoords {
        credential: "test-token".to_string(),
        repo_owner: "octo".to_string(),
        repo_name: "vault".to_string(),
    }
}

/// Coordinates with an empty credential: reconciliation must no-op.
pub fn unlinked_coords() -> RemoteCoords {
    RemoteCoords {
        credential: String::new(),
        repo_owner: "octo".to_string(),
        repo_name: "vault".to_string(),
    }
}
