//! Seed importer
//!
//! Walks the remote repository tree once at process start and returns every
//! matching document so the caller can repopulate the in-memory registry.
//! The walk is unbounded by design; callers wrap the whole import in a
//! deadline (`tokio::time::timeout`) and start with an empty registry when
//! it fails or expires.

use std::sync::Arc;

use chrono::Utc;
use vault_remote::{EntryKind, HostFactory};
use vault_store::{Document, RemoteCoords, content_fingerprint};

use crate::error::{Error, Result};

/// Files with this extension (case-insensitive) are recognized as documents.
pub const DOCUMENT_EXTENSION: &str = ".md";

/// Imports existing remote documents at startup.
pub struct SeedImporter {
    factory: Arc<dyn HostFactory>,
}

impl SeedImporter {
    pub fn new(factory: Arc<dyn HostFactory>) -> Self {
        Self { factory }
    }

    /// Walk the remote tree from its root and return all documents.
    ///
    /// Directories are descended into; files ending in
    /// [`DOCUMENT_EXTENSION`] are fetched and fingerprinted; everything else
    /// is skipped silently. Absent coordinates or an empty credential yield
    /// an empty result — startup must tolerate an unconfigured remote. The
    /// first fetch or list error aborts the entire walk; there is no partial
    /// import.
    pub async fn import_all(&self, coords: Option<&RemoteCoords>) -> Result<Vec<Document>> {
        let Some(coords) = coords.filter(|c| !c.credential.is_empty()) else {
            tracing::debug!("remote not configured; seeding skipped");
            return Ok(Vec::new());
        };
        let host = self.factory.open(coords);

        let mut documents = Vec::new();
        // Work list of directories still to visit, starting at the root.
        let mut pending = vec![String::new()];
        while let Some(dir) = pending.pop() {
            let entries = host
                .list_dir(&dir)
                .await
                .map_err(|err| Error::seed(&dir, err))?;
            for entry in entries {
                let path = if dir.is_empty() {
                    entry.name
                } else {
                    format!("{dir}/{}", entry.name)
                };
                match entry.kind {
                    EntryKind::Dir => pending.push(path),
                    EntryKind::File => {
                        if !path.to_ascii_lowercase().ends_with(DOCUMENT_EXTENSION) {
                            continue;
                        }
                        let blob = host
                            .get_content(&path)
                            .await
                            .map_err(|err| Error::seed(&path, err))?;
                        let fingerprint = content_fingerprint(&blob.content);
                        documents.push(Document {
                            path,
                            content: blob.content,
                            fingerprint,
                            updated_at_ms: Utc::now().timestamp_millis(),
                        });
                    }
                    EntryKind::Other => {}
                }
            }
        }
        tracing::info!(documents = documents.len(), "seeded documents from remote");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vault_test_utils::{FakeFactory, FakeHost, linked_coords, unlinked_coords};

    #[tokio::test]
    async fn empty_credential_yields_empty_result() {
        let host = FakeHost::new();
        host.seed_file("a.md", "ignored");
        let factory = FakeFactory::new(Arc::clone(&host));
        let importer = SeedImporter::new(factory.clone());

        let docs = importer.import_all(Some(&unlinked_coords())).await.unwrap();
        assert!(docs.is_empty());
        assert_eq!(factory.open_count(), 0);
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn walks_nested_directories_and_filters_by_extension() {
        let host = FakeHost::new();
        host.seed_file("README.txt", "not a document");
        host.seed_file("notes/a.md", "# hello\n");
        host.seed_file("notes/deep/b.MD", "upper-case extension");
        host.seed_other_entry("", "linked-thing");
        let importer = SeedImporter::new(FakeFactory::new(Arc::clone(&host)));

        let mut docs = importer.import_all(Some(&linked_coords())).await.unwrap();
        docs.sort_by(|a, b| a.path.cmp(&b.path));

        let paths: Vec<&str> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["notes/a.md", "notes/deep/b.MD"]);
        assert_eq!(docs[0].content, "# hello\n");
        assert_eq!(docs[0].fingerprint, content_fingerprint("# hello\n"));
    }

    #[tokio::test]
    async fn single_document_in_single_directory() {
        let host = FakeHost::new();
        host.seed_file("Vault/note.md", "# hello\n");
        let importer = SeedImporter::new(FakeFactory::new(Arc::clone(&host)));

        let docs = importer.import_all(Some(&linked_coords())).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "Vault/note.md");
        assert_eq!(docs[0].content, "# hello\n");
    }

    #[tokio::test]
    async fn list_failure_aborts_whole_walk() {
        let host = FakeHost::new();
        host.seed_file("notes/a.md", "x");
        host.break_path("notes");
        let importer = SeedImporter::new(FakeFactory::new(Arc::clone(&host)));

        let err = importer.import_all(Some(&linked_coords())).await.unwrap_err();
        assert!(matches!(err, Error::Seed { .. }));
    }

    #[tokio::test]
    async fn fetch_failure_aborts_whole_walk() {
        let host = FakeHost::new();
        host.seed_file("a.md", "x");
        host.break_path("a.md");
        let importer = SeedImporter::new(FakeFactory::new(Arc::clone(&host)));

        let err = importer.import_all(Some(&linked_coords())).await.unwrap_err();
        assert!(matches!(err.remote(), vault_remote::Error::Transport { .. }));
    }
}
