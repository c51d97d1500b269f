//! Startup seeding: walking the remote tree into a fresh registry.

use std::sync::Arc;
use std::time::Duration;

use vault_store::Registry;
use vault_sync::SeedImporter;
use vault_test_utils::{FakeFactory, FakeHost, linked_coords};

const TENANT: &str = "tenant-1";

#[tokio::test]
async fn seeds_registry_from_remote_tree() {
    let host = FakeHost::new();
    host.seed_file("Vault/note.md", "# hello\n");
    host.seed_file("Vault/sub/other.md", "nested");
    host.seed_file("image.png", "binary-ish");
    let importer = SeedImporter::new(FakeFactory::new(Arc::clone(&host)));

    // Startup bounds the whole walk with a deadline; expiry is treated like
    // any other failure and the process continues with an empty registry.
    let documents = tokio::time::timeout(
        Duration::from_secs(5),
        importer.import_all(Some(&linked_coords())),
    )
    .await
    .expect("seed import within deadline")
    .unwrap();

    let registry = Registry::new();
    for doc in &documents {
        registry.upsert(TENANT, &doc.path, &doc.content, &doc.fingerprint);
    }

    let snapshot = registry.snapshot(TENANT);
    assert_eq!(snapshot.documents.len(), 2);
    assert!(snapshot.deleted.is_empty());
    let note = snapshot
        .documents
        .iter()
        .find(|d| d.path == "Vault/note.md")
        .expect("seeded note present");
    assert_eq!(note.content, "# hello\n");
}

#[tokio::test]
async fn unconfigured_startup_leaves_registry_empty() {
    let host = FakeHost::new();
    host.seed_file("a.md", "unreachable without credential");
    let importer = SeedImporter::new(FakeFactory::new(Arc::clone(&host)));

    let documents = importer.import_all(None).await.unwrap();
    assert!(documents.is_empty());

    let registry = Registry::new();
    let snapshot = registry.snapshot(TENANT);
    assert!(snapshot.documents.is_empty());
    assert!(snapshot.deleted.is_empty());
}

#[tokio::test]
async fn failed_seed_produces_no_partial_import() {
    let host = FakeHost::new();
    host.seed_file("notes/a.md", "fine");
    host.seed_file("notes/b.md", "fetch of this one breaks");
    host.break_path("notes/b.md");
    let importer = SeedImporter::new(FakeFactory::new(Arc::clone(&host)));

    let result = importer.import_all(Some(&linked_coords())).await;
    assert!(result.is_err());
}
