//! End-to-end reconciliation: registry mutations projected onto an
//! in-memory remote host through the full engine path.

use std::sync::Arc;

use vault_store::Registry;
use vault_sync::SyncEngine;
use vault_test_utils::{Call, FakeFactory, FakeHost, linked_coords};

const TENANT: &str = "tenant-1";

#[tokio::test]
async fn mutations_flow_through_to_remote() {
    let host = FakeHost::new();
    host.seed_file("obsolete.md", "remove me");
    let registry = Registry::new();
    registry.set_remote(TENANT, linked_coords());
    let engine = SyncEngine::new(FakeFactory::new(Arc::clone(&host)));

    registry.upsert(TENANT, "notes/a.md", "alpha", "");
    registry.upsert(TENANT, "notes/b.md", "beta", "");
    registry.delete(TENANT, "obsolete.md");

    let snapshot = registry.snapshot(TENANT);
    let coords = registry.remote(TENANT);
    engine
        .reconcile(coords.as_ref(), &snapshot.documents, &snapshot.deleted)
        .await
        .unwrap();

    assert_eq!(host.content("notes/a.md").as_deref(), Some("alpha"));
    assert_eq!(host.content("notes/b.md").as_deref(), Some("beta"));
    assert_eq!(host.content("obsolete.md"), None);
    assert_eq!(host.file_count(), 2);
}

#[tokio::test]
async fn unlinked_tenant_reconciles_as_noop() {
    let host = FakeHost::new();
    let registry = Registry::new();
    let engine = SyncEngine::new(FakeFactory::new(Arc::clone(&host)));

    registry.upsert(TENANT, "a.md", "local only", "");
    let snapshot = registry.snapshot(TENANT);
    let coords = registry.remote(TENANT);
    engine
        .reconcile(coords.as_ref(), &snapshot.documents, &snapshot.deleted)
        .await
        .unwrap();

    assert!(host.calls().is_empty());
    // Local state is untouched either way.
    assert_eq!(registry.snapshot(TENANT).documents.len(), 1);
}

#[tokio::test]
async fn remote_failure_leaves_local_state_intact() {
    let host = FakeHost::new();
    host.break_path("a.md");
    let registry = Registry::new();
    registry.set_remote(TENANT, linked_coords());
    let engine = SyncEngine::new(FakeFactory::new(Arc::clone(&host)));

    registry.upsert(TENANT, "a.md", "kept locally", "");
    let snapshot = registry.snapshot(TENANT);
    let coords = registry.remote(TENANT);
    let result = engine
        .reconcile(coords.as_ref(), &snapshot.documents, &snapshot.deleted)
        .await;

    assert!(result.is_err());
    // No rollback: local mutation and remote projection are independent.
    let after = registry.snapshot(TENANT);
    assert_eq!(after.documents.len(), 1);
    assert_eq!(after.documents[0].content, "kept locally");
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_mutations_then_reconcile() {
    let host = FakeHost::new();
    let registry = Arc::new(Registry::new());
    registry.set_remote(TENANT, linked_coords());
    let engine = SyncEngine::new(FakeFactory::new(Arc::clone(&host)));

    let mut tasks = Vec::new();
    for i in 0..4 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            for j in 0..25 {
                registry.upsert(TENANT, &format!("notes/{i}-{j}.md"), "body", "");
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let snapshot = registry.snapshot(TENANT);
    assert_eq!(snapshot.documents.len(), 100);

    let coords = registry.remote(TENANT);
    engine
        .reconcile(coords.as_ref(), &snapshot.documents, &snapshot.deleted)
        .await
        .unwrap();
    assert_eq!(host.file_count(), 100);
}

#[tokio::test]
async fn redelete_after_reconcile_is_tolerated() {
    // A tombstone that survives across reconciliations keeps hitting the
    // delete path; the remote reporting it absent stays a success.
    let host = FakeHost::new();
    host.seed_file("once.md", "x");
    let registry = Registry::new();
    registry.set_remote(TENANT, linked_coords());
    let engine = SyncEngine::new(FakeFactory::new(Arc::clone(&host)));

    registry.delete(TENANT, "once.md");
    let coords = registry.remote(TENANT);

    let snapshot = registry.snapshot(TENANT);
    engine
        .reconcile(coords.as_ref(), &snapshot.documents, &snapshot.deleted)
        .await
        .unwrap();
    let snapshot = registry.snapshot(TENANT);
    engine
        .reconcile(coords.as_ref(), &snapshot.documents, &snapshot.deleted)
        .await
        .unwrap();

    let deletes = host
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::Delete(_)))
        .count();
    assert_eq!(deletes, 1);
    assert_eq!(host.content("once.md"), None);
}
