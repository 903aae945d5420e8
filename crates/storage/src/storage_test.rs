//! Storage adapter tests
//!
//! Lifecycle of a component's storage across restarts, extension selection
//! and closed-client behavior.

use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use crate::{
    ComponentId, ComponentKind, FileStorage, StorageAdapter, StorageError, StorageHost,
    get_storage_client,
};

fn filelog_adapter() -> StorageAdapter {
    StorageAdapter::new(ComponentKind::Receiver, "filelog")
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_file_storage_survives_restart() {
    let dir = TempDir::new().unwrap();
    let host = StorageHost::new().with_file_backed_storage_extension("test", dir.path());
    let value = Bytes::from_static(b"my_value");

    let mut adapter = filelog_adapter();
    adapter.start(&host).await.unwrap();
    adapter.set("key", value.clone()).await.unwrap();
    assert_eq!(adapter.get("key").await.unwrap(), Some(value.clone()));

    // Cycle the component and the extensions
    adapter.shutdown().await.unwrap();
    host.shutdown().await.unwrap();

    let mut adapter = filelog_adapter();
    adapter.start(&host).await.unwrap();
    assert_eq!(adapter.get("key").await.unwrap(), Some(value));

    adapter.delete("key").await.unwrap();
    assert_eq!(adapter.get("key").await.unwrap(), None);

    adapter.shutdown().await.unwrap();
    let err = adapter.get("key").await.unwrap_err();
    assert_eq!(err.to_string(), "client closed");
}

#[tokio::test]
async fn test_file_storage_survives_new_host() {
    let dir = TempDir::new().unwrap();

    {
        let host = StorageHost::new().with_file_backed_storage_extension("file", dir.path());
        let mut adapter = filelog_adapter();
        adapter.start(&host).await.unwrap();
        adapter.set("offset", &b"1024"[..]).await.unwrap();
        adapter.shutdown().await.unwrap();
    }

    let host = StorageHost::new().with_file_backed_storage_extension("file", dir.path());
    let mut adapter = filelog_adapter();
    adapter.start(&host).await.unwrap();
    assert_eq!(
        adapter.get("offset").await.unwrap(),
        Some(Bytes::from_static(b"1024"))
    );
}

#[tokio::test]
async fn test_file_location_is_kind_and_name() {
    let dir = TempDir::new().unwrap();
    let host = StorageHost::new().with_file_backed_storage_extension("file", dir.path());

    let mut adapter = StorageAdapter::new(ComponentKind::Exporter, "otlp/acme");
    adapter.start(&host).await.unwrap();
    adapter.set("k", &b"v"[..]).await.unwrap();

    assert!(dir.path().join("exporter_otlp%2Facme").is_file());
    assert!(!dir.path().join("exporter_otlp%2Facme.tmp").exists());
}

#[tokio::test]
async fn test_components_do_not_share_files() {
    let dir = TempDir::new().unwrap();
    let host = StorageHost::new().with_file_backed_storage_extension("file", dir.path());

    let mut a = StorageAdapter::new(ComponentKind::Receiver, "a");
    let mut b = StorageAdapter::new(ComponentKind::Receiver, "b");
    a.start(&host).await.unwrap();
    b.start(&host).await.unwrap();

    a.set("key", &b"a"[..]).await.unwrap();
    assert_eq!(b.get("key").await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_write_is_not_visible() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state");
    let host = StorageHost::new().with_file_backed_storage_extension("file", &state);

    let mut adapter = filelog_adapter();
    adapter.start(&host).await.unwrap();
    adapter.set("kept", &b"v1"[..]).await.unwrap();

    // Pull the directory out from under the open client
    std::fs::remove_dir_all(&state).unwrap();

    assert!(matches!(
        adapter.set("new", &b"v"[..]).await,
        Err(StorageError::Io { .. })
    ));
    assert_eq!(adapter.get("new").await.unwrap(), None);

    assert!(adapter.set("kept", &b"v2"[..]).await.is_err());
    assert_eq!(
        adapter.get("kept").await.unwrap(),
        Some(Bytes::from_static(b"v1"))
    );

    assert!(adapter.delete("kept").await.is_err());
    assert_eq!(
        adapter.get("kept").await.unwrap(),
        Some(Bytes::from_static(b"v1"))
    );

    // Once the directory is back, the rolled-back writes stay absent on disk
    std::fs::create_dir_all(&state).unwrap();
    adapter.set("other", &b"x"[..]).await.unwrap();
    adapter.shutdown().await.unwrap();

    let mut adapter = filelog_adapter();
    adapter.start(&host).await.unwrap();
    assert_eq!(adapter.get("new").await.unwrap(), None);
    assert_eq!(
        adapter.get("kept").await.unwrap(),
        Some(Bytes::from_static(b"v1"))
    );
}

#[tokio::test]
async fn test_corrupt_file_fails_start() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("receiver_filelog"), b"garbage").unwrap();
    let host = StorageHost::new().with_file_backed_storage_extension("file", dir.path());

    let err = filelog_adapter().start(&host).await.unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }));
}

#[tokio::test]
async fn test_missing_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("state").join("telroute");
    let storage = FileStorage::new(&nested);

    let client = crate::StorageExtension::client(
        &storage,
        &ComponentId::new(ComponentKind::Processor, "routing"),
    )
    .await
    .unwrap();
    client.set("k", Bytes::from_static(b"v")).await.unwrap();

    assert!(nested.join("processor_routing").is_file());
}

#[tokio::test]
async fn test_in_memory_storage_does_not_persist() {
    let host = StorageHost::new().with_in_memory_storage_extension("memory");
    let mut adapter = filelog_adapter();
    adapter.start(&host).await.unwrap();
    adapter.set("key", &b"v"[..]).await.unwrap();
    adapter.shutdown().await.unwrap();
    host.shutdown().await.unwrap();

    let mut adapter = filelog_adapter();
    adapter.start(&host).await.unwrap();
    assert_eq!(adapter.get("key").await.unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_writes() {
    let dir = TempDir::new().unwrap();
    let host = StorageHost::new().with_file_backed_storage_extension("file", dir.path());
    let client = get_storage_client(&host, &ComponentId::new(ComponentKind::Receiver, "filelog"))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let client = Arc::clone(&client);
        tasks.push(tokio::spawn(async move {
            client
                .set(&format!("key-{i}"), Bytes::from(format!("value-{i}")))
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    client.close().await.unwrap();

    let reopened = get_storage_client(&host, &ComponentId::new(ComponentKind::Receiver, "filelog"))
        .await
        .unwrap();
    for i in 0..8 {
        assert_eq!(
            reopened.get(&format!("key-{i}")).await.unwrap(),
            Some(Bytes::from(format!("value-{i}")))
        );
    }
}

// ============================================================================
// Extension Selection Tests
// ============================================================================

#[tokio::test]
async fn test_fail_on_multiple_storage_extensions() {
    let host = StorageHost::new()
        .with_in_memory_storage_extension("one")
        .with_in_memory_storage_extension("two");

    let mut adapter = filelog_adapter();
    let err = adapter.start(&host).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "storage client: multiple storage extensions found"
    );
    assert!(adapter.client().is_none());
}

#[tokio::test]
async fn test_mixed_extensions_also_fail() {
    let dir = TempDir::new().unwrap();
    let host = StorageHost::new()
        .with_in_memory_storage_extension("memory")
        .with_file_backed_storage_extension("file", dir.path());

    let err = filelog_adapter().start(&host).await.unwrap_err();
    assert!(matches!(err, StorageError::MultipleExtensions));
    // Nothing was opened, so nothing was written
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_no_extension_gives_nop_client() {
    let host = StorageHost::new();
    assert!(host.is_empty());

    let mut adapter = filelog_adapter();
    adapter.start(&host).await.unwrap();
    adapter.set("key", &b"v"[..]).await.unwrap();
    assert_eq!(adapter.get("key").await.unwrap(), None);

    adapter.shutdown().await.unwrap();
    assert!(matches!(
        adapter.delete("key").await,
        Err(StorageError::ClientClosed)
    ));
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_operations_before_start() {
    let adapter = filelog_adapter();
    assert!(matches!(
        adapter.get("key").await,
        Err(StorageError::NotStarted)
    ));
}

#[tokio::test]
async fn test_shutdown_without_start_is_ok() {
    let mut adapter = filelog_adapter();
    adapter.shutdown().await.unwrap();
    adapter.shutdown().await.unwrap();
}

#[test]
fn test_host_debug_lists_extensions() {
    let host = StorageHost::new()
        .with_in_memory_storage_extension("memory")
        .with_file_backed_storage_extension("file", "/tmp/unused");
    let debug = format!("{host:?}");
    assert!(debug.contains("memory (memory)"));
    assert!(debug.contains("file (file)"));
    assert_eq!(host.len(), 2);
    assert_eq!(
        host.extensions().map(|(n, _)| n).collect::<Vec<_>>(),
        vec!["memory", "file"]
    );
}
