//! Filesystem backend tests.

use bytes::Bytes;
use futures::stream;
use strata_storage::traits::{ObjectStore, Payload};
use strata_storage::{FilesystemBackend, StorageError};
use tempfile::tempdir;

async fn backend() -> (tempfile::TempDir, FilesystemBackend) {
    let temp = tempdir().unwrap();
    let backend = FilesystemBackend::new(temp.path().join("store"))
        .await
        .unwrap();
    (temp, backend)
}

#[tokio::test]
async fn put_get_roundtrip() {
    let (_temp, backend) = backend().await;

    backend
        .put("blk/index", Payload::from_bytes(Bytes::from_static(b"idx")))
        .await
        .unwrap();
    assert_eq!(backend.get("blk/index").await.unwrap().as_ref(), b"idx");
}

#[tokio::test]
async fn put_streams_chunked_payloads() {
    let (_temp, backend) = backend().await;

    let chunks = vec![
        Ok(Bytes::from_static(b"abc")),
        Ok(Bytes::from_static(b"def")),
        Ok(Bytes::from_static(b"g")),
    ];
    let payload = Payload::new(7, Box::pin(stream::iter(chunks)));

    backend.put("blk/chunks/000001", payload).await.unwrap();
    assert_eq!(
        backend.get("blk/chunks/000001").await.unwrap().as_ref(),
        b"abcdefg"
    );
}

#[tokio::test]
async fn put_overwrites_existing_objects() {
    let (_temp, backend) = backend().await;

    backend
        .put("blk/index", Payload::from_bytes(Bytes::from_static(b"one")))
        .await
        .unwrap();
    backend
        .put("blk/index", Payload::from_bytes(Bytes::from_static(b"two")))
        .await
        .unwrap();
    assert_eq!(backend.get("blk/index").await.unwrap().as_ref(), b"two");
}

#[tokio::test]
async fn put_failed_stream_leaves_no_object() {
    let (_temp, backend) = backend().await;

    let chunks: Vec<Result<Bytes, StorageError>> = vec![
        Ok(Bytes::from_static(b"abc")),
        Err(StorageError::Io(std::io::Error::other("disconnect"))),
    ];
    let payload = Payload::new(100, Box::pin(stream::iter(chunks)));

    assert!(backend.put("blk/index", payload).await.is_err());
    match backend.get("blk/index").await {
        Err(StorageError::NotFound(_)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
    // The aborted transfer's temp file is cleaned up too.
    assert!(backend.list("blk/").await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_length_objects_are_listed() {
    let (_temp, backend) = backend().await;

    backend.put("blk/a.lock", Payload::empty()).await.unwrap();

    assert_eq!(backend.list("blk/").await.unwrap(), vec!["blk/a.lock"]);
    assert!(backend.get("blk/a.lock").await.unwrap().is_empty());
}

#[tokio::test]
async fn list_walks_nested_directories() {
    let (_temp, backend) = backend().await;

    for key in ["blk/index", "blk/chunks/000001", "blk/chunks/000002"] {
        backend
            .put(key, Payload::from_bytes(Bytes::from_static(b"x")))
            .await
            .unwrap();
    }
    backend
        .put("other/index", Payload::from_bytes(Bytes::from_static(b"y")))
        .await
        .unwrap();

    let mut keys = backend.list("blk/").await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["blk/chunks/000001", "blk/chunks/000002", "blk/index"]);
}

#[tokio::test]
async fn list_of_missing_prefix_is_empty() {
    let (_temp, backend) = backend().await;
    assert!(backend.list("nothing/").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_objects_and_reports_missing() {
    let (_temp, backend) = backend().await;

    backend
        .put("blk/a.lock", Payload::from_bytes(Bytes::new()))
        .await
        .unwrap();
    backend.delete("blk/a.lock").await.unwrap();

    match backend.delete("blk/a.lock").await {
        Err(StorageError::NotFound(_)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn traversal_keys_are_rejected() {
    let (_temp, backend) = backend().await;

    for key in ["../escape", "a/../../escape", "/abs", ""] {
        match backend.put(key, Payload::empty()).await {
            Err(StorageError::InvalidKey(_)) => {}
            other => panic!("expected InvalidKey for {key:?}, got {other:?}"),
        }
    }
}
