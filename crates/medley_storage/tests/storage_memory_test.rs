//! Tests for the in-memory object-store disk.

use medley_storage::{BlobStore, ByteSource, DiskDriver, MemoryDisk};
use std::collections::HashMap;
use tokio::io::AsyncReadExt;

#[tokio::test]
async fn test_headers_are_stored_with_objects() {
    let disk = MemoryDisk::new();

    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "image/png".to_string());
    headers.insert("Cache-Control".to_string(), "max-age=3600".to_string());

    disk.write("media/1/photo.png", ByteSource::Bytes(b"png".to_vec()), &headers)
        .await
        .unwrap();

    let stored = disk.headers_of("media/1/photo.png").await.unwrap();
    assert_eq!(stored.get("Content-Type").unwrap(), "image/png");
    assert_eq!(stored.get("Cache-Control").unwrap(), "max-age=3600");
}

#[tokio::test]
async fn test_ensure_directory_is_a_no_op() {
    let store = BlobStore::new().with_disk("mem", MemoryDisk::new());

    // Implicit directories: nothing to create, nothing to fail.
    store
        .ensure_directory("media/1/conversions", &"mem".into())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_directory_removes_prefix_only() {
    let store = BlobStore::new().with_disk("mem", MemoryDisk::new());
    let disk = "mem".into();

    for path in ["media/1/photo.png", "media/10/other.png"] {
        store
            .put(path, ByteSource::Bytes(b"x".to_vec()), &disk, &HashMap::new())
            .await
            .unwrap();
    }

    store.delete_directory("media/1", &disk).await.unwrap();

    // "media/1" is a prefix of "media/10" as a string but not as a directory.
    assert!(!store.exists("media/1/photo.png", &disk).await.unwrap());
    assert!(store.exists("media/10/other.png", &disk).await.unwrap());
}

#[tokio::test]
async fn test_absent_directory_deletes_cleanly() {
    let store = BlobStore::new().with_disk("mem", MemoryDisk::new());

    store
        .delete_directory("media/99", &"mem".into())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_copy_keeps_both_objects() {
    let store = BlobStore::new().with_disk("mem", MemoryDisk::new());
    let disk = "mem".into();

    store
        .put("uploads/in.png", ByteSource::Bytes(b"abc".to_vec()), &disk, &HashMap::new())
        .await
        .unwrap();
    store
        .copy("uploads/in.png", "media/1/in.png", &disk)
        .await
        .unwrap();

    let mut stream = store.get_stream("media/1/in.png", &disk).await.unwrap();
    let mut data = Vec::new();
    stream.read_to_end(&mut data).await.unwrap();
    assert_eq!(data, b"abc");
    assert!(store.exists("uploads/in.png", &disk).await.unwrap());
}
