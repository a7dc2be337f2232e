//! Tests for the local filesystem disk behind the blob store.

use medley_storage::{BlobStore, ByteSource, LocalDisk};
use std::collections::HashMap;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

fn local_store(temp_dir: &TempDir) -> BlobStore {
    BlobStore::new().with_disk("local", LocalDisk::new(temp_dir.path()).unwrap())
}

async fn read_all(store: &BlobStore, path: &str) -> Vec<u8> {
    let mut stream = store.get_stream(path, &"local".into()).await.unwrap();
    let mut data = Vec::new();
    stream.read_to_end(&mut data).await.unwrap();
    data
}

#[tokio::test]
async fn test_put_and_stream_back() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);

    store
        .put(
            "media/1/photo.png",
            ByteSource::Bytes(b"png bytes".to_vec()),
            &"local".into(),
            &HashMap::new(),
        )
        .await
        .unwrap();

    assert!(store.exists("media/1/photo.png", &"local".into()).await.unwrap());
    assert_eq!(read_all(&store, "media/1/photo.png").await, b"png bytes");
}

#[tokio::test]
async fn test_put_replaces_existing_object() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);
    let disk = "local".into();

    store
        .put("a/file.txt", ByteSource::Bytes(b"first".to_vec()), &disk, &HashMap::new())
        .await
        .unwrap();
    store
        .put("a/file.txt", ByteSource::Bytes(b"second".to_vec()), &disk, &HashMap::new())
        .await
        .unwrap();

    assert_eq!(read_all(&store, "a/file.txt").await, b"second");
    assert_eq!(store.list_files("a", &disk).await.unwrap(), vec!["a/file.txt"]);
}

#[tokio::test]
async fn test_copy_and_rename() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);
    let disk = "local".into();

    store
        .put("src/a.txt", ByteSource::Bytes(b"payload".to_vec()), &disk, &HashMap::new())
        .await
        .unwrap();

    store.copy("src/a.txt", "dst/b.txt", &disk).await.unwrap();
    assert!(store.exists("src/a.txt", &disk).await.unwrap());
    assert_eq!(read_all(&store, "dst/b.txt").await, b"payload");

    store.rename("dst/b.txt", "dst/c.txt", &disk).await.unwrap();
    assert!(!store.exists("dst/b.txt", &disk).await.unwrap());
    assert_eq!(read_all(&store, "dst/c.txt").await, b"payload");
}

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);

    let err = store
        .get_stream("nope/missing.bin", &"local".into())
        .await
        .map(|_| ())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_directory_recursively() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);
    let disk = "local".into();

    for path in ["media/5/photo.png", "media/5/conversions/photo-thumb.png"] {
        store
            .put(path, ByteSource::Bytes(b"x".to_vec()), &disk, &HashMap::new())
            .await
            .unwrap();
    }

    store.delete_directory("media/5", &disk).await.unwrap();
    assert!(!store.exists("media/5/photo.png", &disk).await.unwrap());

    // Deleting it again reports not-found; tolerance is the caller's call.
    let err = store.delete_directory("media/5", &disk).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_files_walks_subdirectories() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);
    let disk = "local".into();

    for path in [
        "media/7/photo.png",
        "media/7/conversions/photo-thumb.png",
        "media/7/responsive-images/photo___thumb_640.png",
    ] {
        store
            .put(path, ByteSource::Bytes(b"x".to_vec()), &disk, &HashMap::new())
            .await
            .unwrap();
    }

    let files = store.list_files("media/7", &disk).await.unwrap();
    assert_eq!(
        files,
        vec![
            "media/7/conversions/photo-thumb.png",
            "media/7/photo.png",
            "media/7/responsive-images/photo___thumb_640.png",
        ]
    );
}

#[tokio::test]
async fn test_write_leaves_stem_sharing_objects_alone() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);
    let disk = "local".into();

    // An object whose key equals the naive "swap the extension" temp name.
    store
        .put("a/photo.tmp", ByteSource::Bytes(b"keep me".to_vec()), &disk, &HashMap::new())
        .await
        .unwrap();
    store
        .put("a/photo.png", ByteSource::Bytes(b"image".to_vec()), &disk, &HashMap::new())
        .await
        .unwrap();

    assert_eq!(read_all(&store, "a/photo.tmp").await, b"keep me");
    assert_eq!(read_all(&store, "a/photo.png").await, b"image");
    // No stray temp files left behind either.
    assert_eq!(
        store.list_files("a", &disk).await.unwrap(),
        vec!["a/photo.png", "a/photo.tmp"]
    );
}

#[tokio::test]
async fn test_unknown_disk_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);

    let err = store
        .put(
            "a.txt",
            ByteSource::Bytes(Vec::new()),
            &"s3".into(),
            &HashMap::new(),
        )
        .await
        .unwrap_err();
    assert!(format!("{err}").contains("no disk registered"));
}

#[tokio::test]
async fn test_capability_flags() {
    let temp_dir = TempDir::new().unwrap();
    let store = local_store(&temp_dir);

    let caps = store.capabilities(&"local".into()).unwrap();
    assert!(!caps.implicit_directories);
    assert!(caps.in_place_copy);
    assert!(!caps.custom_headers);
}
