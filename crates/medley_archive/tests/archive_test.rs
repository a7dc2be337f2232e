//! Tests for the archive streamer.

use medley_archive::ArchiveStreamer;
use medley_core::MediaItem;
use medley_error::StoreError;
use medley_storage::{BlobStore, ByteSource, ByteStream, DiskCapabilities, DiskDriver, MemoryDisk};
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};

async fn store_with(items: &[(&MediaItem, &[u8])]) -> Arc<BlobStore> {
    let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));
    for (media, data) in items {
        let path = format!("media/{}/{}", media.id, media.file_name);
        store
            .put(
                &path,
                ByteSource::Bytes(data.to_vec()),
                &media.disk,
                &HashMap::new(),
            )
            .await
            .unwrap();
    }
    store
}

#[tokio::test]
async fn test_duplicate_file_names_get_numbered_suffixes() {
    let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));

    let streamer = ArchiveStreamer::create("photos.zip", store)
        .add_media(MediaItem::new(1u64, "a.jpg", "mem"))
        .add_media(MediaItem::new(2u64, "a.jpg", "mem"))
        .add_media(MediaItem::new(3u64, "b.png", "mem"))
        .add_media(MediaItem::new(4u64, "a.jpg", "mem"));

    assert_eq!(
        streamer.entry_names(),
        vec!["a.jpg", "a (1).jpg", "b.png", "a (2).jpg"]
    );
}

#[tokio::test]
async fn test_prefixes_keep_entries_distinct() {
    let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));

    let streamer = ArchiveStreamer::create("albums.zip", store)
        .add_media(
            MediaItem::new(1u64, "cover.jpg", "mem").with_property("zip_filename_prefix", "red/"),
        )
        .add_media(
            MediaItem::new(2u64, "cover.jpg", "mem").with_property("zip_filename_prefix", "blue/"),
        )
        .add_media(
            MediaItem::new(3u64, "cover.jpg", "mem").with_property("zip_filename_prefix", "red/"),
        );

    assert_eq!(
        streamer.entry_names(),
        vec!["red/cover.jpg", "blue/cover.jpg", "red/cover (1).jpg"]
    );
}

#[tokio::test]
async fn test_prefix_property_name_is_configurable() {
    let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));

    let streamer = ArchiveStreamer::create("export.zip", store)
        .with_prefix_property("folder")
        .add_media(MediaItem::new(1u64, "doc.pdf", "mem").with_property("folder", "2024/"));

    assert_eq!(streamer.entry_names(), vec!["2024/doc.pdf"]);
}

#[tokio::test]
async fn test_file_without_extension_numbers_at_the_end() {
    let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));

    let streamer = ArchiveStreamer::create("raw.zip", store)
        .add_media(MediaItem::new(1u64, "README", "mem"))
        .add_media(MediaItem::new(2u64, "README", "mem"));

    assert_eq!(streamer.entry_names(), vec!["README", "README (1)"]);
}

#[tokio::test]
async fn test_streamed_archive_reads_back() {
    let first = MediaItem::new(1u64, "a.jpg", "mem");
    let second = MediaItem::new(2u64, "a.jpg", "mem");
    let third = MediaItem::new(3u64, "b.png", "mem");
    let store = store_with(&[
        (&first, b"first bytes"),
        (&second, b"second bytes"),
        (&third, b"third bytes"),
    ])
    .await;

    let streamer = ArchiveStreamer::create("photos.zip", store)
        .add_all([first, second, third]);

    let cursor = streamer
        .stream_into(Cursor::new(Vec::new()))
        .await
        .unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["a.jpg", "a (1).jpg", "b.png"]);

    let mut contents = String::new();
    archive
        .by_name("a (1).jpg")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "second bytes");
}

/// Yields its bytes once, then pends forever.
struct StallingReader {
    remaining: Vec<u8>,
}

impl AsyncRead for StallingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if self.remaining.is_empty() {
            return Poll::Pending;
        }
        let data = std::mem::take(&mut self.remaining);
        buf.put_slice(&data);
        Poll::Ready(Ok(()))
    }
}

/// Disk whose reads stall after the first chunk.
struct StallingDisk;

#[async_trait::async_trait]
impl DiskDriver for StallingDisk {
    fn capabilities(&self) -> DiskCapabilities {
        DiskCapabilities {
            implicit_directories: true,
            in_place_copy: false,
            custom_headers: false,
        }
    }

    async fn write(
        &self,
        _path: &str,
        _source: ByteSource,
        _headers: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    async fn read_stream(&self, _path: &str) -> Result<ByteStream, StoreError> {
        Ok(Box::new(StallingReader {
            remaining: b"partial member".to_vec(),
        }))
    }

    async fn copy(&self, _src: &str, _dst: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn rename(&self, _src: &str, _dst: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete(&self, _path: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete_directory(&self, _path: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_files(&self, _dir: &str) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }

    async fn ensure_directory(&self, _path: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn exists(&self, _path: &str) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// A `Write` sink whose buffer survives the writer being dropped.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_cancelled_stream_never_finalizes_the_container() {
    let store = Arc::new(BlobStore::new().with_disk("stall", StallingDisk));
    let streamer = ArchiveStreamer::create("partial.zip", store)
        .add_media(MediaItem::new(1u64, "big.bin", "stall"));

    let sink = SharedSink::default();
    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        streamer.stream_into(sink.clone()),
    )
    .await;
    assert!(outcome.is_err());

    // The local header went out before the stall, but the end-of-central-
    // directory record must never appear: a cancelled archive is visibly
    // truncated, not passably complete.
    let bytes = sink.0.lock().unwrap().clone();
    assert!(bytes.starts_with(b"PK\x03\x04"));
    assert!(!bytes.windows(4).any(|window| window == b"PK\x05\x06"));
}

#[tokio::test]
async fn test_stream_accepts_a_write_only_sink() {
    let media = MediaItem::new(1u64, "a.txt", "mem");
    let store = store_with(&[(&media, b"write-only sink")]).await;
    let streamer = ArchiveStreamer::create("plain.zip", store).add_media(media);

    // SharedSink implements Write and nothing else.
    let sink = streamer.stream_into(SharedSink::default()).await.unwrap();

    let bytes = sink.0.lock().unwrap().clone();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut contents = String::new();
    archive
        .by_name("a.txt")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "write-only sink");
}

#[tokio::test]
async fn test_missing_member_fails_the_stream() {
    let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));
    let streamer = ArchiveStreamer::create("broken.zip", store)
        .add_media(MediaItem::new(1u64, "ghost.png", "mem"));

    let result = streamer.stream_into(Cursor::new(Vec::new())).await;
    assert!(result.is_err());
}
