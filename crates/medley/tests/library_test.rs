//! End-to-end test over the facade crate, against a real local disk.

use medley::{
    ArchiveStreamer, BlobStore, ByteSource, Conversion, InMemoryMetadataStore, LibraryConfig,
    LocalDisk, Manipulation, MediaDerivationPipeline, MediaItem, PassthroughEngine,
};
use std::io::Cursor;
use std::sync::Arc;

#[tokio::test]
async fn test_ingest_then_archive_on_local_disk() {
    let root = tempfile::tempdir().unwrap();
    let store = Arc::new(
        BlobStore::new().with_disk("local", LocalDisk::new(root.path().join("media")).unwrap()),
    );
    let metadata = Arc::new(InMemoryMetadataStore::with_conversions(vec![
        Conversion::new("thumb").add(Manipulation::Resize {
            width: 200,
            height: 200,
        }),
    ]));
    let pipeline = MediaDerivationPipeline::new(
        store.clone(),
        Arc::new(PassthroughEngine::new()),
        metadata,
        LibraryConfig::default(),
    );

    let photo = MediaItem::new(1u64, "photo.png", "local");
    let scan = MediaItem::new(2u64, "photo.png", "local");
    let sources: [(&MediaItem, &[u8]); 2] = [(&photo, b"photo bytes"), (&scan, b"scan bytes")];
    for (media, bytes) in sources {
        let report = pipeline
            .ingest(ByteSource::Bytes(bytes.to_vec()), media, None)
            .await
            .unwrap();
        assert!(report.is_complete());
    }

    // Files exist on the real filesystem at their id-derived paths.
    assert!(root.path().join("media/media/1/photo.png").is_file());
    assert!(
        root.path()
            .join("media/media/1/conversions/photo-thumb.png")
            .is_file()
    );

    let streamer = ArchiveStreamer::create("photos.zip", store).add_all([photo, scan]);
    let cursor = streamer.stream_into(Cursor::new(Vec::new())).await.unwrap();

    let bytes = cursor.into_inner();
    assert!(bytes.starts_with(b"PK"));

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.by_index(0).unwrap().name(), "photo.png");
    assert_eq!(archive.by_index(1).unwrap().name(), "photo (1).png");
}
