//! Minimal end-to-end run against an in-memory disk.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use medley::{
    BlobStore, ByteSource, Conversion, InMemoryMetadataStore, LibraryConfig, Manipulation,
    MediaDerivationPipeline, MediaItem, MemoryDisk, PassthroughEngine,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));
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

    let media = MediaItem::new(1u64, "photo.png", "mem");
    let report = pipeline
        .ingest(ByteSource::Bytes(b"not really a png".to_vec()), &media, None)
        .await?;

    println!("original stored at {}", report.original_path());
    for path in store.list_files("media/1", &"mem".into()).await? {
        println!("  {path}");
    }

    Ok(())
}
