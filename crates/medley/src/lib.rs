//! Medley - Media Derivation and Storage Pipeline
//!
//! Medley stores original media files, derives configured conversions and
//! responsive variants through a pluggable engine, and streams stored items
//! into zip archives, independent of any web framework.
//!
//! # Features
//!
//! - **Multi-disk storage**: Named disks behind one [`BlobStore`], described
//!   by capability flags instead of driver-name checks
//! - **Derivation pipeline**: Per-conversion tracking with partial-failure
//!   reporting; one broken conversion never aborts its siblings
//! - **Deterministic layout**: Id-derived paths and injective derived-file
//!   naming, so renames never move sibling files
//! - **Archive streaming**: Entry-by-entry zip aggregation with order-stable
//!   collision renaming
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use medley::{
//!     BlobStore, ByteSource, Conversion, InMemoryMetadataStore, LibraryConfig,
//!     Manipulation, MediaDerivationPipeline, MediaItem, MemoryDisk, PassthroughEngine,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));
//!     let metadata = Arc::new(InMemoryMetadataStore::with_conversions(vec![
//!         Conversion::new("thumb").add(Manipulation::Resize { width: 200, height: 200 }),
//!     ]));
//!
//!     let pipeline = MediaDerivationPipeline::new(
//!         store,
//!         Arc::new(PassthroughEngine::new()),
//!         metadata,
//!         LibraryConfig::default(),
//!     );
//!
//!     let media = MediaItem::new(1u64, "photo.png", "mem");
//!     let report = pipeline
//!         .ingest(ByteSource::Bytes(std::fs::read("photo.png")?), &media, None)
//!         .await?;
//!     println!("original stored at {}", report.original_path());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Medley is organized as a workspace with focused crates:
//!
//! - `medley_error` - Error types (`StoreError`, `ConversionError`, ...)
//! - `medley_core` - Domain types, path generation, file naming, config
//! - `medley_storage` - Disk drivers and the blob store
//! - `medley_pipeline` - The derivation pipeline and its collaborator traits
//! - `medley_archive` - Zip archive streaming
//!
//! This facade crate re-exports the public surface of all of them.

pub use medley_archive::{ArchiveStreamer, DEFAULT_PREFIX_PROPERTY};
pub use medley_core::{
    Conversion, DefaultFileNamer, DefaultPathGenerator, DerivedArtifact, DiskId, FileNamer,
    GenerationStatus, LibraryConfig, Manipulation, MediaId, MediaItem, PathGenerator, RemoteFile,
};
pub use medley_error::{
    ArchiveError, ArchiveErrorKind, CleanupFailures, ConversionError, ConversionErrorKind,
    ConversionFailure, ConversionFailureKind, MedleyError, MedleyErrorKind, MedleyResult,
    PipelineError, PipelineErrorKind, StoreError, StoreErrorKind,
};
pub use medley_pipeline::{
    ConversionEngine, DirectoryKind, IngestReport, InMemoryMetadataStore, MediaDerivationPipeline,
    MediaFilesystem, MetadataStore, PassthroughEngine, content_type_for,
};
pub use medley_storage::{
    BlobStore, ByteSource, ByteStream, DiskCapabilities, DiskDriver, LocalDisk, MemoryDisk,
};
