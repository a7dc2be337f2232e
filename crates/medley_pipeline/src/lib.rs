//! Media derivation pipeline for the Medley media library.
//!
//! Given a newly accepted original file, the pipeline stores it, runs every
//! configured conversion through an external [`ConversionEngine`], stores the
//! derived artifacts at deterministic paths, and reports per-conversion
//! status back to an external [`MetadataStore`].
//!
//! Collaborators are injected explicitly at construction; there are no
//! service-container or global configuration lookups.
//!
//! # Example
//!
//! ```rust,ignore
//! use medley_pipeline::{InMemoryMetadataStore, MediaDerivationPipeline, PassthroughEngine};
//! use medley_storage::{BlobStore, ByteSource, MemoryDisk};
//! use medley_core::{Conversion, LibraryConfig, Manipulation, MediaItem};
//! use std::sync::Arc;
//!
//! let store = Arc::new(BlobStore::new().with_disk("mem", MemoryDisk::new()));
//! let metadata = Arc::new(InMemoryMetadataStore::with_conversions(vec![
//!     Conversion::new("thumb").add(Manipulation::Resize { width: 200, height: 200 }),
//! ]));
//! let pipeline = MediaDerivationPipeline::new(
//!     store,
//!     Arc::new(PassthroughEngine::new()),
//!     metadata,
//!     LibraryConfig::default(),
//! );
//!
//! let media = MediaItem::new(1u64, "photo.png", "mem");
//! let report = pipeline
//!     .ingest(ByteSource::Bytes(b"png bytes".to_vec()), &media, None)
//!     .await?;
//! assert!(report.is_complete());
//! ```

mod engine;
mod filesystem;
mod metadata;
mod pipeline;
mod report;

pub use engine::{ConversionEngine, PassthroughEngine};
pub use filesystem::{DirectoryKind, MediaFilesystem, content_type_for};
pub use metadata::{InMemoryMetadataStore, MetadataStore};
pub use pipeline::MediaDerivationPipeline;
pub use report::IngestReport;
