//! Disk abstraction and blob storage for the Medley media pipeline.
//!
//! This crate separates two layers:
//!
//! - [`DiskDriver`]: one storage backend (a local directory, an object
//!   store), advertising its semantics through [`DiskCapabilities`] flags
//!   rather than driver-name string checks.
//! - [`BlobStore`]: a registry of named disks exposing the path-level
//!   contract (`put`, `get_stream`, `copy`, `rename`, `delete`, ...) used by
//!   the derivation pipeline and the archive streamer.
//!
//! # Example
//!
//! ```rust
//! use medley_storage::{BlobStore, ByteSource, MemoryDisk};
//! use std::collections::HashMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = BlobStore::new().with_disk("mem", MemoryDisk::new());
//!
//! store
//!     .put(
//!         "media/1/photo.png",
//!         ByteSource::Bytes(vec![0x89, 0x50, 0x4e, 0x47]),
//!         &"mem".into(),
//!         &HashMap::new(),
//!     )
//!     .await?;
//! assert!(store.exists("media/1/photo.png", &"mem".into()).await?);
//! # Ok(())
//! # }
//! ```

mod blob_store;
mod driver;
mod local;
mod memory;

pub use blob_store::BlobStore;
pub use driver::{ByteSource, ByteStream, DiskCapabilities, DiskDriver};
pub use local::LocalDisk;
pub use memory::MemoryDisk;
