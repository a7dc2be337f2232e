//! Error types for the Medley media pipeline.
//!
//! This crate provides the foundation error types used throughout the Medley workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use medley_error::{MedleyResult, StoreError, StoreErrorKind};
//!
//! fn read_blob() -> MedleyResult<Vec<u8>> {
//!     Err(StoreError::new(StoreErrorKind::NotFound("media/1/photo.png".to_string())))?
//! }
//!
//! match read_blob() {
//!     Ok(data) => println!("Got {} bytes", data.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod conversion;
mod error;
mod pipeline;
mod store;

pub use archive::{ArchiveError, ArchiveErrorKind};
pub use conversion::{ConversionError, ConversionErrorKind};
pub use error::{MedleyError, MedleyErrorKind, MedleyResult};
pub use pipeline::{
    CleanupFailures, ConversionFailure, ConversionFailureKind, PipelineError, PipelineErrorKind,
};
pub use store::{StoreError, StoreErrorKind};
