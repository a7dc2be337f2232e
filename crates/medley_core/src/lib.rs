//! Core data types for the Medley media pipeline.
//!
//! This crate provides the foundation data types shared across the Medley
//! workspace: the media item and conversion models, derived artifact status,
//! deterministic path generation and file naming, and the library
//! configuration struct.

mod artifact;
mod config;
mod conversion;
mod ids;
mod media;
mod namer;
mod path;
mod remote;

pub use artifact::{DerivedArtifact, GenerationStatus};
pub use config::LibraryConfig;
pub use conversion::{Conversion, Manipulation};
pub use ids::{DiskId, MediaId};
pub use media::MediaItem;
pub use namer::{DefaultFileNamer, FileNamer};
pub use path::{DefaultPathGenerator, PathGenerator};
pub use remote::RemoteFile;
