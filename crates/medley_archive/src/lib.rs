//! Streaming archive aggregation for Medley media items.
//!
//! [`ArchiveStreamer`] bundles the originals of many media items into a
//! single zip container, pulling each member from the blob store as a stream
//! and writing entry-by-entry, so the archive never holds more than one
//! member's chunk in memory at a time. The container is written in streaming
//! mode — data-descriptor trailers instead of back-patched headers — so any
//! `Write` sink works, sockets and pipes included.
//!
//! Entry names are the items' file names (optionally prefixed per item);
//! collisions are resolved deterministically and order-stably: the Nth
//! duplicate becomes `name (N).ext`, counting only items earlier in the list.

mod streamer;

pub use streamer::{ArchiveStreamer, DEFAULT_PREFIX_PROPERTY};
