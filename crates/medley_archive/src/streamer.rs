//! The archive streamer.

use crc32fast::Hasher;
use flate2::Compression;
use flate2::write::DeflateEncoder;
use medley_core::{DefaultPathGenerator, MediaItem, PathGenerator};
use medley_error::{ArchiveError, ArchiveErrorKind, MedleyResult, StoreError};
use medley_storage::BlobStore;
use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Custom property naming the per-item entry prefix.
pub const DEFAULT_PREFIX_PROPERTY: &str = "zip_filename_prefix";

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;
const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;
const VERSION_NEEDED: u16 = 20;
/// General-purpose bit 3: sizes and CRC follow the data in a descriptor.
const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
const METHOD_DEFLATED: u16 = 8;

/// Aggregates stored media items into one streamed zip archive.
///
/// The container is written in streaming mode: member sizes are unknown
/// ahead of time, so each local header carries the data-descriptor flag and
/// the CRC and sizes trail the member's bytes. The sink therefore only needs
/// [`Write`]; nothing is ever seeked or rewritten.
///
/// # Example
///
/// ```rust,ignore
/// let streamer = ArchiveStreamer::create("photos.zip", store)
///     .add_media(first)
///     .add_media(second);
/// let cursor = streamer.stream_into(std::io::Cursor::new(Vec::new())).await?;
/// ```
pub struct ArchiveStreamer {
    archive_name: String,
    store: Arc<BlobStore>,
    paths: Arc<dyn PathGenerator>,
    prefix_property: String,
    items: Vec<MediaItem>,
}

impl ArchiveStreamer {
    /// Start an empty archive with the given download name.
    pub fn create(archive_name: impl Into<String>, store: Arc<BlobStore>) -> Self {
        Self {
            archive_name: archive_name.into(),
            store,
            paths: Arc::new(DefaultPathGenerator::default()),
            prefix_property: DEFAULT_PREFIX_PROPERTY.to_string(),
            items: Vec::new(),
        }
    }

    /// Replace the path generator.
    pub fn with_path_generator(mut self, paths: Arc<dyn PathGenerator>) -> Self {
        self.paths = paths;
        self
    }

    /// Read entry prefixes from a different custom property.
    pub fn with_prefix_property(mut self, property: impl Into<String>) -> Self {
        self.prefix_property = property.into();
        self
    }

    /// Append one media item; insertion order decides entry order and
    /// collision numbering.
    pub fn add_media(mut self, media: MediaItem) -> Self {
        self.items.push(media);
        self
    }

    /// Append many media items in order.
    pub fn add_all(mut self, items: impl IntoIterator<Item = MediaItem>) -> Self {
        self.items.extend(items);
        self
    }

    /// Download name of the archive.
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// The items added so far, in entry order.
    pub fn media_items(&self) -> &[MediaItem] {
        &self.items
    }

    /// The in-archive name of every entry, collisions resolved.
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.items.len()).map(|i| self.entry_name(i)).collect()
    }

    fn prefix_of(&self, index: usize) -> &str {
        self.items[index]
            .property_str(&self.prefix_property)
            .unwrap_or("")
    }

    /// Collision counting only looks backwards, so adding items never renames
    /// entries already emitted.
    fn entry_name(&self, index: usize) -> String {
        let prefix = self.prefix_of(index);
        let file_name = &self.items[index].file_name;
        let full_name = format!("{prefix}{file_name}");

        let duplicates = (0..index)
            .filter(|&earlier| {
                format!("{}{}", self.prefix_of(earlier), self.items[earlier].file_name)
                    == full_name
            })
            .count();

        if duplicates == 0 {
            return full_name;
        }

        match file_name.rsplit_once('.') {
            Some((stem, ext)) => format!("{prefix}{stem} ({duplicates}).{ext}"),
            None => format!("{prefix}{file_name} ({duplicates})"),
        }
    }

    /// Write the archive into a sink, one member at a time.
    ///
    /// Each member's stream is opened, deflated in fixed-size chunks, and
    /// dropped before the next entry begins. Dropping the returned future
    /// mid-iteration abandons the sink without ever writing the container's
    /// central directory, so a cancelled archive can't pass for a complete
    /// one.
    #[tracing::instrument(skip(self, sink), fields(archive = %self.archive_name, members = self.items.len()))]
    pub async fn stream_into<W: Write>(&self, mut sink: W) -> MedleyResult<W> {
        let mut offset: u64 = 0;
        let mut directory = Vec::with_capacity(self.items.len());
        let mut buffer = [0u8; 8 * 1024];

        for (index, media) in self.items.iter().enumerate() {
            let entry_name = self.entry_name(index);
            let header_offset = offset;

            let source = format!("{}{}", self.paths.path(media), media.file_name);
            let mut stream = self
                .store
                .get_stream(&source, &media.disk)
                .await
                .map_err(ArchiveError::new)?;

            let header = local_header(&entry_name);
            sink.write_all(&header).map_err(sink_failure)?;
            offset += header.len() as u64;

            let mut hasher = Hasher::new();
            let mut uncompressed: u64 = 0;
            let mut encoder =
                DeflateEncoder::new(CountingWriter::new(&mut sink), Compression::default());

            loop {
                let read = stream.read(&mut buffer).await.map_err(|e| {
                    ArchiveError::new(ArchiveErrorKind::Store(StoreError::from_io(
                        source.clone(),
                        &e,
                    )))
                })?;
                if read == 0 {
                    break;
                }
                hasher.update(&buffer[..read]);
                uncompressed += read as u64;
                encoder.write_all(&buffer[..read]).map_err(sink_failure)?;
            }

            let compressed = encoder.finish().map_err(sink_failure)?.written();
            let record = EntryRecord {
                name: entry_name,
                crc: hasher.finalize(),
                compressed,
                uncompressed,
                header_offset,
            };

            sink.write_all(&data_descriptor(&record)).map_err(sink_failure)?;
            offset += compressed + 16;

            tracing::debug!(entry = %record.name, source = %source, "Wrote archive entry");
            directory.push(record);
        }

        let directory_offset = offset;
        let mut directory_size: u64 = 0;
        for record in &directory {
            let entry = central_directory_entry(record);
            sink.write_all(&entry).map_err(sink_failure)?;
            directory_size += entry.len() as u64;
        }

        sink.write_all(&end_of_central_directory(
            directory.len(),
            directory_size,
            directory_offset,
        ))
        .map_err(sink_failure)?;
        sink.flush().map_err(sink_failure)?;

        Ok(sink)
    }
}

/// One finished member, as remembered for the central directory.
struct EntryRecord {
    name: String,
    crc: u32,
    compressed: u64,
    uncompressed: u64,
    header_offset: u64,
}

fn sink_failure(err: std::io::Error) -> ArchiveError {
    ArchiveError::new(ArchiveErrorKind::Sink(err.to_string()))
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Local file header with zeroed CRC and sizes; the data descriptor carries
/// the real values once the member's length is known.
fn local_header(name: &str) -> Vec<u8> {
    let mut header = Vec::with_capacity(30 + name.len());
    put_u32(&mut header, LOCAL_HEADER_SIGNATURE);
    put_u16(&mut header, VERSION_NEEDED);
    put_u16(&mut header, FLAG_DATA_DESCRIPTOR);
    put_u16(&mut header, METHOD_DEFLATED);
    put_u16(&mut header, 0); // modification time
    put_u16(&mut header, 0); // modification date
    put_u32(&mut header, 0); // crc, deferred to the descriptor
    put_u32(&mut header, 0); // compressed size, deferred
    put_u32(&mut header, 0); // uncompressed size, deferred
    put_u16(&mut header, name.len() as u16);
    put_u16(&mut header, 0); // extra field length
    header.extend_from_slice(name.as_bytes());
    header
}

fn data_descriptor(record: &EntryRecord) -> Vec<u8> {
    let mut descriptor = Vec::with_capacity(16);
    put_u32(&mut descriptor, DATA_DESCRIPTOR_SIGNATURE);
    put_u32(&mut descriptor, record.crc);
    put_u32(&mut descriptor, record.compressed as u32);
    put_u32(&mut descriptor, record.uncompressed as u32);
    descriptor
}

fn central_directory_entry(record: &EntryRecord) -> Vec<u8> {
    let mut entry = Vec::with_capacity(46 + record.name.len());
    put_u32(&mut entry, CENTRAL_DIRECTORY_SIGNATURE);
    put_u16(&mut entry, VERSION_NEEDED); // version made by
    put_u16(&mut entry, VERSION_NEEDED);
    put_u16(&mut entry, FLAG_DATA_DESCRIPTOR);
    put_u16(&mut entry, METHOD_DEFLATED);
    put_u16(&mut entry, 0); // modification time
    put_u16(&mut entry, 0); // modification date
    put_u32(&mut entry, record.crc);
    put_u32(&mut entry, record.compressed as u32);
    put_u32(&mut entry, record.uncompressed as u32);
    put_u16(&mut entry, record.name.len() as u16);
    put_u16(&mut entry, 0); // extra field length
    put_u16(&mut entry, 0); // comment length
    put_u16(&mut entry, 0); // starting disk
    put_u16(&mut entry, 0); // internal attributes
    put_u32(&mut entry, 0); // external attributes
    put_u32(&mut entry, record.header_offset as u32);
    entry.extend_from_slice(record.name.as_bytes());
    entry
}

fn end_of_central_directory(entries: usize, size: u64, offset: u64) -> Vec<u8> {
    let mut trailer = Vec::with_capacity(22);
    put_u32(&mut trailer, END_OF_CENTRAL_DIRECTORY_SIGNATURE);
    put_u16(&mut trailer, 0); // this disk
    put_u16(&mut trailer, 0); // directory start disk
    put_u16(&mut trailer, entries as u16);
    put_u16(&mut trailer, entries as u16);
    put_u32(&mut trailer, size as u32);
    put_u32(&mut trailer, offset as u32);
    put_u16(&mut trailer, 0); // comment length
    trailer
}

/// Counts bytes passing through to the wrapped writer.
struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    fn written(&self) -> u64 {
        self.written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_header_is_fixed_size_plus_name() {
        let header = local_header("photos/a.jpg");
        assert_eq!(header.len(), 30 + "photos/a.jpg".len());
        assert_eq!(&header[..4], b"PK\x03\x04");
        // The data-descriptor flag is set; sizes in the header stay zero.
        assert_eq!(u16::from_le_bytes([header[6], header[7]]), FLAG_DATA_DESCRIPTOR);
        assert_eq!(&header[14..26], &[0u8; 12]);
    }

    #[test]
    fn descriptor_carries_crc_and_sizes() {
        let record = EntryRecord {
            name: "a.jpg".to_string(),
            crc: 0xdead_beef,
            compressed: 5,
            uncompressed: 11,
            header_offset: 0,
        };
        let descriptor = data_descriptor(&record);
        assert_eq!(&descriptor[..4], b"PK\x07\x08");
        assert_eq!(u32::from_le_bytes([descriptor[4], descriptor[5], descriptor[6], descriptor[7]]), 0xdead_beef);
        assert_eq!(u32::from_le_bytes([descriptor[8], descriptor[9], descriptor[10], descriptor[11]]), 5);
        assert_eq!(u32::from_le_bytes([descriptor[12], descriptor[13], descriptor[14], descriptor[15]]), 11);
    }
}
