//! Storage-side plumbing shared by the pipeline operations.

use medley_core::{
    Conversion, DefaultFileNamer, DefaultPathGenerator, DiskId, FileNamer, LibraryConfig,
    MediaItem, PathGenerator, RemoteFile,
};
use medley_error::{
    CleanupFailures, MedleyResult, PipelineError, PipelineErrorKind, StoreError,
};
use medley_storage::{BlobStore, ByteSource, ByteStream};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Which of a media item's three directories an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// The original file's directory
    Original,
    /// Conversion artifacts
    Conversions,
    /// Responsive variant families
    ResponsiveImages,
}

/// Guess a Content-Type from a file extension.
///
/// Falls back to `application/octet-stream` for anything unrecognized.
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "pjpg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Moves bytes between the blob store and the media library's directory
/// layout.
///
/// This layer knows where things live (path generator, file namer) and how
/// each disk wants them written (capabilities, headers); it owns no media
/// state of its own.
pub struct MediaFilesystem {
    store: Arc<BlobStore>,
    paths: Arc<dyn PathGenerator>,
    namer: Arc<dyn FileNamer>,
    config: LibraryConfig,
}

impl MediaFilesystem {
    /// Create a filesystem with the default path generator and file namer.
    pub fn new(store: Arc<BlobStore>, config: LibraryConfig) -> Self {
        Self {
            store,
            paths: Arc::new(DefaultPathGenerator::default()),
            namer: Arc::new(DefaultFileNamer),
            config,
        }
    }

    /// Replace the path generator.
    pub fn with_path_generator(mut self, paths: Arc<dyn PathGenerator>) -> Self {
        self.paths = paths;
        self
    }

    /// Replace the file namer.
    pub fn with_file_namer(mut self, namer: Arc<dyn FileNamer>) -> Self {
        self.namer = namer;
        self
    }

    /// The blob store backing this filesystem.
    pub fn store(&self) -> &Arc<BlobStore> {
        &self.store
    }

    /// The library configuration.
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// The path generator in use.
    pub fn paths(&self) -> &Arc<dyn PathGenerator> {
        &self.paths
    }

    /// The file namer in use.
    pub fn namer(&self) -> &Arc<dyn FileNamer> {
        &self.namer
    }

    /// Directory of a media item for the given kind, without side effects.
    pub fn directory(&self, media: &MediaItem, kind: DirectoryKind) -> String {
        match kind {
            DirectoryKind::Original => self.paths.path(media),
            DirectoryKind::Conversions => self.paths.path_for_conversions(media),
            DirectoryKind::ResponsiveImages => self.paths.path_for_responsive_images(media),
        }
    }

    /// Disk holding files of the given kind.
    pub fn disk_for<'m>(&self, media: &'m MediaItem, kind: DirectoryKind) -> &'m DiskId {
        match kind {
            DirectoryKind::Original => &media.disk,
            DirectoryKind::Conversions | DirectoryKind::ResponsiveImages => {
                &media.conversions_disk
            }
        }
    }

    /// Directory of a media item, created on disks that need it to exist.
    pub async fn media_directory(
        &self,
        media: &MediaItem,
        kind: DirectoryKind,
    ) -> Result<String, StoreError> {
        let directory = self.directory(media, kind);
        self.store
            .ensure_directory(&directory, self.disk_for(media, kind))
            .await?;
        Ok(directory)
    }

    /// Full derived file name of a conversion, extension included.
    pub fn conversion_file_name(&self, media: &MediaItem, conversion: &Conversion) -> String {
        format!(
            "{}.{}",
            self.namer
                .conversion_file_name(&media.file_name, &conversion.name),
            self.conversion_extension(media, conversion)
        )
    }

    /// Output extension of a conversion for this media item.
    ///
    /// `keep_original_format` wins over a `Format` step when the original's
    /// extension is in the supported set.
    pub fn conversion_extension(&self, media: &MediaItem, conversion: &Conversion) -> String {
        if conversion.keep_original_format
            && self.config.keep_format_extensions().contains(&media.extension)
        {
            return media.extension.clone();
        }
        conversion
            .requested_format()
            .map(str::to_string)
            .unwrap_or_else(|| media.extension.clone())
    }

    /// Merged headers for a file landing on a header-capable disk.
    ///
    /// Content-Type first, then configured extras, then the item's own
    /// headers; later entries win.
    pub fn remote_headers_for(&self, media: &MediaItem, extension: &str) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            content_type_for(extension).to_string(),
        );
        headers.extend(self.config.extra_remote_headers().clone());
        headers.extend(media.custom_headers.clone());
        headers
    }

    async fn headers_for(
        &self,
        media: &MediaItem,
        disk: &DiskId,
        extension: &str,
    ) -> Result<HashMap<String, String>, StoreError> {
        if self.store.capabilities(disk)?.custom_headers {
            Ok(self.remote_headers_for(media, extension))
        } else {
            Ok(HashMap::new())
        }
    }

    /// Store bytes into one of the media item's directories.
    ///
    /// Returns the destination path.
    #[tracing::instrument(skip(self, source, media), fields(media_id = %media.id))]
    pub async fn copy_to_library(
        &self,
        source: ByteSource,
        media: &MediaItem,
        kind: DirectoryKind,
        file_name: &str,
    ) -> Result<String, StoreError> {
        let disk = self.disk_for(media, kind);
        let directory = self.media_directory(media, kind).await?;
        let destination = format!("{directory}{file_name}");

        let extension = self.namer.extension_from_base_image(file_name);
        let headers = self.headers_for(media, disk, &extension).await?;

        self.store
            .put(&destination, source, disk, &headers)
            .await?;

        tracing::debug!(path = %destination, disk = %disk, "Stored file in media library");
        Ok(destination)
    }

    /// Whether a remote source can be copied backend-side instead of being
    /// streamed through the application.
    ///
    /// True only when source and destination share a disk and no header
    /// rewrite would be lost by a low-level copy.
    pub fn should_copy_on_disk(
        &self,
        remote: &RemoteFile,
        media: &MediaItem,
    ) -> Result<bool, StoreError> {
        if remote.disk() != &media.disk {
            return Ok(false);
        }

        let capabilities = self.store.capabilities(&media.disk)?;
        if !capabilities.in_place_copy {
            return Ok(false);
        }
        if !capabilities.custom_headers {
            return Ok(true);
        }

        Ok(media.custom_headers.is_empty() && self.config.extra_remote_headers().is_empty())
    }

    /// Open the stored original for reading.
    pub async fn get_stream(&self, media: &MediaItem) -> Result<ByteStream, StoreError> {
        let source = format!("{}{}", self.paths.path(media), media.file_name);
        self.store.get_stream(&source, &media.disk).await
    }

    /// Materialize the stored original to a local path.
    pub async fn copy_from_library(
        &self,
        media: &MediaItem,
        target: &Path,
    ) -> Result<(), StoreError> {
        let mut stream = self.get_stream(media).await?;
        let mut file = tokio::fs::File::create(target)
            .await
            .map_err(|e| StoreError::from_io(target.display().to_string(), &e))?;
        tokio::io::copy(&mut stream, &mut file)
            .await
            .map_err(|e| StoreError::from_io(target.display().to_string(), &e))?;
        Ok(())
    }

    /// Delete the original, conversions, and responsive directories.
    ///
    /// Already-absent directories are success. Other failures are collected
    /// so every sibling deletion is still attempted, then reported together.
    #[tracing::instrument(skip(self, media), fields(media_id = %media.id))]
    pub async fn remove_all_files(&self, media: &MediaItem) -> MedleyResult<()> {
        let mut failures = Vec::new();

        let media_directory = self.directory(media, DirectoryKind::Original);

        if media.disk != media.conversions_disk {
            self.try_delete_directory(&media_directory, &media.disk, &mut failures)
                .await;
        }

        for kind in [
            DirectoryKind::Original,
            DirectoryKind::Conversions,
            DirectoryKind::ResponsiveImages,
        ] {
            let directory = self.directory(media, kind);
            self.try_delete_directory(&directory, &media.conversions_disk, &mut failures)
                .await;
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::new(PipelineErrorKind::Cleanup(CleanupFailures(failures))).into())
        }
    }

    async fn try_delete_directory(
        &self,
        directory: &str,
        disk: &DiskId,
        failures: &mut Vec<(String, StoreError)>,
    ) {
        match self.store.delete_directory(directory, disk).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                tracing::warn!(directory, disk = %disk, error = %e, "Directory deletion failed");
                failures.push((directory.to_string(), e));
            }
        }
    }

    /// Delete the responsive variants belonging to one conversion.
    pub async fn remove_responsive_images(
        &self,
        media: &MediaItem,
        conversion_name: &str,
    ) -> MedleyResult<()> {
        let directory = self.directory(media, DirectoryKind::ResponsiveImages);
        let disk = &media.conversions_disk;

        let files = match self.store.list_files(&directory, disk).await {
            Ok(files) => files,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        // Variants are named `{stem}___{conversion}_{width}.{ext}`; matching
        // the delimited marker keeps `thumb` from claiming `thumbnail` files.
        let marker = format!("___{conversion_name}_");
        for path in files.iter().filter(|path| path.contains(&marker)) {
            self.store.delete(path, disk).await?;
        }

        Ok(())
    }

    /// Move the original file after a rename.
    ///
    /// Paths are id-derived, so only the file itself moves; siblings stay put.
    pub async fn rename_media_file(
        &self,
        media: &MediaItem,
        before: &MediaItem,
    ) -> Result<(), StoreError> {
        if media.file_name == before.file_name {
            return Ok(());
        }

        let directory = self.directory(media, DirectoryKind::Original);
        let old = format!("{directory}{}", before.file_name);
        let new = format!("{directory}{}", media.file_name);

        self.store.rename(&old, &new, &media.disk).await
    }

    /// Move one conversion artifact after a rename.
    ///
    /// Old and new names are both computed through the namer, against the
    /// before-snapshot and the current item respectively.
    pub async fn rename_conversion_file(
        &self,
        media: &MediaItem,
        before: &MediaItem,
        conversion: &Conversion,
    ) -> Result<(), StoreError> {
        let directory = self.directory(media, DirectoryKind::Conversions);
        let old = format!("{directory}{}", self.conversion_file_name(before, conversion));
        let new = format!("{directory}{}", self.conversion_file_name(media, conversion));

        if old == new {
            return Ok(());
        }

        self.store.rename(&old, &new, &media.conversions_disk).await
    }
}
