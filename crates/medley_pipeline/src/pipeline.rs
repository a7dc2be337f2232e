//! The derivation pipeline orchestrator.

use crate::{
    ConversionEngine, DirectoryKind, IngestReport, MediaFilesystem, MetadataStore,
};
use medley_core::{
    Conversion, FileNamer, GenerationStatus, LibraryConfig, Manipulation, MediaItem,
    PathGenerator, RemoteFile,
};
use medley_error::{
    ConversionFailure, ConversionFailureKind, MedleyResult, PipelineError, PipelineErrorKind,
    StoreError,
};
use medley_storage::{BlobStore, ByteSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Orchestrates ingest: store the original, derive every configured
/// conversion, store each artifact, and track completion.
///
/// One pipeline instance serves any number of media items; it keeps no
/// per-item state. Concurrent calls for the same item must be serialized by
/// the caller.
pub struct MediaDerivationPipeline {
    filesystem: MediaFilesystem,
    engine: Arc<dyn ConversionEngine>,
    metadata: Arc<dyn MetadataStore>,
}

impl MediaDerivationPipeline {
    /// Wire the pipeline to its collaborators.
    pub fn new(
        store: Arc<BlobStore>,
        engine: Arc<dyn ConversionEngine>,
        metadata: Arc<dyn MetadataStore>,
        config: LibraryConfig,
    ) -> Self {
        Self {
            filesystem: MediaFilesystem::new(store, config),
            engine,
            metadata,
        }
    }

    /// Replace the path generator.
    pub fn with_path_generator(mut self, paths: Arc<dyn PathGenerator>) -> Self {
        self.filesystem = self.filesystem.with_path_generator(paths);
        self
    }

    /// Replace the file namer.
    pub fn with_file_namer(mut self, namer: Arc<dyn FileNamer>) -> Self {
        self.filesystem = self.filesystem.with_file_namer(namer);
        self
    }

    /// The storage plumbing, for callers needing streams or cleanup directly.
    pub fn filesystem(&self) -> &MediaFilesystem {
        &self.filesystem
    }

    /// Accept an original file into the library and derive all conversions.
    ///
    /// Failure to store the original is fatal; per-conversion failures are
    /// collected in the report and never abort sibling conversions.
    #[tracing::instrument(skip(self, source, media), fields(media_id = %media.id))]
    pub async fn ingest(
        &self,
        source: ByteSource,
        media: &MediaItem,
        target_file_name: Option<&str>,
    ) -> MedleyResult<IngestReport> {
        let file_name: &str = match target_file_name {
            Some(name) => name,
            None => &media.file_name,
        };

        let working = WorkingCopy::materialize(source, file_name)
            .await
            .map_err(|e| PipelineError::new(PipelineErrorKind::SourceRead(e)))?;

        let original_path = self
            .filesystem
            .copy_to_library(
                ByteSource::LocalFile(working.path().to_path_buf()),
                media,
                DirectoryKind::Original,
                file_name,
            )
            .await
            .map_err(|e| PipelineError::new(PipelineErrorKind::OriginalStore(e)))?;

        tracing::info!(path = %original_path, "Stored original");

        let conversions = self.metadata.conversions_for(media).await?;
        let (generated, failed) = self
            .run_conversions(media, working.path(), &conversions)
            .await?;

        Ok(IngestReport::new(original_path, generated, failed))
    }

    /// Accept a file already living on some disk.
    ///
    /// When the source shares the destination disk and no header rewrite
    /// would be lost, the original is copied backend-side instead of being
    /// streamed through the application.
    #[tracing::instrument(skip(self, remote, media), fields(media_id = %media.id, key = remote.key()))]
    pub async fn ingest_remote(
        &self,
        remote: &RemoteFile,
        media: &MediaItem,
        target_file_name: Option<&str>,
    ) -> MedleyResult<IngestReport> {
        let file_name: &str = match target_file_name {
            Some(name) => name,
            None => remote.file_name(),
        };

        let original_path = if self
            .filesystem
            .should_copy_on_disk(remote, media)
            .map_err(|e| PipelineError::new(PipelineErrorKind::OriginalStore(e)))?
        {
            tracing::debug!(key = remote.key(), "Copying remote file in place");
            let directory = self
                .filesystem
                .media_directory(media, DirectoryKind::Original)
                .await
                .map_err(|e| PipelineError::new(PipelineErrorKind::OriginalStore(e)))?;
            let destination = format!("{directory}{file_name}");
            self.filesystem
                .store()
                .copy(remote.key(), &destination, &media.disk)
                .await
                .map_err(|e| PipelineError::new(PipelineErrorKind::OriginalStore(e)))?;
            destination
        } else {
            let stream = self
                .filesystem
                .store()
                .get_stream(remote.key(), remote.disk())
                .await
                .map_err(|e| PipelineError::new(PipelineErrorKind::SourceRead(e)))?;
            self.filesystem
                .copy_to_library(
                    ByteSource::Reader(stream),
                    media,
                    DirectoryKind::Original,
                    file_name,
                )
                .await
                .map_err(|e| PipelineError::new(PipelineErrorKind::OriginalStore(e)))?
        };

        // Conversions always run from a local working copy of the source.
        let stream = self
            .filesystem
            .store()
            .get_stream(remote.key(), remote.disk())
            .await
            .map_err(|e| PipelineError::new(PipelineErrorKind::SourceRead(e)))?;
        let working = WorkingCopy::materialize(ByteSource::Reader(stream), file_name)
            .await
            .map_err(|e| PipelineError::new(PipelineErrorKind::SourceRead(e)))?;

        let conversions = self.metadata.conversions_for(media).await?;
        let (generated, failed) = self
            .run_conversions(media, working.path(), &conversions)
            .await?;

        Ok(IngestReport::new(original_path, generated, failed))
    }

    /// Re-run conversions not yet marked generated.
    ///
    /// This is the lazy retry path for failed conversions, reading the stored
    /// original back as the source.
    #[tracing::instrument(skip(self, media), fields(media_id = %media.id))]
    pub async fn regenerate(&self, media: &MediaItem) -> MedleyResult<IngestReport> {
        let mut pending = Vec::new();
        for conversion in self.metadata.conversions_for(media).await? {
            let status = self.metadata.status(&media.id, &conversion.name).await?;
            if status != GenerationStatus::Generated {
                pending.push(conversion);
            }
        }

        let original_path = format!(
            "{}{}",
            self.filesystem.directory(media, DirectoryKind::Original),
            media.file_name
        );

        if pending.is_empty() {
            return Ok(IngestReport::new(original_path, Vec::new(), Vec::new()));
        }

        let stream = self
            .filesystem
            .get_stream(media)
            .await
            .map_err(|e| PipelineError::new(PipelineErrorKind::SourceRead(e)))?;
        let working = WorkingCopy::materialize(ByteSource::Reader(stream), &media.file_name)
            .await
            .map_err(|e| PipelineError::new(PipelineErrorKind::SourceRead(e)))?;

        let (generated, failed) = self
            .run_conversions(media, working.path(), &pending)
            .await?;

        Ok(IngestReport::new(original_path, generated, failed))
    }

    /// Propagate a file rename to stored files.
    ///
    /// Moves the original and every conversion artifact already marked
    /// generated; pending and failed artifacts are skipped without error and
    /// pick up the new name on their next run. `before` is the immutable
    /// snapshot of the item as it was stored.
    #[tracing::instrument(skip(self, media, before), fields(media_id = %media.id))]
    pub async fn sync_file_names(
        &self,
        media: &MediaItem,
        before: &MediaItem,
    ) -> MedleyResult<()> {
        self.filesystem.rename_media_file(media, before).await?;

        for conversion in self.metadata.conversions_for(media).await? {
            let status = self.metadata.status(&media.id, &conversion.name).await?;
            if status != GenerationStatus::Generated {
                continue;
            }

            self.filesystem
                .rename_conversion_file(media, before, &conversion)
                .await?;

            // The artifact record follows the file to its new path.
            let renamed = format!(
                "{}{}",
                self.filesystem.directory(media, DirectoryKind::Conversions),
                self.filesystem.conversion_file_name(media, &conversion)
            );
            self.metadata
                .mark_generated(&media.id, &conversion.name, &renamed)
                .await?;
        }

        Ok(())
    }

    /// Remove the original, conversion, and responsive directories.
    pub async fn remove_all_files(&self, media: &MediaItem) -> MedleyResult<()> {
        self.filesystem.remove_all_files(media).await
    }

    async fn run_conversions(
        &self,
        media: &MediaItem,
        source: &Path,
        conversions: &[Conversion],
    ) -> MedleyResult<(Vec<String>, Vec<ConversionFailure>)> {
        let mut generated = Vec::new();
        let mut failed = Vec::new();

        for conversion in conversions {
            match self.perform_conversion(media, conversion, source).await {
                Ok(path) => {
                    self.metadata
                        .mark_generated(&media.id, &conversion.name, &path)
                        .await?;
                    tracing::info!(conversion = %conversion.name, path = %path, "Conversion generated");
                    generated.push(conversion.name.clone());
                }
                Err(kind) => {
                    self.metadata
                        .mark_failed(&media.id, &conversion.name)
                        .await?;
                    tracing::warn!(conversion = %conversion.name, error = %kind, "Conversion failed");
                    failed.push(ConversionFailure::new(conversion.name.clone(), kind));
                }
            }
        }

        Ok((generated, failed))
    }

    /// One conversion, start to durable artifact.
    async fn perform_conversion(
        &self,
        media: &MediaItem,
        conversion: &Conversion,
        source: &Path,
    ) -> Result<String, ConversionFailureKind> {
        let steps = self.effective_steps(media, conversion);

        let derived = self.engine.apply(source, &steps).await?;
        let file_name = self.filesystem.conversion_file_name(media, conversion);
        let artifact = rename_in_local_directory(&derived, &file_name)
            .await
            .map_err(ConversionFailureKind::Store)?;

        if conversion.generate_responsive {
            self.generate_responsive_images(media, conversion, &artifact)
                .await?;
        }

        let stored = self
            .filesystem
            .copy_to_library(
                ByteSource::LocalFile(artifact),
                media,
                DirectoryKind::Conversions,
                &file_name,
            )
            .await
            .map_err(ConversionFailureKind::Store)?;

        Ok(stored)
    }

    /// The conversion's steps, with the output format forced back to the
    /// original's when `keep_original_format` applies.
    fn effective_steps(&self, media: &MediaItem, conversion: &Conversion) -> Vec<Manipulation> {
        let mut steps = conversion.manipulations.clone();

        if conversion.keep_original_format
            && self
                .filesystem
                .config()
                .keep_format_extensions()
                .contains(&media.extension)
        {
            steps.push(Manipulation::Format(media.extension.clone()));
        }

        steps
    }

    /// Derive the width family from a converted artifact.
    async fn generate_responsive_images(
        &self,
        media: &MediaItem,
        conversion: &Conversion,
        artifact: &Path,
    ) -> Result<(), ConversionFailureKind> {
        let extension = self
            .filesystem
            .namer()
            .extension_from_base_image(&artifact.to_string_lossy());

        for width in self.filesystem.config().responsive_widths().to_vec() {
            let variant = self
                .engine
                .apply(artifact, &[Manipulation::Width(width)])
                .await?;
            let variant_name = self.filesystem.namer().responsive_variant_name(
                &media.file_name,
                &conversion.name,
                width,
                &extension,
            );

            self.filesystem
                .copy_to_library(
                    ByteSource::LocalFile(variant),
                    media,
                    DirectoryKind::ResponsiveImages,
                    &variant_name,
                )
                .await
                .map_err(ConversionFailureKind::Store)?;
        }

        Ok(())
    }
}

/// Rename an engine artifact next to itself, keeping it in its temp directory.
async fn rename_in_local_directory(
    artifact: &Path,
    file_name: &str,
) -> Result<PathBuf, StoreError> {
    let target = artifact
        .parent()
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name));

    tokio::fs::rename(artifact, &target)
        .await
        .map_err(|e| StoreError::from_io(target.display().to_string(), &e))?;

    Ok(target)
}

/// A source materialized to a scoped temp directory.
///
/// The directory is removed when the copy drops, on every exit path.
struct WorkingCopy {
    // Held for its Drop; the path below lives inside it.
    _dir: TempDir,
    path: PathBuf,
}

impl WorkingCopy {
    async fn materialize(source: ByteSource, file_name: &str) -> Result<Self, StoreError> {
        let dir = TempDir::new().map_err(|e| StoreError::from_io(file_name, &e))?;
        let path = dir.path().join(file_name);

        match source {
            ByteSource::Bytes(data) => {
                tokio::fs::write(&path, data)
                    .await
                    .map_err(|e| StoreError::from_io(path.display().to_string(), &e))?;
            }
            ByteSource::Reader(mut reader) => {
                let mut file = tokio::fs::File::create(&path)
                    .await
                    .map_err(|e| StoreError::from_io(path.display().to_string(), &e))?;
                tokio::io::copy(&mut reader, &mut file)
                    .await
                    .map_err(|e| StoreError::from_io(path.display().to_string(), &e))?;
            }
            ByteSource::LocalFile(src) => {
                tokio::fs::copy(&src, &path)
                    .await
                    .map_err(|e| StoreError::from_io(src.display().to_string(), &e))?;
            }
        }

        Ok(Self { _dir: dir, path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
