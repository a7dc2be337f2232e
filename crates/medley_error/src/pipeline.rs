//! Derivation pipeline error types.

use crate::{ConversionError, StoreError};

/// Why a single conversion failed during a pipeline run.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum ConversionFailureKind {
    /// The conversion engine rejected or failed the transform
    #[from(ConversionError)]
    Engine(ConversionError),
    /// Storing the derived artifact failed
    #[from(StoreError)]
    Store(StoreError),
}

/// One failed conversion inside an otherwise successful ingest.
///
/// Partial failures are reported as data in the ingest report rather than
/// raised, so one broken conversion never aborts its siblings.
#[derive(Debug, Clone, derive_more::Display)]
#[display("{}: {}", conversion, kind)]
pub struct ConversionFailure {
    /// Name of the conversion that failed
    pub conversion: String,
    /// What went wrong
    pub kind: ConversionFailureKind,
}

impl ConversionFailure {
    /// Pair a conversion name with its failure.
    pub fn new(conversion: impl Into<String>, kind: impl Into<ConversionFailureKind>) -> Self {
        Self {
            conversion: conversion.into(),
            kind: kind.into(),
        }
    }
}

/// Directory deletions that failed during `remove_all_files`.
///
/// Already-absent directories are success, not failures; only real delete
/// errors are collected here, after every sibling deletion was attempted.
#[derive(Debug, Clone, Default)]
pub struct CleanupFailures(pub Vec<(String, StoreError)>);

impl CleanupFailures {
    /// True when every deletion succeeded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CleanupFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} directory deletion(s) failed:", self.0.len())?;
        for (directory, error) in &self.0 {
            write!(f, " [{directory}: {error}]")?;
        }
        Ok(())
    }
}

/// Kinds of pipeline errors.
///
/// Per-conversion failures are not here: they are success-with-warnings data
/// (`ConversionFailure`). A `PipelineError` means the operation as a whole
/// could not complete.
#[derive(Debug, Clone, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Storing the original file failed, which is fatal to the whole ingest
    #[display("Failed to store original: {}", _0)]
    OriginalStore(StoreError),
    /// The source bytes could not be read or materialized
    #[display("Failed to read source: {}", _0)]
    SourceRead(StoreError),
    /// One or more directories could not be removed
    #[display("Cleanup failed: {}", _0)]
    Cleanup(CleanupFailures),
}

/// Pipeline error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
