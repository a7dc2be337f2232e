//! Archive streaming error types.

use crate::StoreError;

/// Kinds of archive streaming errors.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum ArchiveErrorKind {
    /// A member's bytes could not be pulled from storage
    #[from(StoreError)]
    Store(StoreError),
    /// Writing to the archive sink failed
    #[display("Sink failure: {}", _0)]
    Sink(String),
}

/// Archive error with location tracking.
///
/// # Examples
///
/// ```
/// use medley_error::{ArchiveError, ArchiveErrorKind};
///
/// let err = ArchiveError::new(ArchiveErrorKind::Sink("broken pipe".to_string()));
/// assert!(format!("{}", err).contains("Sink failure"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Archive Error: {} at line {} in {}", kind, line, file)]
pub struct ArchiveError {
    /// The kind of error that occurred
    pub kind: ArchiveErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ArchiveError {
    /// Create a new archive error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: impl Into<ArchiveErrorKind>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind: kind.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
