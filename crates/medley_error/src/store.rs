//! Blob store error types.

/// Kinds of blob store errors.
///
/// This is the full failure taxonomy of the storage layer. Callers decide
/// retry policy; the store itself never retries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// No object exists at the given path
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// The backing disk refused access
    #[display("Permission denied: {}", _0)]
    PermissionDenied(String),
    /// The backing disk could not be reached
    #[display("Disk unreachable: {}", _0)]
    Unreachable(String),
    /// Any other storage failure
    #[display("Storage failure: {}", _0)]
    Unknown(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use medley_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::NotFound("media/1/a.png".to_string()));
/// assert!(format!("{}", err).contains("Not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Map an I/O error onto the store taxonomy.
    ///
    /// `NotFound` and `PermissionDenied` carry the offending path; connection
    /// class failures become `Unreachable`; everything else is `Unknown`.
    #[track_caller]
    pub fn from_io(path: impl Into<String>, err: &std::io::Error) -> Self {
        use std::io::ErrorKind;

        let path = path.into();
        let kind = match err.kind() {
            ErrorKind::NotFound => StoreErrorKind::NotFound(path),
            ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied(path),
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::TimedOut => StoreErrorKind::Unreachable(format!("{path}: {err}")),
            _ => StoreErrorKind::Unknown(format!("{path}: {err}")),
        };

        Self::new(kind)
    }

    /// True when the error means the target simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StoreErrorKind::NotFound(_))
    }
}
