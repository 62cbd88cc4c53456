//! Snapshot Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A snapshot error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The artifact (or its staging file) could not be created, written or
    /// moved into place.
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// The portable database rejected the schema or a row. Nothing was
    /// committed; regenerate rather than repair.
    #[display("portable database error")]
    Database,
    /// A content file path escapes the storage root or lies outside the
    /// content prefix.
    #[display("invalid content path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A live value cannot be represented in the portable schema.
    #[display("invalid row data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Database)
    }
}
