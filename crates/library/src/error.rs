//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the store and snapshot
//! crates stay in the tree as children of these kinds.

use derive_more::{Display, Error};
use dlms_snapshot::error::{Error as SnapshotError, ErrorKind as SnapshotErrorKind};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome categories of a build or clone.
///
/// ### Nothing happened
/// - [`ErrorKind::NotFound`]
/// - [`ErrorKind::InvalidState`]
/// - [`ErrorKind::Store`]
/// - [`ErrorKind::Io`] (builds only; the live store is never written)
///
/// ### A mutation was attempted and rolled back
/// - [`ErrorKind::Conflict`]
/// - [`ErrorKind::RolledBack`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced version does not exist.
    #[display("version {_0} not found")]
    NotFound(#[error(not(source))] i64),
    /// No free version number could be claimed for a clone.
    #[display("version number conflict: {_0}")]
    Conflict(#[error(not(source))] String),
    /// The artifact could not be created, written or moved into place.
    #[display("artifact I/O error")]
    Io,
    /// The stored data breaks an invariant (e.g. a folder tree with a cycle).
    #[display("invalid state: {_0}")]
    InvalidState(#[error(not(source))] String),
    /// Reading from the live store failed before anything was written.
    #[display("content store error")]
    Store,
    /// A clone failed after it started writing; its transaction was rolled
    /// back and nothing was persisted.
    #[display("clone failed and was rolled back")]
    RolledBack,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Io | Self::Store | Self::RolledBack)
    }

    /// Returns `true` if the operation had started writing to the live store
    /// when it failed. Clones are atomic, so even then nothing persisted.
    pub fn mutation_started(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::RolledBack)
    }

    /// Raise a snapshot error as the matching library error, keeping the
    /// snapshot crate's frame as a child in the error tree.
    #[track_caller]
    pub(crate) fn snapshot(err: SnapshotError) -> Error {
        let kind = match &*err {
            SnapshotErrorKind::Io(_) | SnapshotErrorKind::Database => Self::Io,
            SnapshotErrorKind::InvalidPath(path) => {
                Self::InvalidState(format!("content path outside the content prefix: {}", path.display()))
            },
            SnapshotErrorKind::InvalidData(field) => Self::InvalidState(format!("unexportable {field}")),
        };
        err.raise(kind)
    }
}
