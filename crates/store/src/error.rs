//! Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use exn::ResultExt;

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// A unique constraint rejected the write (e.g. a duplicate version number).
    #[display("unique constraint conflict")]
    Conflict,
    /// A foreign key, check or trigger constraint rejected the write.
    #[display("constraint violation")]
    Constraint,
    /// Serialization/deserialization error.
    #[display("invalid store data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database | Self::Conflict)
    }

    /// Map a `sqlx` error onto the category a caller can act upon.
    pub(crate) fn classify(err: &sqlx::Error) -> Self {
        let Some(db) = err.as_database_error() else {
            return Self::Database;
        };
        if db.is_unique_violation() {
            return Self::Conflict;
        }
        if db.is_foreign_key_violation() || db.is_check_violation() {
            return Self::Constraint;
        }
        // NOT NULL violations and RAISE(ABORT) from triggers have no dedicated
        // `sqlx` kind; SQLite reports them under the generic constraint code.
        match db.code().as_deref() {
            Some("1299") | Some("1811") | Some("19") => Self::Constraint,
            _ => Self::Database,
        }
    }
}

/// Raise `sqlx` errors as their classified [`ErrorKind`].
pub(crate) trait SqlxResultExt<T> {
    fn or_classify(self) -> Result<T>;
}
impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    #[track_caller]
    fn or_classify(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let kind = ErrorKind::classify(&err);
                Err(err).or_raise(|| kind)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Conflict.to_string(), "unique constraint conflict");
        assert_eq!(ErrorKind::InvalidData("filesize").to_string(), "invalid store data: filesize");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Conflict.is_retryable());
        assert!(!ErrorKind::Constraint.is_retryable());
        assert!(!ErrorKind::InvalidData("filesize").is_retryable());
    }

    #[test]
    fn non_database_errors_are_database_kind() {
        assert_eq!(ErrorKind::classify(&sqlx::Error::RowNotFound), ErrorKind::Database);
    }
}
