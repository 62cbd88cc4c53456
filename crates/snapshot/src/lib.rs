//! Portable library snapshots.
//!
//! A snapshot is a standalone SQLite database holding everything a single
//! library version ships, denormalized so that a device can browse it without
//! the live store:
//!
//! - [`flatten`] turns a [`VersionGraph`](dlms_store::VersionGraph) into seven
//!   row sets, without any I/O.
//! - A [`Sink`] writes those row sets as one unit; [`SqliteSink`] produces
//!   the portable database file.

pub mod error;
mod flatten;
pub mod path;
pub mod rows;
pub mod schema;
mod writer;

pub use crate::flatten::flatten;
pub use crate::rows::{Row, RowSets};
pub use crate::writer::{Sink, SqliteSink, write};
