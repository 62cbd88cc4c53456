//! Relational SQLite store for the content library.
//!
//! This crate owns the live database: the shared pool of content items and
//! their metadata, optional modules, and the per-version folder trees that
//! curate content into releasable libraries.
//!
//! # Architecture
//! - **Content and metadata** are global. Any number of folders, in any
//!   number of versions, may show the same content item.
//! - **Versions** own their folders. A folder's parent always belongs to the
//!   same version; the schema enforces this with triggers.
//! - A [`VersionGraph`] is a consistent read of everything one version ships,
//!   used to export the version without further database access.

mod db;
mod entity;
pub mod error;
mod graph;
mod models;
mod query;
mod repo;
mod transaction;

pub use crate::db::Database;
pub use crate::entity::*;
pub use crate::graph::*;
pub use crate::repo::Repository;
pub use crate::transaction::WriteTransaction;
