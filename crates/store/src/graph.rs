//! Point-in-time view of everything a single version ships.
//!
//! A [`VersionGraph`] is read by [`Repository::load_graph`](crate::Repository::load_graph)
//! inside one read transaction, so every edge refers to rows loaded from the
//! same snapshot of the store. It is plain data: flattening it into export
//! rows needs no further store access.

use crate::entity::{Content, MetadataType, Version};
use std::collections::BTreeSet;

/// A folder of the version, with its logo resolved to an image path.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FolderEntry {
    pub id: i64,
    pub folder_name: String,
    pub parent_id: Option<i64>,
    pub logo_path: Option<String>,
}

/// A module attached to the version, with its logo resolved to an image path.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ModuleEntry {
    pub id: i64,
    pub module_name: String,
    pub logo_path: Option<String>,
}

/// A metadata value together with the name of its type.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MetadataEntry {
    pub id: i64,
    pub name: String,
    pub type_id: i64,
    pub type_name: String,
}

/// Content shown in a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::FromRow)]
pub struct Membership {
    pub folder_id: i64,
    pub content_id: i64,
}

/// Metadata attached to a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::FromRow)]
pub struct Tagging {
    pub content_id: i64,
    pub metadata_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGraph {
    pub version: Version,
    /// The metadata types curated for this version. Only metadata of these
    /// types is exported.
    pub metadata_types: Vec<MetadataType>,
    /// Every metadata value attached to content of this version, of any type.
    pub metadata: Vec<MetadataEntry>,
    pub folders: Vec<FolderEntry>,
    pub modules: Vec<ModuleEntry>,
    /// Distinct content reachable through the version's folders.
    pub contents: Vec<Content>,
    pub memberships: Vec<Membership>,
    pub taggings: Vec<Tagging>,
}
impl VersionGraph {
    /// The ids of the version's metadata-type whitelist.
    pub fn metadata_type_ids(&self) -> BTreeSet<i64> {
        self.metadata_types.iter().map(|t| t.id).collect()
    }
}
