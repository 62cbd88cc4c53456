//! Live store entities.
//!
//! Identifiers are SQLite row ids. `New*` types carry the fields supplied by
//! the caller on insert; the store assigns the id.

use std::path::PathBuf;
use time::{Date, UtcDateTime};

/// Classifies metadata, e.g. "Subject" or "Language".
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MetadataType {
    pub id: i64,
    pub name: String,
}

/// A metadata value belonging to exactly one [`MetadataType`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Metadata {
    pub id: i64,
    pub name: String,
    pub type_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageGroup {
    Logo,
    Banner,
    Version,
}
impl ImageGroup {
    pub(crate) fn as_i64(self) -> i64 {
        match self {
            Self::Logo => 1,
            Self::Banner => 2,
            Self::Version => 3,
        }
    }

    pub(crate) fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Logo),
            2 => Some(Self::Banner),
            3 => Some(Self::Version),
            _ => None,
        }
    }
}

/// An uploaded logo, banner or version image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutImage {
    pub id: i64,
    /// Relative to the media root, e.g. `images/logos/health.png`.
    pub image_file: PathBuf,
    pub group: ImageGroup,
}

/// A content item: a stored file plus its descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub id: i64,
    pub title: String,
    pub file_name: String,
    /// Relative to the media root, e.g. `contents/report.pdf`.
    pub content_file: PathBuf,
    pub description: Option<String>,
    pub copyright_notes: Option<String>,
    pub rights_statement: Option<String>,
    pub additional_notes: Option<String>,
    pub published_date: Option<Date>,
    pub reviewed_on: Option<Date>,
    pub modified_on: UtcDateTime,
    pub filesize: u64,
    pub active: bool,
    pub duplicatable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub title: String,
    pub file_name: String,
    pub content_file: PathBuf,
    pub description: Option<String>,
    pub copyright_notes: Option<String>,
    pub rights_statement: Option<String>,
    pub additional_notes: Option<String>,
    pub published_date: Option<Date>,
    pub reviewed_on: Option<Date>,
    pub filesize: u64,
    pub active: bool,
    pub duplicatable: bool,
}
impl NewContent {
    /// An active content item stored under `contents/<file_name>`.
    pub fn new(title: impl Into<String>, file_name: impl Into<String>, filesize: u64) -> Self {
        let file_name = file_name.into();
        Self {
            title: title.into(),
            content_file: PathBuf::from("contents").join(&file_name),
            file_name,
            description: None,
            copyright_notes: None,
            rights_statement: None,
            additional_notes: None,
            published_date: None,
            reviewed_on: None,
            filesize,
            active: true,
            duplicatable: false,
        }
    }
}

/// An optional software component shippable with a version.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Module {
    pub id: i64,
    pub module_name: String,
    pub module_file: String,
    pub logo_img_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModule {
    pub module_name: String,
    pub module_file: String,
    pub logo_img_id: Option<i64>,
}

/// A releasable library snapshot: the root of a folder tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub id: i64,
    pub library_name: String,
    /// Globally unique.
    pub version_number: String,
    pub library_banner_id: Option<i64>,
    pub created_on: UtcDateTime,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersion {
    pub library_name: String,
    pub version_number: String,
    pub library_banner_id: Option<i64>,
    pub created_on: UtcDateTime,
    pub created_by: Option<String>,
}
impl NewVersion {
    pub fn new(library_name: impl Into<String>, version_number: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            version_number: version_number.into(),
            library_banner_id: None,
            created_on: UtcDateTime::now(),
            created_by: None,
        }
    }
}

/// A node in a version's folder tree. Root folders have no parent.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Folder {
    pub id: i64,
    pub folder_name: String,
    pub logo_img_id: Option<i64>,
    pub banner_img_id: Option<i64>,
    pub version_id: i64,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFolder {
    pub folder_name: String,
    pub logo_img_id: Option<i64>,
    pub banner_img_id: Option<i64>,
    pub version_id: i64,
    pub parent_id: Option<i64>,
}
impl NewFolder {
    pub fn new(folder_name: impl Into<String>, version_id: i64, parent_id: Option<i64>) -> Self {
        Self {
            folder_name: folder_name.into(),
            logo_img_id: None,
            banner_img_id: None,
            version_id,
            parent_id,
        }
    }
}
