//! Portable row types.
//!
//! One struct per table of the portable snapshot. Field order is the column
//! order of the table, and [`Row::bind`] binds in exactly that order.

use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

pub type InsertQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// A row of one portable table.
pub trait Row {
    const TABLE: &'static str;
    /// Column names, in positional binding order.
    const COLUMNS: &'static [&'static str];

    /// Bind every column of the row, in [`COLUMNS`](Self::COLUMNS) order.
    fn bind<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q>;

    fn insert_sql() -> String {
        let placeholders = vec!["?"; Self::COLUMNS.len()].join(", ");
        format!("INSERT INTO {} ({}) VALUES ({})", Self::TABLE, Self::COLUMNS.join(", "), placeholders)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::FromRow)]
pub struct MetadataTypeRow {
    pub id: i64,
    pub name: String,
}
impl Row for MetadataTypeRow {
    const TABLE: &'static str = "metadata_type";
    const COLUMNS: &'static [&'static str] = &["id", "name"];

    fn bind<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query.bind(self.id).bind(self.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::FromRow)]
pub struct MetadataRow {
    pub id: i64,
    pub name: String,
    pub type_name: String,
    pub type_id: i64,
}
impl Row for MetadataRow {
    const TABLE: &'static str = "metadata";
    const COLUMNS: &'static [&'static str] = &["id", "name", "type_name", "type_id"];

    fn bind<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query
            .bind(self.id)
            .bind(self.name.as_str())
            .bind(self.type_name.as_str())
            .bind(self.type_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::FromRow)]
pub struct FolderRow {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub parent_id: Option<i64>,
}
impl Row for FolderRow {
    const TABLE: &'static str = "folder";
    const COLUMNS: &'static [&'static str] = &["id", "name", "logo_path", "parent_id"];

    fn bind<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query
            .bind(self.id)
            .bind(self.name.as_str())
            .bind(self.logo_path.as_deref())
            .bind(self.parent_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::FromRow)]
pub struct ModuleRow {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
}
impl Row for ModuleRow {
    const TABLE: &'static str = "module";
    const COLUMNS: &'static [&'static str] = &["id", "name", "logo_path"];

    fn bind<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query.bind(self.id).bind(self.name.as_str()).bind(self.logo_path.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::FromRow)]
pub struct ContentRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Relative to the content directory, `/`-separated.
    pub file_path: String,
    /// `YYYY-MM-DD`
    pub published_date: Option<String>,
    pub copyright_notes: Option<String>,
    pub rights_statement: Option<String>,
    pub filesize: i64,
}
impl Row for ContentRow {
    const TABLE: &'static str = "content";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "file_path",
        "published_date",
        "copyright_notes",
        "rights_statement",
        "filesize",
    ];

    fn bind<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query
            .bind(self.id)
            .bind(self.title.as_str())
            .bind(self.description.as_deref())
            .bind(self.file_path.as_str())
            .bind(self.published_date.as_deref())
            .bind(self.copyright_notes.as_deref())
            .bind(self.rights_statement.as_deref())
            .bind(self.filesize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::FromRow)]
pub struct ContentMetadataRow {
    pub content_id: i64,
    pub metadata_id: i64,
}
impl Row for ContentMetadataRow {
    const TABLE: &'static str = "content_metadata";
    const COLUMNS: &'static [&'static str] = &["content_id", "metadata_id"];

    fn bind<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query.bind(self.content_id).bind(self.metadata_id)
    }
}

/// Content shown in a folder, with the title and size displayed there.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::FromRow)]
pub struct ContentFolderRow {
    pub content_id: i64,
    pub folder_id: i64,
    pub title: String,
    pub filesize: i64,
}
impl Row for ContentFolderRow {
    const TABLE: &'static str = "content_folder";
    const COLUMNS: &'static [&'static str] = &["content_id", "folder_id", "title", "filesize"];

    fn bind<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query
            .bind(self.content_id)
            .bind(self.folder_id)
            .bind(self.title.as_str())
            .bind(self.filesize)
    }
}

/// The seven row sets of one snapshot, written as a single unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSets {
    pub metadata_types: Vec<MetadataTypeRow>,
    pub metadata: Vec<MetadataRow>,
    pub folders: Vec<FolderRow>,
    pub modules: Vec<ModuleRow>,
    pub contents: Vec<ContentRow>,
    pub content_metadata: Vec<ContentMetadataRow>,
    pub content_folders: Vec<ContentFolderRow>,
}
impl RowSets {
    /// Number of rows per portable table, in schema order.
    pub fn counts(&self) -> [(&'static str, usize); 7] {
        [
            (MetadataTypeRow::TABLE, self.metadata_types.len()),
            (MetadataRow::TABLE, self.metadata.len()),
            (FolderRow::TABLE, self.folders.len()),
            (ModuleRow::TABLE, self.modules.len()),
            (ContentRow::TABLE, self.contents.len()),
            (ContentMetadataRow::TABLE, self.content_metadata.len()),
            (ContentFolderRow::TABLE, self.content_folders.len()),
        ]
    }
}
