//! Portable snapshot schema.
//!
//! Column order of every table matches the field order of its row type in
//! [`rows`](crate::rows). Foreign keys are deferred, so rows may be inserted in
//! any order but a referentially broken snapshot fails to commit.

pub const METADATA_TYPE: &str = r#"
CREATE TABLE IF NOT EXISTS metadata_type (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
)"#;

pub const METADATA: &str = r#"
CREATE TABLE IF NOT EXISTS metadata (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    type_name TEXT NOT NULL,
    type_id INTEGER NOT NULL
        REFERENCES metadata_type (id) DEFERRABLE INITIALLY DEFERRED
)"#;

pub const FOLDER: &str = r#"
CREATE TABLE IF NOT EXISTS folder (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    logo_path TEXT,
    parent_id INTEGER
        REFERENCES folder (id) DEFERRABLE INITIALLY DEFERRED
)"#;

pub const MODULE: &str = r#"
CREATE TABLE IF NOT EXISTS module (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    logo_path TEXT
)"#;

pub const CONTENT: &str = r#"
CREATE TABLE IF NOT EXISTS content (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    file_path TEXT NOT NULL,
    published_date TEXT,
    copyright_notes TEXT,
    rights_statement TEXT,
    filesize INTEGER NOT NULL
)"#;

pub const CONTENT_METADATA: &str = r#"
CREATE TABLE IF NOT EXISTS content_metadata (
    content_id INTEGER NOT NULL
        REFERENCES content (id) DEFERRABLE INITIALLY DEFERRED,
    -- Tags of non-whitelisted types are kept, so no metadata row may exist.
    metadata_id INTEGER NOT NULL,
    PRIMARY KEY (content_id, metadata_id)
)"#;

pub const CONTENT_FOLDER: &str = r#"
CREATE TABLE IF NOT EXISTS content_folder (
    content_id INTEGER NOT NULL
        REFERENCES content (id) DEFERRABLE INITIALLY DEFERRED,
    folder_id INTEGER NOT NULL
        REFERENCES folder (id) DEFERRABLE INITIALLY DEFERRED,
    title TEXT NOT NULL,
    filesize INTEGER NOT NULL,
    PRIMARY KEY (content_id, folder_id)
)"#;

/// Every statement needed to create the portable schema, in dependency order.
pub const SCHEMA: &[&str] = &[
    METADATA_TYPE,
    METADATA,
    FOLDER,
    MODULE,
    CONTENT,
    CONTENT_METADATA,
    CONTENT_FOLDER,
];
