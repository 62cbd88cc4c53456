//! Statements shared by the [`Repository`](crate::Repository) and the
//! [`WriteTransaction`](crate::WriteTransaction).
//!
//! Every function runs against a plain connection, so callers decide whether
//! it executes inside a transaction.

use crate::entity::{
    Content, Folder, ImageGroup, LayoutImage, Metadata, MetadataType, Module, NewContent, NewFolder, NewModule,
    NewVersion, Version,
};
use crate::error::{ErrorKind, Result, SqlxResultExt};
use crate::graph::{FolderEntry, Membership, MetadataEntry, ModuleEntry, Tagging, VersionGraph};
use crate::models::{ContentRow, LayoutImageRow, VersionRow};
use exn::{OptionExt, ResultExt};
use sqlx::SqliteConnection;
use std::path::Path;

fn sqlx_hates_paths(path: &Path) -> Result<&str> {
    path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))
}

// =========================================================================
// Metadata
// =========================================================================

pub(crate) async fn insert_metadata_type(conn: &mut SqliteConnection, name: &str) -> Result<MetadataType> {
    sqlx::query_as(include_str!("../queries/insert_metadata_type.sql"))
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn insert_metadata(conn: &mut SqliteConnection, name: &str, type_id: i64) -> Result<Metadata> {
    sqlx::query_as(include_str!("../queries/insert_metadata.sql"))
        .bind(name)
        .bind(type_id)
        .fetch_one(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn insert_layout_image(
    conn: &mut SqliteConnection,
    image_file: &Path,
    group: ImageGroup,
) -> Result<LayoutImage> {
    let row: LayoutImageRow = sqlx::query_as(include_str!("../queries/insert_layout_image.sql"))
        .bind(sqlx_hates_paths(image_file)?)
        .bind(group.as_i64())
        .fetch_one(&mut *conn)
        .await
        .or_classify()?;
    row.try_into()
}

// =========================================================================
// Content
// =========================================================================

pub(crate) async fn insert_content(conn: &mut SqliteConnection, content: &NewContent) -> Result<Content> {
    let row = ContentRow::try_from(content)?;
    let row: ContentRow = sqlx::query_as(include_str!("../queries/insert_content.sql"))
        .bind(row.title)
        .bind(row.file_name)
        .bind(row.content_file)
        .bind(row.description)
        .bind(row.copyright_notes)
        .bind(row.rights_statement)
        .bind(row.additional_notes)
        .bind(row.published_date)
        .bind(row.reviewed_on)
        .bind(row.modified_on)
        .bind(row.filesize)
        .bind(row.active)
        .bind(row.duplicatable)
        .fetch_one(&mut *conn)
        .await
        .or_classify()?;
    row.try_into()
}

pub(crate) async fn get_content(conn: &mut SqliteConnection, id: i64) -> Result<Option<Content>> {
    let row: Option<ContentRow> = sqlx::query_as(include_str!("../queries/get_content.sql"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .or_classify()?;
    row.map(Content::try_from).transpose()
}

pub(crate) async fn attach_content_metadata(
    conn: &mut SqliteConnection,
    content_id: i64,
    metadata_ids: &[i64],
) -> Result<()> {
    for &metadata_id in metadata_ids {
        sqlx::query(include_str!("../queries/attach_content_metadata.sql"))
            .bind(content_id)
            .bind(metadata_id)
            .execute(&mut *conn)
            .await
            .or_classify()?;
    }
    Ok(())
}

pub(crate) async fn count_contents(conn: &mut SqliteConnection) -> Result<u64> {
    let count: i64 = sqlx::query_scalar(include_str!("../queries/count_contents.sql"))
        .fetch_one(&mut *conn)
        .await
        .or_classify()?;
    u64::try_from(count).or_raise(|| ErrorKind::InvalidData("content count"))
}

// =========================================================================
// Modules
// =========================================================================

pub(crate) async fn insert_module(conn: &mut SqliteConnection, module: &NewModule) -> Result<Module> {
    sqlx::query_as(include_str!("../queries/insert_module.sql"))
        .bind(module.module_name.as_str())
        .bind(module.module_file.as_str())
        .bind(module.logo_img_id)
        .fetch_one(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn count_modules(conn: &mut SqliteConnection) -> Result<u64> {
    let count: i64 = sqlx::query_scalar(include_str!("../queries/count_modules.sql"))
        .fetch_one(&mut *conn)
        .await
        .or_classify()?;
    u64::try_from(count).or_raise(|| ErrorKind::InvalidData("module count"))
}

// =========================================================================
// Versions
// =========================================================================

pub(crate) async fn insert_version(conn: &mut SqliteConnection, version: &NewVersion) -> Result<Version> {
    let row = VersionRow::from(version);
    let row: VersionRow = sqlx::query_as(include_str!("../queries/insert_version.sql"))
        .bind(row.library_name)
        .bind(row.version_number)
        .bind(row.library_banner_id)
        .bind(row.created_on)
        .bind(row.created_by)
        .fetch_one(&mut *conn)
        .await
        .or_classify()?;
    row.try_into()
}

pub(crate) async fn get_version(conn: &mut SqliteConnection, id: i64) -> Result<Option<Version>> {
    let row: Option<VersionRow> = sqlx::query_as(include_str!("../queries/get_version.sql"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .or_classify()?;
    row.map(Version::try_from).transpose()
}

pub(crate) async fn list_versions(conn: &mut SqliteConnection) -> Result<Vec<Version>> {
    let rows: Vec<VersionRow> = sqlx::query_as(include_str!("../queries/list_versions.sql"))
        .fetch_all(&mut *conn)
        .await
        .or_classify()?;
    rows.into_iter().map(Version::try_from).collect()
}

pub(crate) async fn version_number_exists(conn: &mut SqliteConnection, version_number: &str) -> Result<bool> {
    sqlx::query_scalar(include_str!("../queries/version_number_exists.sql"))
        .bind(version_number)
        .fetch_one(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn list_version_modules(conn: &mut SqliteConnection, version_id: i64) -> Result<Vec<i64>> {
    sqlx::query_scalar(include_str!("../queries/list_version_modules.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn set_version_modules(
    conn: &mut SqliteConnection,
    version_id: i64,
    module_ids: &[i64],
) -> Result<()> {
    sqlx::query(include_str!("../queries/clear_version_modules.sql"))
        .bind(version_id)
        .execute(&mut *conn)
        .await
        .or_classify()?;
    for &module_id in module_ids {
        sqlx::query(include_str!("../queries/insert_version_module.sql"))
            .bind(version_id)
            .bind(module_id)
            .execute(&mut *conn)
            .await
            .or_classify()?;
    }
    Ok(())
}

pub(crate) async fn list_version_metadata_types(conn: &mut SqliteConnection, version_id: i64) -> Result<Vec<i64>> {
    sqlx::query_scalar(include_str!("../queries/list_version_metadata_types.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn set_version_metadata_types(
    conn: &mut SqliteConnection,
    version_id: i64,
    metadata_type_ids: &[i64],
) -> Result<()> {
    sqlx::query(include_str!("../queries/clear_version_metadata_types.sql"))
        .bind(version_id)
        .execute(&mut *conn)
        .await
        .or_classify()?;
    for &metadata_type_id in metadata_type_ids {
        sqlx::query(include_str!("../queries/insert_version_metadata_type.sql"))
            .bind(version_id)
            .bind(metadata_type_id)
            .execute(&mut *conn)
            .await
            .or_classify()?;
    }
    Ok(())
}

// =========================================================================
// Folders
// =========================================================================

pub(crate) async fn insert_folder(conn: &mut SqliteConnection, folder: &NewFolder) -> Result<Folder> {
    sqlx::query_as(include_str!("../queries/insert_folder.sql"))
        .bind(folder.folder_name.as_str())
        .bind(folder.logo_img_id)
        .bind(folder.banner_img_id)
        .bind(folder.version_id)
        .bind(folder.parent_id)
        .fetch_one(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn list_folders_for_version(conn: &mut SqliteConnection, version_id: i64) -> Result<Vec<Folder>> {
    sqlx::query_as(include_str!("../queries/list_folders_for_version.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn count_folders_for_version(conn: &mut SqliteConnection, version_id: i64) -> Result<u64> {
    let count: i64 = sqlx::query_scalar(include_str!("../queries/count_folders_for_version.sql"))
        .bind(version_id)
        .fetch_one(&mut *conn)
        .await
        .or_classify()?;
    u64::try_from(count).or_raise(|| ErrorKind::InvalidData("folder count"))
}

pub(crate) async fn list_folder_contents(conn: &mut SqliteConnection, folder_id: i64) -> Result<Vec<i64>> {
    sqlx::query_scalar(include_str!("../queries/list_folder_contents.sql"))
        .bind(folder_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()
}

pub(crate) async fn set_folder_contents(
    conn: &mut SqliteConnection,
    folder_id: i64,
    content_ids: &[i64],
) -> Result<()> {
    sqlx::query(include_str!("../queries/clear_folder_contents.sql"))
        .bind(folder_id)
        .execute(&mut *conn)
        .await
        .or_classify()?;
    for &content_id in content_ids {
        sqlx::query(include_str!("../queries/insert_folder_content.sql"))
            .bind(folder_id)
            .bind(content_id)
            .execute(&mut *conn)
            .await
            .or_classify()?;
    }
    Ok(())
}

// =========================================================================
// Version graph
// =========================================================================

pub(crate) async fn load_graph(conn: &mut SqliteConnection, version_id: i64) -> Result<Option<VersionGraph>> {
    let Some(version) = get_version(conn, version_id).await? else {
        return Ok(None);
    };
    let metadata_types: Vec<MetadataType> = sqlx::query_as(include_str!("../queries/graph_metadata_types.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()?;
    let metadata: Vec<MetadataEntry> = sqlx::query_as(include_str!("../queries/graph_metadata.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()?;
    let folders: Vec<FolderEntry> = sqlx::query_as(include_str!("../queries/graph_folders.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()?;
    let modules: Vec<ModuleEntry> = sqlx::query_as(include_str!("../queries/graph_modules.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()?;
    let contents: Vec<ContentRow> = sqlx::query_as(include_str!("../queries/graph_contents.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()?;
    let contents = contents.into_iter().map(Content::try_from).collect::<Result<Vec<_>>>()?;
    let taggings: Vec<Tagging> = sqlx::query_as(include_str!("../queries/graph_content_metadata.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()?;
    let memberships: Vec<Membership> = sqlx::query_as(include_str!("../queries/graph_memberships.sql"))
        .bind(version_id)
        .fetch_all(&mut *conn)
        .await
        .or_classify()?;
    Ok(Some(VersionGraph {
        version,
        metadata_types,
        metadata,
        folders,
        modules,
        contents,
        memberships,
        taggings,
    }))
}
