//! Repository over the live content graph.
//!
//! Contents and modules are shared between versions; folders belong to
//! exactly one version. The repository is the CRUD surface used by the
//! build and clone operations (and by their tests to set up a library).

use crate::Database;
use crate::entity::{
    Content, Folder, ImageGroup, LayoutImage, Metadata, MetadataType, Module, NewContent, NewFolder, NewModule,
    NewVersion, Version,
};
use crate::error::{Result, SqlxResultExt};
use crate::graph::VersionGraph;
use crate::query;
use crate::transaction::WriteTransaction;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::instrument;

/// Repository for the live content store.
///
/// # Relationships
///
/// - A version owns its folders (deleting a version cascades to them)
/// - A folder references its parent folder in the same version (enforced by trigger)
/// - Folders reference content, and versions reference modules and metadata
///   types, many-to-many; none of those are owned
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    // =========================================================================
    // Insert
    // =========================================================================

    pub async fn insert_metadata_type(&self, name: impl AsRef<str>) -> Result<MetadataType> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::insert_metadata_type(&mut conn, name.as_ref()).await
    }

    /// Returns [`ErrorKind::Conflict`](crate::error::ErrorKind::Conflict) if
    /// the type already has a value with the same name.
    pub async fn insert_metadata(&self, name: impl AsRef<str>, type_id: i64) -> Result<Metadata> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::insert_metadata(&mut conn, name.as_ref(), type_id).await
    }

    pub async fn insert_layout_image(&self, image_file: impl AsRef<Path>, group: ImageGroup) -> Result<LayoutImage> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::insert_layout_image(&mut conn, image_file.as_ref(), group).await
    }

    /// Insert a content item and attach the given metadata to it atomically.
    pub async fn insert_content(&self, content: &NewContent, metadata_ids: &[i64]) -> Result<Content> {
        let mut tx = self.pool.begin().await.or_classify()?;
        let content = query::insert_content(&mut tx, content).await?;
        query::attach_content_metadata(&mut tx, content.id, metadata_ids).await?;
        tx.commit().await.or_classify()?;
        Ok(content)
    }

    pub async fn insert_module(&self, module: &NewModule) -> Result<Module> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::insert_module(&mut conn, module).await
    }

    /// Returns [`ErrorKind::Conflict`](crate::error::ErrorKind::Conflict) if
    /// the version number is already taken.
    pub async fn insert_version(&self, version: &NewVersion) -> Result<Version> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::insert_version(&mut conn, version).await
    }

    /// Returns [`ErrorKind::Constraint`](crate::error::ErrorKind::Constraint)
    /// if the parent folder belongs to another version.
    pub async fn insert_folder(&self, folder: &NewFolder) -> Result<Folder> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::insert_folder(&mut conn, folder).await
    }

    // =========================================================================
    // Associations
    // =========================================================================

    /// Replace the set of content shown in a folder.
    pub async fn set_folder_contents(&self, folder_id: i64, content_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.or_classify()?;
        query::set_folder_contents(&mut tx, folder_id, content_ids).await?;
        tx.commit().await.or_classify()
    }

    /// Replace the set of modules shipped with a version.
    pub async fn set_version_modules(&self, version_id: i64, module_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.or_classify()?;
        query::set_version_modules(&mut tx, version_id, module_ids).await?;
        tx.commit().await.or_classify()
    }

    /// Replace the metadata types exported with a version.
    pub async fn set_version_metadata_types(&self, version_id: i64, metadata_type_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.or_classify()?;
        query::set_version_metadata_types(&mut tx, version_id, metadata_type_ids).await?;
        tx.commit().await.or_classify()
    }

    // =========================================================================
    // Get/Fetch
    // =========================================================================

    pub async fn get_version(&self, id: i64) -> Result<Option<Version>> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::get_version(&mut conn, id).await
    }

    pub async fn get_content(&self, id: i64) -> Result<Option<Content>> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::get_content(&mut conn, id).await
    }

    /// Load everything the version ships, read from one consistent snapshot.
    ///
    /// Returns `None` if the version does not exist.
    #[instrument(skip(self))]
    pub async fn load_graph(&self, version_id: i64) -> Result<Option<VersionGraph>> {
        // All queries run inside one read transaction so that the content
        // rows and the edges referencing them come from the same snapshot.
        let mut tx = self.pool.begin().await.or_classify()?;
        let graph = query::load_graph(&mut tx, version_id).await?;
        tx.rollback().await.or_classify()?;
        if let Some(graph) = &graph {
            tracing::debug!(
                folders = graph.folders.len(),
                contents = graph.contents.len(),
                memberships = graph.memberships.len(),
                "loaded version graph"
            );
        }
        Ok(graph)
    }

    // =========================================================================
    // Listing
    // =========================================================================

    pub async fn list_versions(&self) -> Result<Vec<Version>> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::list_versions(&mut conn).await
    }

    /// List the folders of a version, ordered by id.
    pub async fn list_folders_for_version(&self, version_id: i64) -> Result<Vec<Folder>> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::list_folders_for_version(&mut conn, version_id).await
    }

    pub async fn list_folder_contents(&self, folder_id: i64) -> Result<Vec<i64>> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::list_folder_contents(&mut conn, folder_id).await
    }

    pub async fn list_version_modules(&self, version_id: i64) -> Result<Vec<i64>> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::list_version_modules(&mut conn, version_id).await
    }

    pub async fn list_version_metadata_types(&self, version_id: i64) -> Result<Vec<i64>> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::list_version_metadata_types(&mut conn, version_id).await
    }

    // =========================================================================
    // Counts
    // =========================================================================

    pub async fn count_contents(&self) -> Result<u64> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::count_contents(&mut conn).await
    }

    pub async fn count_modules(&self) -> Result<u64> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::count_modules(&mut conn).await
    }

    pub async fn count_folders_for_version(&self, version_id: i64) -> Result<u64> {
        let mut conn = self.pool.acquire().await.or_classify()?;
        query::count_folders_for_version(&mut conn, version_id).await
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Start a write transaction holding the database write lock.
    ///
    /// Nothing written through it is visible to other connections until
    /// [`WriteTransaction::commit`]; dropping it rolls everything back.
    pub async fn begin_write(&self) -> Result<WriteTransaction> {
        WriteTransaction::begin(&self.pool).await
    }
}
