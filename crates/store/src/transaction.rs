use crate::entity::{Folder, NewFolder, NewVersion, Version};
use crate::error::{Result, SqlxResultExt};
use crate::query;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// A write transaction over the live store.
///
/// Begun with `BEGIN IMMEDIATE`, so the write lock is taken up front and a
/// concurrent writer waits on the busy timeout instead of failing halfway
/// through. Dropping the transaction without calling [`commit`](Self::commit)
/// rolls back every write made through it.
pub struct WriteTransaction {
    tx: Transaction<'static, Sqlite>,
}
impl WriteTransaction {
    pub(crate) async fn begin(pool: &SqlitePool) -> Result<Self> {
        let tx = pool.begin_with("BEGIN IMMEDIATE").await.or_classify()?;
        Ok(Self { tx })
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.or_classify()
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await.or_classify()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_version(&mut self, id: i64) -> Result<Option<Version>> {
        query::get_version(&mut self.tx, id).await
    }

    pub async fn version_number_exists(&mut self, version_number: &str) -> Result<bool> {
        query::version_number_exists(&mut self.tx, version_number).await
    }

    pub async fn folders(&mut self, version_id: i64) -> Result<Vec<Folder>> {
        query::list_folders_for_version(&mut self.tx, version_id).await
    }

    pub async fn folder_contents(&mut self, folder_id: i64) -> Result<Vec<i64>> {
        query::list_folder_contents(&mut self.tx, folder_id).await
    }

    pub async fn version_modules(&mut self, version_id: i64) -> Result<Vec<i64>> {
        query::list_version_modules(&mut self.tx, version_id).await
    }

    pub async fn version_metadata_types(&mut self, version_id: i64) -> Result<Vec<i64>> {
        query::list_version_metadata_types(&mut self.tx, version_id).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn insert_version(&mut self, version: &NewVersion) -> Result<Version> {
        query::insert_version(&mut self.tx, version).await
    }

    pub async fn insert_folder(&mut self, folder: &NewFolder) -> Result<Folder> {
        query::insert_folder(&mut self.tx, folder).await
    }

    pub async fn set_folder_contents(&mut self, folder_id: i64, content_ids: &[i64]) -> Result<()> {
        query::set_folder_contents(&mut self.tx, folder_id, content_ids).await
    }

    pub async fn set_version_modules(&mut self, version_id: i64, module_ids: &[i64]) -> Result<()> {
        query::set_version_modules(&mut self.tx, version_id, module_ids).await
    }

    pub async fn set_version_metadata_types(&mut self, version_id: i64, metadata_type_ids: &[i64]) -> Result<()> {
        query::set_version_metadata_types(&mut self.tx, version_id, metadata_type_ids).await
    }
}
