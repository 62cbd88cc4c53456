//! Portable database writer.
//!
//! The snapshot is written into a hidden staging file next to the target and
//! renamed over the target only once it has been committed and closed. A
//! failed write leaves no staging file behind and never touches a previous
//! artifact at the target path.

use crate::error::{ErrorKind, Result};
use crate::rows::{Row, RowSets};
use crate::schema::SCHEMA;
use async_trait::async_trait;
use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{Connection, SqliteConnection};
use std::path::Path;
use tracing::instrument;

/// Destination for flattened row sets.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Write `rows` to `target` as one unit: either everything is written and
    /// durable, or nothing usable is left at `target`.
    async fn write(&self, target: &Path, rows: &RowSets) -> Result<()>;
}

/// Writes row sets to a standalone SQLite file with the portable schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteSink;

#[async_trait]
impl Sink for SqliteSink {
    async fn write(&self, target: &Path, rows: &RowSets) -> Result<()> {
        write(target, SCHEMA, rows).await
    }
}

/// Create `target` from the given schema statements and row sets.
///
/// Missing parent directories are created. Any existing file at `target` is
/// replaced, but only after the new database has been fully committed.
#[instrument(skip(schema, rows))]
pub async fn write(target: &Path, schema: &[&str], rows: &RowSets) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    tokio::fs::create_dir_all(dir).await.map_err(ErrorKind::Io)?;
    // Dropping the staging file deletes it, on every error path below.
    let staging = tempfile::Builder::new()
        .prefix(".")
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(ErrorKind::Io)?;

    populate(staging.path(), schema, rows).await?;
    staging.persist(target).map_err(|err| ErrorKind::Io(err.error))?;
    tracing::debug!(counts = ?rows.counts(), "portable database written");
    Ok(())
}

/// Open the database at `path`, write everything in one transaction and close
/// the connection, whether or not the writes succeeded.
async fn populate(path: &Path, schema: &[&str], rows: &RowSets) -> Result<()> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .foreign_keys(true)
        // Single self-contained file, no -wal/-shm companions to ship.
        .journal_mode(SqliteJournalMode::Delete)
        .synchronous(SqliteSynchronous::Full);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .or_raise(|| ErrorKind::Database)?;
    let written = insert_all(&mut conn, schema, rows).await;
    let closed = conn.close().await.or_raise(|| ErrorKind::Database);
    written?;
    closed
}

async fn insert_all(conn: &mut SqliteConnection, schema: &[&str], rows: &RowSets) -> Result<()> {
    let mut tx = conn.begin().await.or_raise(|| ErrorKind::Database)?;
    for statement in schema {
        sqlx::query(statement).execute(&mut *tx).await.or_raise(|| ErrorKind::Database)?;
    }
    insert_rows(&mut tx, &rows.metadata_types).await?;
    insert_rows(&mut tx, &rows.metadata).await?;
    insert_rows(&mut tx, &rows.folders).await?;
    insert_rows(&mut tx, &rows.modules).await?;
    insert_rows(&mut tx, &rows.contents).await?;
    insert_rows(&mut tx, &rows.content_metadata).await?;
    insert_rows(&mut tx, &rows.content_folders).await?;
    // Deferred foreign keys are checked here.
    tx.commit().await.or_raise(|| ErrorKind::Database)
}

async fn insert_rows<R: Row + Sync>(conn: &mut SqliteConnection, rows: &[R]) -> Result<()> {
    let sql = R::insert_sql();
    for row in rows {
        row.bind(sqlx::query(&sql))
            .execute(&mut *conn)
            .await
            .or_raise(|| ErrorKind::Database)?;
    }
    Ok(())
}
