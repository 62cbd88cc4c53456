//! Connection pool setup for the live content store.

use exn::ResultExt;
use sqlx::SqliteConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Per-connection settings that `SqliteConnectOptions` has no setter for.
const CONNECTION_PRAGMAS: &[&str] = &[
    "PRAGMA wal_autocheckpoint = 1000",
    "PRAGMA cache_size = -4096",
    "PRAGMA temp_store = MEMORY",
];

/// Where the store lives.
#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

impl Location {
    fn options(&self) -> SqliteConnectOptions {
        let options = SqliteConnectOptions::new()
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            // Clones take the write lock up front; a second writer queues
            // behind the first instead of failing with SQLITE_BUSY.
            .busy_timeout(Duration::from_secs(5));
        match self {
            // WAL lets builds keep reading while a clone is writing.
            Self::File(path) => options.filename(path).create_if_missing(true).journal_mode(SqliteJournalMode::Wal),
            Self::Memory => options.filename(":memory:"),
        }
    }

    fn max_connections(&self) -> u32 {
        match self {
            // Every builder and cloner holds one connection for its duration.
            Self::File(_) => 5,
            // Each connection to ":memory:" would open its own empty database.
            Self::Memory => 1,
        }
    }
}

/// Handle on the live content store. Cheap to clone.
///
/// Opening the store runs any pending migrations. Queries go through a
/// [`Repository`](crate::Repository) created from this handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the store file at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(Location::File(path.as_ref().to_path_buf())).await
    }

    /// A private, empty store that disappears when closed.
    ///
    /// Not gated on `#[cfg(test)]`: dependent crates build their test
    /// fixtures on it.
    pub async fn connect_in_memory() -> Result<Self> {
        Self::open(Location::Memory).await
    }

    #[instrument(level = "debug")]
    async fn open(location: Location) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(location.max_connections())
            .after_connect(|conn, _| Box::pin(Self::configure(conn)))
            .connect_with(location.options())
            .await
            .or_raise(|| ErrorKind::Database)?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn configure(conn: &mut SqliteConnection) -> sqlx::Result<()> {
        for pragma in CONNECTION_PRAGMAS {
            sqlx::query(pragma).execute(&mut *conn).await?;
        }
        Ok(())
    }

    #[instrument("applying store migrations", skip(self))]
    async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::Migration)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for checked-out connections to come back, then close the pool.
    pub async fn close(&self) {
        // Best effort; refreshes planner statistics before shutdown.
        _ = sqlx::query("PRAGMA optimize").execute(&self.pool).await;
        self.pool.close().await;
    }
}
