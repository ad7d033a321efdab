//! Database connection management
//!
//! Provides SQLite connection pooling and management.

use std::path::Path;
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

use crate::nutrition::CodecError;

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored value failed to decode; the record is corrupt
    #[error("Corrupt stored value: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid food id: {0}")]
    InvalidId(#[from] uuid::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Create a new database connection pool
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(|conn| {
                conn.execute_batch(
                    "PRAGMA foreign_keys = ON;
                     PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;
                     PRAGMA cache_size = -64000;
                     PRAGMA temp_store = MEMORY;",
                )?;
                Ok(())
            });

        let pool = Pool::builder().max_size(10).build(manager)?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Execute a closure with a database connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }

    /// Execute a closure with a mutable database connection (for transactions)
    pub fn with_conn_mut<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut rusqlite::Connection) -> DbResult<T>,
    {
        let mut conn = self.get_conn()?;
        f(&mut conn)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rusqlite::Connection;

    /// Fresh in-memory database with the full schema
    pub fn memory_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        crate::db::migrations::run_migrations(&conn).unwrap();
        conn
    }

    /// Pooled database in its own temp directory, removed on drop
    pub struct TempDatabase {
        db: super::Database,
        dir: tempfile::TempDir,
    }

    impl TempDatabase {
        pub fn path(&self) -> std::path::PathBuf {
            self.dir.path().join("nutrilog.db")
        }
    }

    impl std::ops::Deref for TempDatabase {
        type Target = super::Database;

        fn deref(&self) -> &super::Database {
            &self.db
        }
    }

    /// Pooled database backed by a fresh file with the full schema
    pub fn temp_database() -> TempDatabase {
        let dir = tempfile::tempdir().unwrap();
        let db = super::Database::new(dir.path().join("nutrilog.db")).unwrap();
        db.with_conn(crate::db::migrations::run_migrations).unwrap();
        TempDatabase { db, dir }
    }

    #[test]
    fn test_temp_database_is_removed_on_drop() {
        let db = temp_database();
        let path = db.path();
        assert!(path.exists());

        drop(db);
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }
}
