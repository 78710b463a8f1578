//! Persistent geocode cache backed by SQLite.
//!
//! One row per normalized place name. Rows are never updated or expired:
//! the UNIQUE constraint on `city_name` is what keeps concurrent populates
//! from producing two answers for one key.

use super::types::{CacheEntry, CacheKey, StoreError};
use rusqlite::{ffi, params, Connection, OptionalExtension};
use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Key-value store of previously resolved places.
pub trait LocationStore: Send + Sync {
    /// Fetch the row for `key`, or `None` if it has never been cached.
    fn get(
        &self,
        key: &CacheKey,
    ) -> impl Future<Output = Result<Option<CacheEntry>, StoreError>> + Send;

    /// Insert a new row. A row that already exists yields `DuplicateKey`
    /// and leaves the stored row untouched.
    fn put(&self, entry: CacheEntry) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// The location cache.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`. `":memory:"` gives an
    /// ephemeral store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.as_os_str() != ":memory:" {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Connection(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }
        Self::with_connection(Connection::open(path)?)
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                city_name TEXT NOT NULL UNIQUE,
                city_address TEXT NOT NULL,
                latitude DOUBLE NOT NULL,
                longitude DOUBLE NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the shared connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Connection("connection lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Connection(format!("store task failed: {}", e)))?
    }

    /// Number of cached rows (for testing).
    #[cfg(test)]
    pub fn len(&self) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get::<_, i64>(0))
            .unwrap() as usize
    }
}

impl LocationStore for SqliteStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        let city_name = key.as_str().to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT city_name, city_address, latitude, longitude FROM locations WHERE city_name = ?1",
                    params![city_name],
                    |row| {
                        Ok(CacheEntry {
                            city_name: row.get(0)?,
                            city_address: row.get(1)?,
                            latitude: row.get(2)?,
                            longitude: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
        .await
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO locations (city_name, city_address, latitude, longitude) VALUES (?1, ?2, ?3, ?4)",
                params![entry.city_name, entry.city_address, entry.latitude, entry.longitude],
            )
            .map(|_| ())
            .map_err(|e| insert_error(e, entry.city_name))
        })
        .await
    }
}

/// Only a UNIQUE violation is a duplicate; other constraint failures stay
/// plain SQLite errors.
fn insert_error(err: rusqlite::Error, city_name: String) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE => {
            StoreError::DuplicateKey(city_name)
        }
        other => other.into(),
    }
}
