use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::version::catalog::VersionCatalog;
use crate::version::error::CacheError;
use crate::version::semver::SemanticVersion;

/// A catalog read back from the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCatalog {
    pub catalog: VersionCatalog,
    /// Milliseconds since UNIX epoch of the last replace
    pub updated_at: i64,
    pub is_fresh: bool,
}

/// SQLite store for fetched catalogs, keyed by provider name
pub struct CatalogCache {
    conn: Mutex<Connection>,
    refresh_interval: i64,
}

impl CatalogCache {
    pub fn new(db_path: &Path, refresh_interval: i64) -> Result<Self, CacheError> {
        info!("Initializing catalog cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let cache = Self {
            conn: Mutex::new(conn),
            refresh_interval,
        };

        cache.create_schema()?;
        debug!("Catalog cache initialized");

        Ok(cache)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before UNIX epoch")
            .as_millis() as i64
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS catalogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS versions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                catalog_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                version TEXT NOT NULL,
                FOREIGN KEY (catalog_id) REFERENCES catalogs(id) ON DELETE CASCADE,
                UNIQUE(catalog_id, position)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_catalog_id ON versions(catalog_id)",
            [],
        )?;

        Ok(())
    }

    /// Reads a cached catalog in its stored order, or `None` if it was never saved
    pub fn get_catalog(&self, name: &str) -> Result<Option<CachedCatalog>, CacheError> {
        let conn = self.lock_conn()?;

        let row = conn.query_row(
            "SELECT id, updated_at FROM catalogs WHERE name = ?1",
            [name],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        );

        let (catalog_id, updated_at) = match row {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut stmt =
            conn.prepare("SELECT version FROM versions WHERE catalog_id = ?1 ORDER BY position")?;
        let stored = stmt
            .query_map([catalog_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        let versions = stored
            .iter()
            .filter_map(|v| {
                v.parse::<SemanticVersion>()
                    .inspect_err(|e| warn!("Ignoring cached version for {}: {}", name, e))
                    .ok()
            })
            .collect();

        let threshold = Self::current_timestamp_ms() - self.refresh_interval;

        Ok(Some(CachedCatalog {
            catalog: VersionCatalog::new(versions),
            updated_at,
            is_fresh: updated_at >= threshold,
        }))
    }

    /// Replaces the stored catalog and resets its refresh timestamp
    pub fn replace_catalog(&self, name: &str, catalog: &VersionCatalog) -> Result<(), CacheError> {
        debug!("Saving {} versions for {}", catalog.len(), name);
        let now = Self::current_timestamp_ms();

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO catalogs (name, updated_at)
            VALUES (?1, ?2)
            ON CONFLICT(name) DO UPDATE SET updated_at = excluded.updated_at
            "#,
            (name, now),
        )?;

        let catalog_id: i64 =
            tx.query_row("SELECT id FROM catalogs WHERE name = ?1", [name], |row| {
                row.get(0)
            })?;

        tx.execute("DELETE FROM versions WHERE catalog_id = ?1", [catalog_id])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO versions (catalog_id, position, version) VALUES (?1, ?2, ?3)",
            )?;
            for (position, version) in catalog.iter().enumerate() {
                stmt.execute((catalog_id, position as i64, version.to_string()))?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    fn set_updated_at(&self, name: &str, updated_at: i64) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        conn.execute(
            "UPDATE catalogs SET updated_at = ?1 WHERE name = ?2",
            (updated_at, name),
        )?;
        Ok(())
    }
}
