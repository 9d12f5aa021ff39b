//! SQLite-based cache implementation.

use async_trait::async_trait;
use chrono::Utc;
use fiscal_core::{Cik, CompanyFacts, FactsCache, FiscalError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument};

/// SQLite-based cache for raw company facts.
///
/// This cache stores each company's fact collection as a JSON payload in a SQLite
/// database file, providing persistence across application restarts.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Create a new SQLite cache at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| FiscalError::Cache(e.to_string()))?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory SQLite cache.
    ///
    /// Useful for testing; data is lost when the cache is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| FiscalError::Cache(e.to_string()))?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| FiscalError::Cache(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS company_facts_cache (
                provider TEXT NOT NULL,
                cik INTEGER NOT NULL,
                entity_name TEXT NOT NULL,
                data_json TEXT NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (provider, cik)
            )",
            [],
        )
        .map_err(|e| FiscalError::Cache(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_company_facts_cached_at
             ON company_facts_cache(cached_at)",
            [],
        )
        .map_err(|e| FiscalError::Cache(e.to_string()))?;

        debug!("SQLite cache schema initialized");
        Ok(())
    }

    fn cik_key(cik: &Cik) -> Result<i64> {
        i64::try_from(cik.value())
            .map_err(|e| FiscalError::Cache(format!("CIK {cik} out of range: {e}")))
    }
}

#[async_trait]
impl FactsCache for SqliteCache {
    #[instrument(skip(self), fields(provider = %provider, cik = %cik))]
    async fn get_company_facts(&self, provider: &str, cik: &Cik) -> Result<Option<CompanyFacts>> {
        let cik_key = Self::cik_key(cik)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| FiscalError::Cache(e.to_string()))?;

        let data_json: Option<String> = conn
            .query_row(
                "SELECT data_json FROM company_facts_cache WHERE provider = ?1 AND cik = ?2",
                params![provider, cik_key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| FiscalError::Cache(e.to_string()))?;

        match data_json {
            Some(json) => {
                let facts: CompanyFacts = serde_json::from_str(&json)
                    .map_err(|e| FiscalError::Cache(format!("Corrupt cache entry: {e}")))?;
                debug!("Cache hit for company facts");
                Ok(Some(facts))
            }
            None => {
                debug!("Cache miss for company facts");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, facts), fields(provider = %provider, cik = %facts.cik))]
    async fn put_company_facts(&self, provider: &str, facts: &CompanyFacts) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();
        let cik_key = Self::cik_key(&facts.cik)?;
        let data_json =
            serde_json::to_string(facts).map_err(|e| FiscalError::Cache(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| FiscalError::Cache(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO company_facts_cache
             (provider, cik, entity_name, data_json, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![provider, cik_key, facts.entity_name, data_json, cached_at],
        )
        .map_err(|e| FiscalError::Cache(e.to_string()))?;

        debug!("Cached company facts");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(ttl)
                .map_err(|e| FiscalError::Cache(format!("Invalid TTL duration: {e}")))?;
        let cutoff_str = cutoff.to_rfc3339();

        let conn = self
            .conn
            .lock()
            .map_err(|e| FiscalError::Cache(e.to_string()))?;

        let deleted = conn
            .execute(
                "DELETE FROM company_facts_cache WHERE cached_at < ?1",
                params![cutoff_str],
            )
            .map_err(|e| FiscalError::Cache(e.to_string()))?;

        if deleted > 0 {
            debug!("Invalidated {} stale cache entries", deleted);
        }

        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| FiscalError::Cache(e.to_string()))?;

        conn.execute("DELETE FROM company_facts_cache", [])
            .map_err(|e| FiscalError::Cache(e.to_string()))?;

        debug!("Cleared all cache entries");
        Ok(())
    }
}
