//! Cache trait for storing fetched company facts.
//!
//! This module defines the [`FactsCache`] trait that provides a unified interface
//! for persisting raw company facts between runs.

use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::Result,
    types::{Cik, CompanyFacts},
};

/// Trait for caching fetched company facts.
///
/// Implementations can store data in various backends (SQLite, in-memory, etc.)
/// to avoid repeated API calls. Entries are keyed by provider name and CIK.
#[async_trait]
pub trait FactsCache: Send + Sync {
    /// Retrieves cached company facts.
    ///
    /// Returns `Ok(Some(facts))` if cached, `Ok(None)` if not cached.
    async fn get_company_facts(&self, provider: &str, cik: &Cik) -> Result<Option<CompanyFacts>>;

    /// Stores company facts in the cache, keyed by `facts.cik`.
    async fn put_company_facts(&self, provider: &str, facts: &CompanyFacts) -> Result<()>;

    /// Removes cache entries older than the specified TTL.
    ///
    /// Returns the number of entries invalidated.
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
