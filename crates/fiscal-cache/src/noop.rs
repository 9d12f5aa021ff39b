//! No-op cache implementation.

use async_trait::async_trait;
use fiscal_core::{Cik, CompanyFacts, FactsCache, Result};
use std::time::Duration;
use tracing::trace;

/// A no-op cache that doesn't store anything.
///
/// `get_company_facts` always returns `Ok(None)` and every other method returns `Ok`.
/// Useful for disabling caching or testing code paths without cache hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FactsCache for NoopCache {
    async fn get_company_facts(&self, _provider: &str, _cik: &Cik) -> Result<Option<CompanyFacts>> {
        trace!("NoopCache: get_company_facts called, returning None");
        Ok(None)
    }

    async fn put_company_facts(&self, _provider: &str, _facts: &CompanyFacts) -> Result<()> {
        trace!("NoopCache: put_company_facts called, doing nothing");
        Ok(())
    }

    async fn invalidate_stale(&self, _ttl: Duration) -> Result<usize> {
        trace!("NoopCache: invalidate_stale called, returning 0");
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        trace!("NoopCache: clear called, doing nothing");
        Ok(())
    }
}
