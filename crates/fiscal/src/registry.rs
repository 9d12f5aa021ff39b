//! Provider registry with cache-first lookup and provider fallback.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use fiscal_core::{Cik, CompanyFacts, CompanyFactsProvider, FactsCache, FiscalError, Result};
use fiscal_resolve::ResolveOptions;

use crate::report::{AnnualReport, MetricSet};

/// Registry of company-facts providers with automatic fallback.
///
/// Providers are tried in registration order until one succeeds. When a cache
/// is configured it is consulted first, and the first successful fetch is
/// written back under the name of the provider that served it.
///
/// # Example
///
/// ```rust,ignore
/// use fiscal::{Cik, EdgarConfig, FactsRegistry};
///
/// let registry = FactsRegistry::new()
///     .with_edgar(EdgarConfig::new("MyApp/1.0", "contact@example.com"))?;
///
/// let cik = registry.lookup_cik("AMD").await?;
/// let facts = registry.company_facts(&cik).await?;
/// ```
#[derive(Default)]
pub struct FactsRegistry {
    providers: Vec<Arc<dyn CompanyFactsProvider>>,
    cache: Option<Arc<dyn FactsCache>>,
}

impl std::fmt::Debug for FactsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactsRegistry")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("cache", &self.cache.as_ref().map(|_| "configured"))
            .finish()
    }
}

impl FactsRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new registry with a cache.
    #[must_use]
    pub fn with_cache(cache: Arc<dyn FactsCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Default::default()
        }
    }

    /// Set the cache for this registry.
    #[must_use]
    pub fn set_cache(mut self, cache: Arc<dyn FactsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Register a company-facts provider.
    pub fn register(&mut self, provider: Arc<dyn CompanyFactsProvider>) {
        debug!(provider = provider.name(), "Registering facts provider");
        self.providers.push(provider);
    }

    /// Names of registered providers, in fallback order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Fetch a company's facts, trying the cache and then each provider in order.
    ///
    /// # Errors
    /// Returns [`FiscalError::ProviderNotConfigured`] if no provider is registered,
    /// otherwise the last provider's error when all of them fail.
    #[instrument(skip(self), fields(cik = %cik))]
    pub async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts> {
        if self.providers.is_empty() {
            return Err(FiscalError::ProviderNotConfigured(
                "No company facts providers registered".to_string(),
            ));
        }

        if let Some(cache) = &self.cache {
            for provider in &self.providers {
                match cache.get_company_facts(provider.name(), cik).await {
                    Ok(Some(cached)) => {
                        debug!(provider = provider.name(), "Cache hit for company facts");
                        return Ok(cached);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(provider = provider.name(), error = %e, "Cache lookup failed");
                    }
                }
            }
        }

        let mut last_error = None;
        for provider in &self.providers {
            debug!(provider = provider.name(), "Fetching company facts");

            match provider.fetch_company_facts(cik).await {
                Ok(facts) => {
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.put_company_facts(provider.name(), &facts).await {
                            warn!(
                                provider = provider.name(),
                                error = %e,
                                "Failed to cache company facts"
                            );
                        }
                    }
                    return Ok(facts);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FiscalError::Other("All providers failed with no error".to_string())))
    }

    /// Fetch facts for several companies concurrently.
    ///
    /// Results are returned in the order of `ciks`; one company failing does not
    /// affect the others.
    pub async fn company_facts_batch(&self, ciks: &[Cik]) -> Vec<Result<CompanyFacts>> {
        debug!(company_count = ciks.len(), "Fetching batch company facts");
        join_all(ciks.iter().map(|cik| self.company_facts(cik))).await
    }

    /// Resolve a ticker symbol to a CIK, trying providers in order.
    ///
    /// # Errors
    /// Returns [`FiscalError::ProviderNotConfigured`] if no provider is registered,
    /// otherwise the last provider's error when all of them fail.
    #[instrument(skip(self))]
    pub async fn lookup_cik(&self, ticker: &str) -> Result<Cik> {
        if self.providers.is_empty() {
            return Err(FiscalError::ProviderNotConfigured(
                "No company facts providers registered".to_string(),
            ));
        }

        let mut last_error = None;
        for provider in &self.providers {
            match provider.lookup_cik(ticker).await {
                Ok(cik) => return Ok(cik),
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FiscalError::Other("All providers failed with no error".to_string())))
    }

    /// Fetch a company's facts and build its annual report.
    ///
    /// # Errors
    /// Propagates errors from [`FactsRegistry::company_facts`].
    pub async fn annual_report(
        &self,
        cik: &Cik,
        metrics: &MetricSet,
        options: &ResolveOptions,
    ) -> Result<AnnualReport> {
        let facts = self.company_facts(cik).await?;
        Ok(AnnualReport::build(&facts, metrics, options))
    }

    // Convenience methods for adding common providers

    /// Add the SEC EDGAR provider.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client cannot
    /// be built.
    #[cfg(feature = "edgar")]
    pub fn with_edgar(mut self, config: fiscal_edgar::EdgarConfig) -> Result<Self> {
        let provider = Arc::new(fiscal_edgar::EdgarClient::new(config)?);
        self.register(provider);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fiscal_cache::InMemoryCache;
    use fiscal_core::{ConceptFacts, FactsProvider, RawFactRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct MockProvider {
        name: &'static str,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FactsProvider for MockProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "mock provider"
        }
    }

    #[async_trait]
    impl CompanyFactsProvider for MockProvider {
        async fn fetch_company_facts(&self, cik: &Cik) -> Result<CompanyFacts> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FiscalError::Network("connection refused".to_string()));
            }
            Ok(CompanyFacts::new(*cik, self.name).with_concept(
                "us-gaap",
                "NetIncomeLoss",
                ConceptFacts::with_unit(
                    "USD",
                    vec![
                        RawFactRecord::new(2021, "2021-12-25", 3.0)
                            .with_start("2020-12-27")
                            .with_filed("2022-02-03")
                            .annual_10k(),
                    ],
                ),
            ))
        }

        async fn lookup_cik(&self, ticker: &str) -> Result<Cik> {
            if self.fail || ticker != "AMD" {
                return Err(FiscalError::CompanyNotFound(ticker.to_string()));
            }
            Ok(Cik::new(2488))
        }
    }

    #[tokio::test]
    async fn test_no_providers() {
        let registry = FactsRegistry::new();
        let err = registry.company_facts(&Cik::new(2488)).await.unwrap_err();
        assert!(matches!(err, FiscalError::ProviderNotConfigured(_)));

        let err = registry.lookup_cik("AMD").await.unwrap_err();
        assert!(matches!(err, FiscalError::ProviderNotConfigured(_)));
    }

    #[tokio::test]
    async fn test_fallback_to_next_provider() {
        let broken = MockProvider::new("broken", true);
        let working = MockProvider::new("working", false);

        let mut registry = FactsRegistry::new();
        registry.register(broken.clone());
        registry.register(working.clone());
        assert_eq!(registry.provider_names(), vec!["broken", "working"]);

        let facts = registry.company_facts(&Cik::new(2488)).await.unwrap();
        assert_eq!(facts.entity_name, "working");
        assert_eq!(broken.calls(), 1);
        assert_eq!(working.calls(), 1);

        assert_eq!(registry.lookup_cik("AMD").await.unwrap(), Cik::new(2488));
    }

    #[tokio::test]
    async fn test_all_providers_fail_returns_last_error() {
        let mut registry = FactsRegistry::new();
        registry.register(MockProvider::new("a", true));
        registry.register(MockProvider::new("b", true));

        let err = registry.company_facts(&Cik::new(2488)).await.unwrap_err();
        assert!(matches!(err, FiscalError::Network(_)));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let provider = MockProvider::new("mock", false);
        let mut registry = FactsRegistry::with_cache(Arc::new(InMemoryCache::new()));
        registry.register(provider.clone());

        let cik = Cik::new(2488);
        let first = registry.company_facts(&cik).await.unwrap();
        let second = registry.company_facts(&cik).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
    }

    #[cfg(feature = "cache-sqlite")]
    #[tokio::test]
    async fn test_sqlite_cache_backs_registry() {
        let provider = MockProvider::new("mock", false);
        let cache = Arc::new(fiscal_cache::SqliteCache::in_memory().unwrap());
        let mut registry = FactsRegistry::with_cache(cache.clone());
        registry.register(provider.clone());

        let cik = Cik::new(2488);
        registry.company_facts(&cik).await.unwrap();
        registry.company_facts(&cik).await.unwrap();

        assert_eq!(provider.calls(), 1);
        assert!(cache.get_company_facts("mock", &cik).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let mut registry = FactsRegistry::new();
        registry.register(MockProvider::new("mock", false));

        let ciks = [Cik::new(2488), Cik::new(320193)];
        let results = registry.company_facts_batch(&ciks).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().cik, Cik::new(2488));
        assert_eq!(results[1].as_ref().unwrap().cik, Cik::new(320193));
    }

    #[tokio::test]
    async fn test_annual_report_from_registry() {
        let mut registry = FactsRegistry::new();
        registry.register(MockProvider::new("mock", false));

        let report = registry
            .annual_report(
                &Cik::new(2488),
                &MetricSet::standard(),
                &ResolveOptions::default(),
            )
            .await
            .unwrap();

        let net_income = report.series(MetricSet::NET_INCOME).unwrap();
        assert_eq!(net_income.values.len(), 1);
        assert_eq!(net_income.values[0].fiscal_year, 2021);
        assert_eq!(net_income.growth[0].growth_pct, None);
    }
}
