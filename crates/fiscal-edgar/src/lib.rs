#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fiscal/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR company-facts client.
//!
//! This crate provides:
//!
//! - CIK (Central Index Key) lookup from ticker symbols
//! - Raw company facts from the EDGAR XBRL API
//!
//! # Example
//!
//! ```no_run
//! use fiscal_core::{Cik, CompanyFactsProvider};
//! use fiscal_edgar::{EdgarClient, EdgarConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new(EdgarConfig::new("MyApp/1.0", "contact@example.com"))?;
//!
//!     let cik = client.lookup_cik("AMD").await?;
//!     let facts = client.fetch_company_facts(&cik).await?;
//!     println!("{} ({})", facts.entity_name, facts.cik);
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use fiscal_core::{
    Cik, CompanyFacts, CompanyFactsProvider, FactsProvider, FiscalError, Result,
};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument};

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC company tickers URL
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// SEC requirement: at most 10 requests per second
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for [`EdgarClient`].
///
/// The SEC asks every client to identify itself, so the user agent is required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgarConfig {
    /// User agent sent with every request.
    pub user_agent: String,
    /// Base URL of the XBRL API.
    pub base_url: String,
    /// URL of the ticker to CIK mapping.
    pub tickers_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Minimum spacing between two requests.
    pub min_request_interval: Duration,
}

impl EdgarConfig {
    /// Creates a configuration identifying the caller as `"{app} {contact}"`.
    ///
    /// # Example
    /// ```
    /// use fiscal_edgar::EdgarConfig;
    ///
    /// let config = EdgarConfig::new("MyApp/1.0", "contact@example.com");
    /// assert_eq!(config.user_agent, "MyApp/1.0 contact@example.com");
    /// ```
    #[must_use]
    pub fn new(app: &str, contact: &str) -> Self {
        Self::with_user_agent(format!("{app} {contact}"))
    }

    /// Creates a configuration with a preformatted user agent.
    #[must_use]
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            base_url: EDGAR_BASE_URL.to_string(),
            tickers_url: COMPANY_TICKERS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            min_request_interval: DEFAULT_MIN_INTERVAL,
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the ticker mapping URL.
    #[must_use]
    pub fn tickers_url(mut self, tickers_url: impl Into<String>) -> Self {
        self.tickers_url = tickers_url.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the minimum spacing between requests.
    #[must_use]
    pub const fn min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(FiscalError::InvalidParameter(
                "EDGAR requires a non-empty user agent".to_string(),
            ));
        }
        Ok(())
    }

    fn company_facts_url(&self, cik: &Cik) -> String {
        format!("{}/api/xbrl/companyfacts/CIK{}.json", self.base_url, cik.padded())
    }
}

// =============================================================================
// Client
// =============================================================================

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    const fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// SEC EDGAR company-facts client.
///
/// Implements rate limiting per SEC requirements (max 10 requests/second).
#[derive(Debug)]
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    config: EdgarConfig,
}

impl EdgarClient {
    /// Create a new client from a configuration.
    ///
    /// # Errors
    /// Returns [`FiscalError::InvalidParameter`] for an empty user agent and
    /// [`FiscalError::Network`] if the HTTP client cannot be built.
    pub fn new(config: EdgarConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| FiscalError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a new client with a pre-configured HTTP client.
    ///
    /// The caller is responsible for setting the user agent on `client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: EdgarConfig) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(config.min_request_interval))),
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &EdgarConfig {
        &self.config
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.lock().await.wait().await;

        debug!(url, "Fetching from SEC");
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| FiscalError::Network(e.to_string()))
    }

    /// Look up a company's CIK from its ticker symbol.
    ///
    /// # Errors
    /// Returns [`FiscalError::InvalidParameter`] for an empty ticker and
    /// [`FiscalError::CompanyNotFound`] if no company uses the ticker.
    #[instrument(skip(self))]
    pub async fn get_cik(&self, ticker: &str) -> Result<Cik> {
        if ticker.trim().is_empty() {
            return Err(FiscalError::InvalidParameter("Empty ticker".to_string()));
        }

        let response = self.get(&self.config.tickers_url).await?;

        if !response.status().is_success() {
            return Err(FiscalError::Network(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        let data: HashMap<String, CompanyTickerInfo> = response
            .json()
            .await
            .map_err(|e| FiscalError::Parse(format!("Failed to parse company tickers: {e}")))?;

        let cik = find_cik(&data, ticker)
            .ok_or_else(|| FiscalError::CompanyNotFound(ticker.to_string()))?;
        debug!(%cik, ticker, "Found CIK");
        Ok(cik)
    }

    /// Fetch the raw XBRL company facts.
    ///
    /// # Errors
    /// Returns [`FiscalError::CompanyNotFound`] on HTTP 404, [`FiscalError::Network`]
    /// on other failures and [`FiscalError::Parse`] if the body cannot be decoded.
    #[instrument(skip(self), fields(cik = %cik))]
    pub async fn get_company_facts(&self, cik: &Cik) -> Result<CompanyFacts> {
        let url = self.config.company_facts_url(cik);
        let response = self.get(&url).await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(FiscalError::CompanyNotFound(cik.to_string())),
            status => {
                return Err(FiscalError::Network(format!(
                    "Failed to fetch company facts for CIK {cik}: HTTP {status}"
                )));
            }
        }

        let facts: CompanyFacts = response
            .json()
            .await
            .map_err(|e| FiscalError::Parse(format!("Failed to parse company facts: {e}")))?;

        debug!(
            entity = %facts.entity_name,
            taxonomies = facts.facts.len(),
            "Fetched company facts"
        );
        Ok(facts)
    }
}

impl FactsProvider for EdgarClient {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    fn description(&self) -> &str {
        "SEC EDGAR XBRL company facts from 10-K and 10-Q filings"
    }
}

#[async_trait]
impl CompanyFactsProvider for EdgarClient {
    async fn fetch_company_facts(&self, cik: &Cik) -> Result<CompanyFacts> {
        self.get_company_facts(cik).await
    }

    async fn lookup_cik(&self, ticker: &str) -> Result<Cik> {
        self.get_cik(ticker).await
    }
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
}

fn find_cik(data: &HashMap<String, CompanyTickerInfo>, ticker: &str) -> Option<Cik> {
    let wanted = ticker.trim();
    data.values()
        .find(|company| company.ticker.eq_ignore_ascii_case(wanted))
        .map(|company| Cik::new(company.cik_str))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers() -> HashMap<String, CompanyTickerInfo> {
        serde_json::from_value(serde_json::json!({
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 2488, "ticker": "AMD", "title": "ADVANCED MICRO DEVICES INC"},
            "2": {"cik_str": 1045810, "ticker": "NVDA", "title": "NVIDIA CORP"}
        }))
        .unwrap()
    }

    #[test]
    fn test_find_cik_case_insensitive() {
        let data = tickers();
        assert_eq!(find_cik(&data, "AMD"), Some(Cik::new(2488)));
        assert_eq!(find_cik(&data, "nvda"), Some(Cik::new(1_045_810)));
        assert_eq!(find_cik(&data, " aapl "), Some(Cik::new(320_193)));
        assert_eq!(find_cik(&data, "TSLA"), None);
    }

    #[test]
    fn test_company_facts_url() {
        let config = EdgarConfig::new("Test/1.0", "test@example.com");
        assert_eq!(
            config.company_facts_url(&Cik::new(2488)),
            "https://data.sec.gov/api/xbrl/companyfacts/CIK0000002488.json"
        );

        let config = config.base_url("http://localhost:8080/");
        assert_eq!(
            config.company_facts_url(&Cik::new(2488)),
            "http://localhost:8080/api/xbrl/companyfacts/CIK0000002488.json"
        );
    }

    #[test]
    fn test_config_requires_user_agent() {
        let err = EdgarClient::new(EdgarConfig::with_user_agent("  ")).unwrap_err();
        assert!(matches!(err, FiscalError::InvalidParameter(_)));
    }

    #[test]
    fn test_config_builders() {
        let config = EdgarConfig::with_user_agent("Research bot ops@example.com")
            .timeout(Duration::from_secs(5))
            .min_request_interval(Duration::from_millis(250))
            .tickers_url("http://localhost/tickers.json");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.min_request_interval, Duration::from_millis(250));
        assert_eq!(config.tickers_url, "http://localhost/tickers.json");
    }

    #[test]
    fn test_provider_metadata() {
        let client = EdgarClient::new(EdgarConfig::new("Test/1.0", "test@example.com")).unwrap();
        assert_eq!(client.name(), "SEC EDGAR");
        assert!(!client.description().is_empty());
        assert_eq!(client.config().user_agent, "Test/1.0 test@example.com");
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected_without_request() {
        let client = EdgarClient::new(EdgarConfig::new("Test/1.0", "test@example.com")).unwrap();
        let err = client.get_cik("").await.unwrap_err();
        assert!(matches!(err, FiscalError::InvalidParameter(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_spacing() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
