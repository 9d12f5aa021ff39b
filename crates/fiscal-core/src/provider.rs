//! Provider traits for fetching company facts.
//!
//! This module defines the seam between the resolution engine and the
//! network-facing collaborators:
//!
//! - [`FactsProvider`] - Base trait for all providers
//! - [`CompanyFactsProvider`] - Raw XBRL company facts and ticker lookup

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{Cik, CompanyFacts},
};

/// Base trait for all fact providers.
pub trait FactsProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for raw company facts.
///
/// Implementations perform the I/O; everything downstream of
/// [`fetch_company_facts`](CompanyFactsProvider::fetch_company_facts) is pure.
#[async_trait]
pub trait CompanyFactsProvider: FactsProvider {
    /// Fetches the complete fact collection for a company.
    async fn fetch_company_facts(&self, cik: &Cik) -> Result<CompanyFacts>;

    /// Resolves a ticker symbol to a CIK.
    async fn lookup_cik(&self, ticker: &str) -> Result<Cik>;
}
