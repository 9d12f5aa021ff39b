#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fiscal/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for XBRL fiscal-year resolution.
//!
//! This crate provides the foundational abstractions shared by the resolver and
//! its collaborators:
//!
//! - [`CompanyFacts`](types::CompanyFacts) - Raw fact collection keyed by taxonomy and concept
//! - [`RawFactRecord`](types::RawFactRecord) - One reported observation
//! - [`ResolvedAnnualValue`](types::ResolvedAnnualValue) - One authoritative value per fiscal year
//! - [`CompanyFactsProvider`](provider::CompanyFactsProvider) - Fetch seam
//! - [`FactsCache`](cache::FactsCache) - Caching abstraction

/// Cache trait for storing fetched facts.
pub mod cache;
/// Error types for fact operations.
pub mod error;
/// Fiscal period and metric kind definitions.
pub mod period;
/// Provider traits for fetching company facts.
pub mod provider;
/// Core data types (Cik, RawFactRecord, CompanyFacts, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::FactsCache;
pub use error::{FiscalError, Result};
pub use period::{FiscalPeriod, MetricKind};
pub use provider::{CompanyFactsProvider, FactsProvider};
pub use types::{
    Cik, CompanyFacts, CompanyMeta, ConceptFacts, DerivedRatio, GrowthPoint, RawFactRecord,
    ResolvedAnnualValue,
};
