#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fiscal/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Authoritative annual values from SEC XBRL company facts.
//!
//! This crate ties the workspace together. It re-exports the core types, the
//! resolver and the cache implementations, and adds:
//!
//! - [`FactsRegistry`] - cache-first fetching with provider fallback
//! - [`AnnualReport`] - several metrics resolved, with growth and net margin
//! - [`AnnualTable`] - series outer-joined on fiscal year, exportable as CSV
//!
//! # Features
//!
//! - `edgar` - SEC EDGAR company facts client
//! - `cache-sqlite` - SQLite-based caching

// Core types and traits
pub use fiscal_core::*;

// Resolution
pub use fiscal_resolve::{
    ResolveOptions, Resolution, compute_yoy, derived_ratio, growth_pct, net_margin,
    resolve_annual, resolve_concept, return_on_assets, select_annual_candidates,
};

// Cache implementations
#[cfg(feature = "cache-sqlite")]
pub use fiscal_cache::SqliteCache;
pub use fiscal_cache::{InMemoryCache, NoopCache};

// Providers
#[cfg(feature = "edgar")]
pub use fiscal_edgar::{EdgarClient, EdgarConfig};

mod registry;
mod report;
mod table;

pub use registry::FactsRegistry;
pub use report::{AnnualReport, Metric, MetricSeries, MetricSet};
pub use table::{AnnualTable, CsvHeader, TableRow, write_csv};
