#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fiscal/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fiscal-period resolution for XBRL company facts.
//!
//! Data flows one way:
//!
//! 1. [`select_annual_candidates`] - keep the 10-K full-year records of a concept
//! 2. [`resolve_annual`] - pick one record per fiscal year
//! 3. [`compute_yoy`] / [`derived_ratio`] - growth and cross-concept ratios
//!
//! # Example
//!
//! ```
//! use fiscal_core::{Cik, CompanyFacts, ConceptFacts, RawFactRecord};
//! use fiscal_resolve::{ResolveOptions, compute_yoy, resolve_concept};
//!
//! let records = vec![
//!     RawFactRecord::new(2021, "2021-12-25", 3.16e9)
//!         .with_start("2020-12-27")
//!         .with_filed("2022-02-03")
//!         .annual_10k(),
//!     RawFactRecord::new(2022, "2022-12-31", 1.32e9)
//!         .with_start("2021-12-26")
//!         .with_filed("2023-02-27")
//!         .annual_10k(),
//! ];
//! let facts = CompanyFacts::new(Cik::new(2488), "AMD").with_concept(
//!     "us-gaap",
//!     "NetIncomeLoss",
//!     ConceptFacts::with_unit("USD", records),
//! );
//!
//! let resolution = resolve_concept(&facts, "NetIncomeLoss", &ResolveOptions::default())?;
//! let growth = compute_yoy(&resolution.values);
//! assert_eq!(growth.len(), 2);
//! assert!(growth[1].growth_pct.is_some_and(|g| g < 0.0));
//! # Ok::<(), fiscal_core::FiscalError>(())
//! ```

/// Growth and derived ratio computation.
pub mod growth;
/// Annual candidate selection.
pub mod loader;
/// Loader and resolver configuration.
pub mod options;
/// Per-fiscal-year resolution.
pub mod resolver;

pub use growth::{compute_yoy, derived_ratio, growth_pct, net_margin, return_on_assets};
pub use loader::select_annual_candidates;
pub use options::ResolveOptions;
pub use resolver::{Resolution, resolve_annual, resolve_concept};
