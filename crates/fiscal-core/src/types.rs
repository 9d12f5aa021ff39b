//! Core data types for XBRL company facts.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Cik`] - SEC Central Index Key
//! - [`RawFactRecord`] - One reported observation for a concept
//! - [`ConceptFacts`] - All unit-tagged records for one concept
//! - [`CompanyFacts`] - The full fact collection for one company
//! - [`CompanyMeta`] - Company metadata passed through to presentation layers
//! - [`ResolvedAnnualValue`] - The single authoritative value for a fiscal year
//! - [`GrowthPoint`] - A resolved value with its year-over-year growth
//! - [`DerivedRatio`] - A cross-concept ratio for one fiscal year

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FiscalError;
use crate::period::FiscalPeriod;

/// SEC Central Index Key.
///
/// Displayed zero-padded to ten digits, the form EDGAR URLs expect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cik(u64);

impl Cik {
    /// Creates a CIK from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns the ten-digit zero-padded form.
    #[must_use]
    pub fn padded(&self) -> String {
        format!("{:010}", self.0)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

impl FromStr for Cik {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("CIK")
            .or_else(|| trimmed.strip_prefix("cik"))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FiscalError::InvalidParameter(format!("Invalid CIK: {s:?}")));
        }

        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|e| FiscalError::InvalidParameter(format!("Invalid CIK {s:?}: {e}")))
    }
}

impl From<u64> for Cik {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One reported observation for a concept, as delivered by the facts API.
///
/// Date fields are kept as the raw strings from the payload; they are parsed
/// during resolution so that a malformed date can be attributed to exactly
/// one record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFactRecord {
    /// Fiscal year the filing is associated with.
    #[serde(rename = "fy", default)]
    pub fiscal_year: Option<i32>,
    /// Fiscal period code ("FY", "Q1", ...).
    #[serde(rename = "fp", default)]
    pub fiscal_period: Option<FiscalPeriod>,
    /// Form type (e.g. "10-K", "10-Q").
    #[serde(default)]
    pub form: Option<String>,
    /// Start of the measured interval; absent for instant metrics.
    #[serde(rename = "start", default, skip_serializing_if = "Option::is_none")]
    pub period_start: Option<String>,
    /// End of the measured interval, or the instant itself.
    #[serde(rename = "end", default)]
    pub period_end: String,
    /// Date the filing was submitted to the regulator.
    #[serde(rename = "filed", default)]
    pub filed_date: Option<String>,
    /// Reported value.
    #[serde(rename = "val")]
    pub value: f64,
    /// Accession number of the filing.
    #[serde(rename = "accn", default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    /// Calendar frame assigned by the API (e.g. "CY2021", "CY2021Q4I").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

impl RawFactRecord {
    /// Creates a record with the required fields.
    #[must_use]
    pub fn new(fiscal_year: i32, period_end: impl Into<String>, value: f64) -> Self {
        Self {
            fiscal_year: Some(fiscal_year),
            period_end: period_end.into(),
            value,
            ..Default::default()
        }
    }

    /// Sets the period start, turning the record into a duration fact.
    #[must_use]
    pub fn with_start(mut self, period_start: impl Into<String>) -> Self {
        self.period_start = Some(period_start.into());
        self
    }

    /// Sets the filed date.
    #[must_use]
    pub fn with_filed(mut self, filed_date: impl Into<String>) -> Self {
        self.filed_date = Some(filed_date.into());
        self
    }

    /// Sets the form type.
    #[must_use]
    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    /// Sets the fiscal period code.
    #[must_use]
    pub fn with_fiscal_period(mut self, fiscal_period: FiscalPeriod) -> Self {
        self.fiscal_period = Some(fiscal_period);
        self
    }

    /// Sets the accession number.
    #[must_use]
    pub fn with_accession(mut self, accession: impl Into<String>) -> Self {
        self.accession = Some(accession.into());
        self
    }

    /// Marks the record as an annual 10-K full-year filing.
    #[must_use]
    pub fn annual_10k(self) -> Self {
        self.with_form("10-K")
            .with_fiscal_period(FiscalPeriod::FullYear)
    }

    /// Returns true if the record carries a period start.
    #[must_use]
    pub const fn has_start(&self) -> bool {
        self.period_start.is_some()
    }

    /// Short identification used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        let fy = self
            .fiscal_year
            .map_or_else(|| "?".to_string(), |fy| fy.to_string());
        match &self.accession {
            Some(accn) => format!("accn={accn} fy={fy} end={:?}", self.period_end),
            None => format!("fy={fy} end={:?}", self.period_end),
        }
    }
}

/// All records reported for one concept, keyed by unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptFacts {
    /// Label of the concept.
    #[serde(default)]
    pub label: Option<String>,
    /// Description of the concept.
    #[serde(default)]
    pub description: Option<String>,
    /// Records grouped by unit ("USD", "shares", ...).
    #[serde(default)]
    pub units: HashMap<String, Vec<RawFactRecord>>,
}

impl ConceptFacts {
    /// Creates a concept holding a single unit's records.
    #[must_use]
    pub fn with_unit(unit: impl Into<String>, records: Vec<RawFactRecord>) -> Self {
        Self {
            units: HashMap::from([(unit.into(), records)]),
            ..Default::default()
        }
    }
}

/// The complete fact collection for one company.
///
/// Facts are keyed first by taxonomy namespace (e.g. "us-gaap"), then by
/// concept identifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFacts {
    /// CIK of the company.
    pub cik: Cik,
    /// Registered entity name.
    pub entity_name: String,
    /// Ticker symbols, when the source supplies them.
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Facts organized by taxonomy and concept.
    #[serde(default)]
    pub facts: HashMap<String, HashMap<String, ConceptFacts>>,
}

impl CompanyFacts {
    /// Creates an empty fact collection.
    #[must_use]
    pub fn new(cik: Cik, entity_name: impl Into<String>) -> Self {
        Self {
            cik,
            entity_name: entity_name.into(),
            ..Default::default()
        }
    }

    /// Adds (or replaces) a concept under a taxonomy.
    #[must_use]
    pub fn with_concept(
        mut self,
        taxonomy: impl Into<String>,
        concept: impl Into<String>,
        facts: ConceptFacts,
    ) -> Self {
        self.facts
            .entry(taxonomy.into())
            .or_default()
            .insert(concept.into(), facts);
        self
    }

    /// Sets the ticker symbols.
    #[must_use]
    pub fn with_tickers(mut self, tickers: Vec<String>) -> Self {
        self.tickers = tickers;
        self
    }

    /// Looks up one concept.
    #[must_use]
    pub fn concept(&self, taxonomy: &str, concept: &str) -> Option<&ConceptFacts> {
        self.facts.get(taxonomy)?.get(concept)
    }

    /// Number of concepts reported under a taxonomy.
    #[must_use]
    pub fn concept_count(&self, taxonomy: &str) -> usize {
        self.facts.get(taxonomy).map_or(0, HashMap::len)
    }

    /// Returns the company metadata, untouched.
    #[must_use]
    pub fn metadata(&self) -> CompanyMeta {
        CompanyMeta {
            entity_name: self.entity_name.clone(),
            cik: self.cik,
            tickers: self.tickers.clone(),
        }
    }
}

/// Company metadata passed through to presentation layers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMeta {
    /// Registered entity name.
    pub entity_name: String,
    /// CIK of the company.
    pub cik: Cik,
    /// Ticker symbols.
    pub tickers: Vec<String>,
}

impl CompanyMeta {
    /// Tickers joined for display, or `None` when there are none.
    #[must_use]
    pub fn ticker_list(&self) -> Option<String> {
        if self.tickers.is_empty() {
            None
        } else {
            Some(self.tickers.join(", "))
        }
    }
}

/// The single authoritative value for one concept and fiscal year.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAnnualValue {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Resolved value.
    pub value: f64,
}

impl ResolvedAnnualValue {
    /// Creates a resolved value.
    #[must_use]
    pub const fn new(fiscal_year: i32, value: f64) -> Self {
        Self { fiscal_year, value }
    }
}

/// A resolved value together with its year-over-year growth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Resolved value.
    pub value: f64,
    /// Growth versus the previous entry in percent; `None` when not applicable.
    pub growth_pct: Option<f64>,
}

impl GrowthPoint {
    /// Returns true for a strictly positive value (a profit for income concepts).
    #[must_use]
    pub fn is_profit(&self) -> bool {
        self.value > 0.0
    }
}

/// A cross-concept ratio for one fiscal year, as a fraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedRatio {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Ratio value; `None` when the denominator is zero.
    pub value: Option<f64>,
}

impl DerivedRatio {
    /// The ratio scaled to percent.
    #[must_use]
    pub fn as_percent(&self) -> Option<f64> {
        self.value.map(|v| v * 100.0)
    }
}
