//! Explicit configuration for loading and resolving facts.

use fiscal_core::FiscalPeriod;

/// Options controlling candidate selection and duration filtering.
///
/// `Default` yields the US-GAAP / USD / 10-K / FY selection with a 350-day
/// minimum span and a one-year lookback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Taxonomy namespace searched for concepts.
    pub taxonomy: String,
    /// Unit whose records are resolved.
    pub unit: String,
    /// Form type of eligible records.
    pub form: String,
    /// Fiscal period code of eligible records.
    pub fiscal_period: FiscalPeriod,
    /// Minimum span, in days, for a duration record to count as a full year.
    pub min_duration_days: i64,
    /// How many calendar years before the fiscal year a duration period may start or end.
    pub max_lookback_years: i32,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            taxonomy: "us-gaap".to_string(),
            unit: "USD".to_string(),
            form: "10-K".to_string(),
            fiscal_period: FiscalPeriod::FullYear,
            min_duration_days: 350,
            max_lookback_years: 1,
        }
    }
}

impl ResolveOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the taxonomy namespace.
    #[must_use]
    pub fn with_taxonomy(mut self, taxonomy: impl Into<String>) -> Self {
        self.taxonomy = taxonomy.into();
        self
    }

    /// Sets the unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the eligible form type.
    #[must_use]
    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = form.into();
        self
    }

    /// Sets the minimum full-year span in days.
    #[must_use]
    pub const fn with_min_duration_days(mut self, days: i64) -> Self {
        self.min_duration_days = days;
        self
    }

    /// Sets the lookback window in years.
    #[must_use]
    pub const fn with_max_lookback_years(mut self, years: i32) -> Self {
        self.max_lookback_years = years;
        self
    }
}
