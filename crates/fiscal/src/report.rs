//! Multi-concept annual report.

use fiscal_core::{
    CompanyFacts, CompanyMeta, DerivedRatio, GrowthPoint, MetricKind, ResolvedAnnualValue,
};
use fiscal_resolve::{ResolveOptions, compute_yoy, net_margin, resolve_concept};
use tracing::{debug, warn};

use crate::table::AnnualTable;

/// A named metric and the concepts that may report it, in order of preference.
///
/// Companies tag the same line item differently; the first concept that
/// resolves to at least one fiscal year is used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metric {
    /// Column name of the metric (e.g. "net_income").
    pub name: String,
    /// Candidate concept identifiers.
    pub concepts: Vec<String>,
}

impl Metric {
    /// Creates a metric backed by a single concept.
    #[must_use]
    pub fn new(name: impl Into<String>, concept: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            concepts: vec![concept.into()],
        }
    }

    /// Adds a fallback concept.
    #[must_use]
    pub fn or_concept(mut self, concept: impl Into<String>) -> Self {
        self.concepts.push(concept.into());
        self
    }
}

/// Ordered set of metrics to resolve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricSet {
    metrics: Vec<Metric>,
}

impl MetricSet {
    /// Name of the net income metric in [`MetricSet::standard`].
    pub const NET_INCOME: &'static str = "net_income";
    /// Name of the revenue metric in [`MetricSet::standard`].
    pub const REVENUE: &'static str = "revenue";
    /// Name of the total assets metric in [`MetricSet::standard`].
    pub const ASSETS: &'static str = "assets";

    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Net income, revenue and total assets.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with(Metric::new(Self::NET_INCOME, "NetIncomeLoss"))
            .with(
                Metric::new(
                    Self::REVENUE,
                    "RevenueFromContractWithCustomerExcludingAssessedTax",
                )
                .or_concept("Revenues")
                .or_concept("SalesRevenueNet"),
            )
            .with(Metric::new(Self::ASSETS, "Assets"))
    }

    /// Appends a metric.
    #[must_use]
    pub fn with(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Metrics in order.
    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter()
    }

    /// Number of metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// The resolved history of one metric.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSeries {
    /// Metric name.
    pub name: String,
    /// Concept that supplied the values.
    pub concept: String,
    /// Duration or instant.
    pub kind: Option<MetricKind>,
    /// One value per fiscal year, ascending.
    pub values: Vec<ResolvedAnnualValue>,
    /// Values with year-over-year growth.
    pub growth: Vec<GrowthPoint>,
    /// Number of records skipped as malformed.
    pub rejected: usize,
}

/// Resolved metrics, growth and margins for one company.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnualReport {
    /// Company metadata, passed through untouched.
    pub meta: CompanyMeta,
    /// Series of every metric that had data, in metric-set order.
    pub series: Vec<MetricSeries>,
    /// Net margin per fiscal year where both net income and revenue resolved.
    pub margins: Vec<DerivedRatio>,
}

impl AnnualReport {
    /// Resolves every metric of `metrics` against `facts`.
    ///
    /// Metrics whose concepts are missing or resolve to nothing are left out of
    /// the report with a warning; they never fail the whole report.
    #[must_use]
    pub fn build(facts: &CompanyFacts, metrics: &MetricSet, options: &ResolveOptions) -> Self {
        let series: Vec<MetricSeries> = metrics
            .iter()
            .filter_map(|metric| resolve_metric(facts, metric, options))
            .collect();

        let mut report = Self {
            meta: facts.metadata(),
            series,
            margins: Vec::new(),
        };

        if let (Some(ni), Some(rev)) = (
            report.series(MetricSet::NET_INCOME),
            report.series(MetricSet::REVENUE),
        ) {
            report.margins = net_margin(&ni.values, &rev.values);
        }

        debug!(
            entity = %report.meta.entity_name,
            metrics = report.series.len(),
            margins = report.margins.len(),
            "Built annual report"
        );
        report
    }

    /// Series of a metric by name.
    #[must_use]
    pub fn series(&self, name: &str) -> Option<&MetricSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Returns true if no metric had data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// All series outer-joined on fiscal year.
    #[must_use]
    pub fn table(&self) -> AnnualTable {
        AnnualTable::outer_join(
            self.series
                .iter()
                .map(|s| (s.name.as_str(), s.values.as_slice())),
        )
    }
}

fn resolve_metric(
    facts: &CompanyFacts,
    metric: &Metric,
    options: &ResolveOptions,
) -> Option<MetricSeries> {
    for concept in &metric.concepts {
        match resolve_concept(facts, concept, options) {
            Ok(resolution) if !resolution.is_empty() => {
                let growth = compute_yoy(&resolution.values);
                return Some(MetricSeries {
                    name: metric.name.clone(),
                    concept: concept.clone(),
                    kind: resolution.kind,
                    rejected: resolution.rejected.len(),
                    values: resolution.values,
                    growth,
                });
            }
            Ok(_) => {
                debug!(metric = %metric.name, concept, "Concept resolved to no fiscal years");
            }
            Err(e) if e.is_missing_data() => {
                debug!(metric = %metric.name, concept, error = %e, "Concept unavailable");
            }
            Err(e) => {
                warn!(metric = %metric.name, concept, error = %e, "Failed to resolve concept");
            }
        }
    }

    warn!(metric = %metric.name, "No data for metric, skipping");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_core::{Cik, ConceptFacts, RawFactRecord};

    fn duration(fy: i32, start: &str, end: &str, value: f64) -> RawFactRecord {
        RawFactRecord::new(fy, end, value)
            .with_start(start)
            .with_filed(format!("{}-02-15", fy + 1))
            .annual_10k()
    }

    fn sample_facts() -> CompanyFacts {
        CompanyFacts::new(Cik::new(2488), "ADVANCED MICRO DEVICES, INC.")
            .with_tickers(vec!["AMD".to_string()])
            .with_concept(
                "us-gaap",
                "NetIncomeLoss",
                ConceptFacts::with_unit(
                    "USD",
                    vec![
                        duration(2019, "2018-12-30", "2019-12-28", 10.0),
                        duration(2020, "2019-12-29", "2020-12-26", 20.0),
                        duration(2021, "2020-12-27", "2021-12-25", 30.0),
                    ],
                ),
            )
            // No records tagged with the preferred revenue concept.
            .with_concept(
                "us-gaap",
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                ConceptFacts::with_unit("USD", vec![]),
            )
            .with_concept(
                "us-gaap",
                "Revenues",
                ConceptFacts::with_unit(
                    "USD",
                    vec![
                        duration(2020, "2019-12-29", "2020-12-26", 100.0),
                        duration(2021, "2020-12-27", "2021-12-25", 200.0),
                        duration(2022, "2021-12-26", "2022-12-31", 300.0),
                    ],
                ),
            )
    }

    #[test]
    fn test_report_resolves_available_metrics() {
        let report = AnnualReport::build(
            &sample_facts(),
            &MetricSet::standard(),
            &ResolveOptions::default(),
        );

        assert_eq!(report.meta.entity_name, "ADVANCED MICRO DEVICES, INC.");
        assert_eq!(report.series.len(), 2);
        assert!(report.series(MetricSet::ASSETS).is_none());

        let revenue = report.series(MetricSet::REVENUE).unwrap();
        assert_eq!(revenue.concept, "Revenues");
        assert_eq!(revenue.kind, Some(MetricKind::Duration));
        assert_eq!(revenue.growth[1].growth_pct, Some(100.0));
        assert_eq!(revenue.growth[2].growth_pct, Some(50.0));
    }

    #[test]
    fn test_report_margins_use_common_years() {
        let report = AnnualReport::build(
            &sample_facts(),
            &MetricSet::standard(),
            &ResolveOptions::default(),
        );
        let years: Vec<i32> = report.margins.iter().map(|m| m.fiscal_year).collect();
        assert_eq!(years, vec![2020, 2021]);
        assert_eq!(report.margins[0].value, Some(0.2));
    }

    #[test]
    fn test_report_table_is_outer_join() {
        let report = AnnualReport::build(
            &sample_facts(),
            &MetricSet::standard(),
            &ResolveOptions::default(),
        );
        let table = report.table();
        assert_eq!(table.columns(), ["net_income", "revenue"]);
        assert_eq!(table.rows().len(), 4);
        assert_eq!(table.get(2019, "revenue"), None);
        assert_eq!(table.get(2022, "net_income"), None);
    }

    #[test]
    fn test_report_without_data_is_empty() {
        let facts = CompanyFacts::new(Cik::new(1), "Shell Co");
        let report =
            AnnualReport::build(&facts, &MetricSet::standard(), &ResolveOptions::default());
        assert!(report.is_empty());
        assert!(report.margins.is_empty());
        assert!(report.table().is_empty());
    }

    #[test]
    fn test_metric_set_standard() {
        let metrics = MetricSet::standard();
        assert_eq!(metrics.len(), 3);
        let names: Vec<&str> = metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["net_income", "revenue", "assets"]);
    }
}
