//! Annual value resolution.
//!
//! Candidates are grouped by fiscal year and exactly one record is selected per
//! year. The concept's [`MetricKind`] is decided once, from the shape most
//! well-formed records share (the earliest record breaks a tie), and drives the
//! selection rule:
//!
//! - [`MetricKind::Instant`]: the most recently filed record wins.
//! - [`MetricKind::Duration`]: records spanning less than a full year, or describing
//!   stale prior periods, are discarded; the rest are ranked by how close their
//!   period-end year is to the fiscal year, then by longest span.
//!
//! Both rules are expressed as a total order over a score type and the minimum
//! wins. Among equal scores the record that appears first in candidate order wins.

use chrono::{Datelike, NaiveDate};
use fiscal_core::{
    CompanyFacts, FiscalError, MetricKind, RawFactRecord, ResolvedAnnualValue, Result,
};
use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

use crate::loader::select_annual_candidates;
use crate::options::ResolveOptions;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of resolving one concept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// Shape of the concept; `None` when there was nothing to classify.
    pub kind: Option<MetricKind>,
    /// One value per resolved fiscal year, strictly ascending by year.
    pub values: Vec<ResolvedAnnualValue>,
    /// Records skipped because their periods could not be used.
    pub rejected: Vec<FiscalError>,
}

impl Resolution {
    /// Returns true if no fiscal year was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of resolved fiscal years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Resolved fiscal years, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.iter().map(|v| v.fiscal_year)
    }

    /// Value resolved for a fiscal year.
    #[must_use]
    pub fn value_for(&self, fiscal_year: i32) -> Option<f64> {
        self.values
            .binary_search_by_key(&fiscal_year, |v| v.fiscal_year)
            .ok()
            .map(|idx| self.values[idx].value)
    }

    /// Consumes the resolution and returns the resolved series.
    #[must_use]
    pub fn into_values(self) -> Vec<ResolvedAnnualValue> {
        self.values
    }
}

/// A candidate record with its dates parsed.
#[derive(Clone, Copy, Debug)]
struct Observation<'a> {
    record: &'a RawFactRecord,
    start: Option<NaiveDate>,
    end: NaiveDate,
    filed: Option<NaiveDate>,
}

impl<'a> Observation<'a> {
    fn parse(record: &'a RawFactRecord) -> Result<Self> {
        let end = parse_date(record, "end", &record.period_end)?;
        let start = record
            .period_start
            .as_deref()
            .map(|raw| parse_date(record, "start", raw))
            .transpose()?;
        let filed = record
            .filed_date
            .as_deref()
            .map(|raw| parse_date(record, "filed", raw))
            .transpose()?;

        Ok(Self {
            record,
            start,
            end,
            filed,
        })
    }

    const fn kind(&self) -> MetricKind {
        MetricKind::from_has_start(self.start.is_some())
    }

    fn duration_days(&self) -> Option<i64> {
        self.start
            .map(|start| self.end.signed_duration_since(start).num_days())
    }
}

/// Ranking of a duration candidate; smaller is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct DurationScore {
    /// Distance between the period-end calendar year and the fiscal year.
    year_distance: u32,
    /// Span in days, longest first.
    span: Reverse<i64>,
}

/// Ranking of an instant candidate; smaller is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct InstantScore {
    /// Filed date, latest first.
    filed: Reverse<NaiveDate>,
}

fn parse_date(record: &RawFactRecord, field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| malformed(record, format!("invalid {field} date {raw:?}: {e}")))
}

fn malformed(record: &RawFactRecord, reason: String) -> FiscalError {
    FiscalError::MalformedPeriod {
        record: record.describe(),
        reason,
    }
}

/// Picks the candidate with the smallest score; the first one wins ties.
fn select_by_score<'a, K, F>(candidates: &[Observation<'a>], score: F) -> Option<Observation<'a>>
where
    K: Ord,
    F: Fn(&Observation<'a>) -> Option<K>,
{
    candidates
        .iter()
        .filter_map(|obs| score(obs).map(|key| (key, *obs)))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, obs)| obs)
}

fn score_instant(obs: &Observation<'_>) -> Option<InstantScore> {
    obs.filed.map(|filed| InstantScore {
        filed: Reverse(filed),
    })
}

fn score_duration(
    obs: &Observation<'_>,
    fiscal_year: i32,
    options: &ResolveOptions,
) -> Option<DurationScore> {
    let start = obs.start?;
    let days = obs.duration_days()?;
    let earliest_year = fiscal_year.saturating_sub(options.max_lookback_years);

    if days < options.min_duration_days {
        trace!(record = %obs.record.describe(), days, "Span shorter than a full year");
        return None;
    }
    if start.year() < earliest_year || obs.end.year() < earliest_year {
        trace!(record = %obs.record.describe(), "Stale comparative period");
        return None;
    }

    Some(DurationScore {
        year_distance: obs.end.year().abs_diff(fiscal_year),
        span: Reverse(days),
    })
}

/// Majority shape over all observations; the earliest record decides a tie.
fn concept_kind(groups: &BTreeMap<i32, Vec<Observation<'_>>>) -> Option<MetricKind> {
    let earliest = groups
        .values()
        .find_map(|group| group.first())
        .map(Observation::kind)?;

    let (durations, instants) = groups
        .values()
        .flatten()
        .fold((0usize, 0usize), |(d, i), obs| match obs.kind() {
            MetricKind::Duration => (d + 1, i),
            MetricKind::Instant => (d, i + 1),
        });

    Some(match durations.cmp(&instants) {
        Ordering::Greater => MetricKind::Duration,
        Ordering::Less => MetricKind::Instant,
        Ordering::Equal => earliest,
    })
}

/// Resolves annual candidates into one value per fiscal year.
///
/// Candidates are typically the output of [`select_annual_candidates`]. Records
/// with unparseable dates, or whose shape disagrees with the concept's kind, are
/// skipped and reported in [`Resolution::rejected`]; they never abort the pass.
/// Fiscal years left without an eligible record are omitted from the output.
pub fn resolve_annual<'a, I>(candidates: I, options: &ResolveOptions) -> Resolution
where
    I: IntoIterator<Item = &'a RawFactRecord>,
{
    let mut rejected = Vec::new();
    let mut groups: BTreeMap<i32, Vec<Observation<'a>>> = BTreeMap::new();

    for record in candidates {
        let Some(fiscal_year) = record.fiscal_year else {
            trace!(record = %record.describe(), "Skipping record without fiscal year");
            continue;
        };
        match Observation::parse(record) {
            Ok(obs) => groups.entry(fiscal_year).or_default().push(obs),
            Err(e) => {
                warn!(error = %e, "Skipping malformed fact record");
                rejected.push(e);
            }
        }
    }

    let Some(kind) = concept_kind(&groups) else {
        return Resolution {
            kind: None,
            values: Vec::new(),
            rejected,
        };
    };

    let mut values = Vec::with_capacity(groups.len());

    for (fiscal_year, group) in groups {
        let mut matching = Vec::with_capacity(group.len());
        for obs in group {
            let reason = if obs.kind() != kind {
                format!("mixed period shape: {} record in {kind} concept", obs.kind())
            } else if kind == MetricKind::Instant && obs.filed.is_none() {
                "missing filed date".to_string()
            } else {
                matching.push(obs);
                continue;
            };
            let err = malformed(obs.record, reason);
            warn!(error = %err, "Skipping fact record");
            rejected.push(err);
        }

        let selected = match kind {
            MetricKind::Instant => select_by_score(&matching, score_instant),
            MetricKind::Duration => select_by_score(&matching, |obs| {
                score_duration(obs, fiscal_year, options)
            }),
        };

        match selected {
            Some(obs) => {
                trace!(
                    fiscal_year,
                    record = %obs.record.describe(),
                    value = obs.record.value,
                    "Selected annual value"
                );
                values.push(ResolvedAnnualValue::new(fiscal_year, obs.record.value));
            }
            None => {
                debug!(
                    fiscal_year,
                    candidates = matching.len(),
                    "No eligible annual record, dropping fiscal year"
                );
            }
        }
    }

    Resolution {
        kind: Some(kind),
        values,
        rejected,
    }
}

/// Loads and resolves one concept in a single pass.
///
/// # Errors
///
/// Propagates [`FiscalError::ConceptNotFound`] and [`FiscalError::UnitNotFound`]
/// from [`select_annual_candidates`].
pub fn resolve_concept(
    facts: &CompanyFacts,
    concept: &str,
    options: &ResolveOptions,
) -> Result<Resolution> {
    let candidates = select_annual_candidates(facts, concept, options)?;
    let resolution = resolve_annual(candidates, options);
    debug!(
        concept,
        kind = ?resolution.kind,
        years = resolution.len(),
        rejected = resolution.rejected.len(),
        "Resolved concept"
    );
    Ok(resolution)
}
