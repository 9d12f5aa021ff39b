//! Year-over-year growth and cross-concept ratios.
//!
//! Growth is computed between consecutive entries of a resolved series. Entries are
//! assumed to be contiguous fiscal years; a gap in the series (e.g. 2018 followed by
//! 2021) still yields a single growth figure spanning the whole gap.

use fiscal_core::{DerivedRatio, GrowthPoint, ResolvedAnnualValue};
use std::collections::BTreeMap;

/// Percentage change from `previous` to `current`, relative to `|previous|`.
///
/// Returns `None` when `previous` is zero.
#[must_use]
pub fn growth_pct(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous.abs() * 100.0)
}

/// Computes year-over-year growth for a resolved series.
///
/// The first entry has no growth. Every later entry is compared to the entry
/// immediately before it, regardless of how many fiscal years lie between them.
#[must_use]
pub fn compute_yoy(series: &[ResolvedAnnualValue]) -> Vec<GrowthPoint> {
    let mut previous: Option<f64> = None;

    series
        .iter()
        .map(|entry| {
            let growth = previous.and_then(|prev| growth_pct(prev, entry.value));
            previous = Some(entry.value);
            GrowthPoint {
                fiscal_year: entry.fiscal_year,
                value: entry.value,
                growth_pct: growth,
            }
        })
        .collect()
}

/// Divides one series by another for every fiscal year present in both.
///
/// Years present in only one series are excluded. A zero denominator yields an
/// entry whose value is `None`. Output is ascending by fiscal year.
#[must_use]
pub fn derived_ratio(
    numerator: &[ResolvedAnnualValue],
    denominator: &[ResolvedAnnualValue],
) -> Vec<DerivedRatio> {
    let denominators: BTreeMap<i32, f64> = denominator
        .iter()
        .map(|v| (v.fiscal_year, v.value))
        .collect();

    let joined: BTreeMap<i32, Option<f64>> = numerator
        .iter()
        .filter_map(|num| {
            denominators.get(&num.fiscal_year).map(|&den| {
                let ratio = if den == 0.0 { None } else { Some(num.value / den) };
                (num.fiscal_year, ratio)
            })
        })
        .collect();

    joined
        .into_iter()
        .map(|(fiscal_year, value)| DerivedRatio { fiscal_year, value })
        .collect()
}

/// Net profit margin: net income divided by revenue.
#[must_use]
pub fn net_margin(
    net_income: &[ResolvedAnnualValue],
    revenue: &[ResolvedAnnualValue],
) -> Vec<DerivedRatio> {
    derived_ratio(net_income, revenue)
}

/// Return on assets: net income divided by total assets.
#[must_use]
pub fn return_on_assets(
    net_income: &[ResolvedAnnualValue],
    assets: &[ResolvedAnnualValue],
) -> Vec<DerivedRatio> {
    derived_ratio(net_income, assets)
}
