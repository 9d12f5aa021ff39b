//! Selection of annual candidate records for one concept.

use fiscal_core::{CompanyFacts, FiscalError, RawFactRecord, Result};
use tracing::{debug, trace};

use crate::options::ResolveOptions;

/// Selects the annual, full-year records of one concept.
///
/// Keeps records whose form equals `options.form` and whose fiscal period equals
/// `options.fiscal_period`. Records carrying no fiscal year cannot be grouped and
/// are skipped. The returned order follows the source payload.
///
/// # Errors
///
/// Returns [`FiscalError::ConceptNotFound`] when the taxonomy or concept is absent,
/// and [`FiscalError::UnitNotFound`] when the concept has no records in
/// `options.unit`. Both mean "no data for this concept".
pub fn select_annual_candidates<'a>(
    facts: &'a CompanyFacts,
    concept: &str,
    options: &ResolveOptions,
) -> Result<Vec<&'a RawFactRecord>> {
    let concept_facts =
        facts
            .concept(&options.taxonomy, concept)
            .ok_or_else(|| FiscalError::ConceptNotFound {
                taxonomy: options.taxonomy.clone(),
                concept: concept.to_string(),
            })?;

    let records = concept_facts
        .units
        .get(&options.unit)
        .ok_or_else(|| FiscalError::UnitNotFound {
            concept: concept.to_string(),
            unit: options.unit.clone(),
        })?;

    let candidates: Vec<&RawFactRecord> = records
        .iter()
        .filter(|record| is_annual_candidate(record, options))
        .collect();

    debug!(
        concept,
        total = records.len(),
        annual = candidates.len(),
        "Selected annual candidates"
    );

    Ok(candidates)
}

fn is_annual_candidate(record: &RawFactRecord, options: &ResolveOptions) -> bool {
    if record.form.as_deref() != Some(options.form.as_str()) {
        return false;
    }
    if record.fiscal_period.as_ref() != Some(&options.fiscal_period) {
        return false;
    }
    if record.fiscal_year.is_none() {
        trace!(record = %record.describe(), "Skipping record without fiscal year");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_core::{Cik, ConceptFacts, FiscalPeriod};

    fn company(records: Vec<RawFactRecord>) -> CompanyFacts {
        CompanyFacts::new(Cik::new(2488), "Test Co").with_concept(
            "us-gaap",
            "NetIncomeLoss",
            ConceptFacts::with_unit("USD", records),
        )
    }

    #[test]
    fn test_filters_to_annual_full_year() {
        let facts = company(vec![
            RawFactRecord::new(2021, "2021-12-25", 1.0)
                .with_start("2020-12-27")
                .annual_10k(),
            RawFactRecord::new(2021, "2021-03-27", 2.0)
                .with_start("2020-12-27")
                .with_form("10-Q")
                .with_fiscal_period(FiscalPeriod::Q1),
            RawFactRecord::new(2021, "2021-12-25", 3.0)
                .with_start("2021-09-26")
                .with_form("10-K")
                .with_fiscal_period(FiscalPeriod::Q4),
            RawFactRecord::new(2021, "2021-12-25", 4.0)
                .with_start("2020-12-27")
                .with_form("8-K")
                .with_fiscal_period(FiscalPeriod::FullYear),
        ]);

        let candidates =
            select_annual_candidates(&facts, "NetIncomeLoss", &ResolveOptions::default())
                .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value, 1.0);
    }

    #[test]
    fn test_skips_records_without_fiscal_year() {
        let mut record = RawFactRecord::new(2021, "2021-12-25", 1.0).annual_10k();
        record.fiscal_year = None;
        let facts = company(vec![record]);

        let candidates =
            select_annual_candidates(&facts, "NetIncomeLoss", &ResolveOptions::default())
                .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_concept_not_found() {
        let facts = company(vec![]);
        let err = select_annual_candidates(&facts, "Revenues", &ResolveOptions::default())
            .unwrap_err();
        assert!(matches!(err, FiscalError::ConceptNotFound { ref concept, .. } if concept == "Revenues"));
        assert!(err.is_missing_data());

        let err = select_annual_candidates(
            &facts,
            "NetIncomeLoss",
            &ResolveOptions::default().with_taxonomy("ifrs-full"),
        )
        .unwrap_err();
        assert!(matches!(err, FiscalError::ConceptNotFound { .. }));
    }

    #[test]
    fn test_unit_not_found() {
        let facts = CompanyFacts::new(Cik::new(2488), "Test Co").with_concept(
            "us-gaap",
            "EarningsPerShareBasic",
            ConceptFacts::with_unit("USD/shares", vec![]),
        );
        let err = select_annual_candidates(
            &facts,
            "EarningsPerShareBasic",
            &ResolveOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            FiscalError::UnitNotFound {
                concept: "EarningsPerShareBasic".to_string(),
                unit: "USD".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_unit_is_not_an_error() {
        let facts = company(vec![]);
        let candidates =
            select_annual_candidates(&facts, "NetIncomeLoss", &ResolveOptions::default())
                .unwrap();
        assert!(candidates.is_empty());
    }
}
