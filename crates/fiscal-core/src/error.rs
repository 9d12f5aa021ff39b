//! Error types for fact loading, resolution and fetching.
//!
//! This module defines [`FiscalError`] which covers all error cases that can occur
//! when fetching, caching, loading or resolving XBRL financial facts.

use thiserror::Error;

/// Errors that can occur while working with company facts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FiscalError {
    /// Network-related errors (connection failures, timeouts, non-success status).
    #[error("Network error: {0}")]
    Network(String),

    /// The requested company (ticker or CIK) was not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    /// The requested concept is absent from the fact collection.
    #[error("Concept not found: {taxonomy}:{concept}")]
    ConceptNotFound {
        /// Taxonomy namespace that was searched (e.g. "us-gaap").
        taxonomy: String,
        /// Concept identifier that was requested.
        concept: String,
    },

    /// The concept exists but carries no records in the expected unit.
    #[error("Unit {unit} not found for concept {concept}")]
    UnitNotFound {
        /// Concept identifier that was requested.
        concept: String,
        /// Unit identifier that was expected (e.g. "USD").
        unit: String,
    },

    /// A single fact record has date fields that cannot be interpreted.
    #[error("Malformed period in record {record}: {reason}")]
    MalformedPeriod {
        /// Human-readable identification of the offending record.
        record: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Error decoding data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// No provider is configured for the requested operation.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl FiscalError {
    /// Returns true when the error only means "no data for this concept".
    ///
    /// Callers resolving several concepts skip these and carry on.
    #[must_use]
    pub const fn is_missing_data(&self) -> bool {
        matches!(self, Self::ConceptNotFound { .. } | Self::UnitNotFound { .. })
    }
}

/// Result type alias using [`FiscalError`].
pub type Result<T> = std::result::Result<T, FiscalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_classification() {
        let concept = FiscalError::ConceptNotFound {
            taxonomy: "us-gaap".to_string(),
            concept: "Revenues".to_string(),
        };
        let unit = FiscalError::UnitNotFound {
            concept: "Revenues".to_string(),
            unit: "USD".to_string(),
        };
        assert!(concept.is_missing_data());
        assert!(unit.is_missing_data());
        assert!(!FiscalError::Network("timeout".to_string()).is_missing_data());
        assert!(
            !FiscalError::MalformedPeriod {
                record: "fy=2020".to_string(),
                reason: "bad end".to_string(),
            }
            .is_missing_data()
        );
    }

    #[test]
    fn test_error_messages() {
        let err = FiscalError::ConceptNotFound {
            taxonomy: "us-gaap".to_string(),
            concept: "Assets".to_string(),
        };
        assert_eq!(err.to_string(), "Concept not found: us-gaap:Assets");

        let err = FiscalError::UnitNotFound {
            concept: "Assets".to_string(),
            unit: "USD".to_string(),
        };
        assert_eq!(err.to_string(), "Unit USD not found for concept Assets");
    }
}
