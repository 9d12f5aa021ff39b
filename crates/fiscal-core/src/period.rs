//! Fiscal period and metric shape definitions.
//!
//! This module defines [`FiscalPeriod`] for the `fp` code attached to each XBRL fact
//! and [`MetricKind`] for the duration/instant split of financial concepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fiscal period code reported alongside a fact (`fp` in the EDGAR payload).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FiscalPeriod {
    /// Full fiscal year ("FY").
    #[default]
    FullYear,
    /// First fiscal quarter ("Q1").
    Q1,
    /// Second fiscal quarter ("Q2").
    Q2,
    /// Third fiscal quarter ("Q3").
    Q3,
    /// Fourth fiscal quarter ("Q4").
    Q4,
    /// Any other code, kept verbatim (e.g. "H1", "CY").
    Other(String),
}

impl FiscalPeriod {
    /// Returns the code as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::FullYear => "FY",
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
            Self::Other(code) => code,
        }
    }

    /// Returns true for the full-year code.
    #[must_use]
    pub const fn is_full_year(&self) -> bool {
        matches!(self, Self::FullYear)
    }

    /// Returns the quarter number (1-4) for quarterly codes.
    #[must_use]
    pub const fn quarter(&self) -> Option<u8> {
        match self {
            Self::Q1 => Some(1),
            Self::Q2 => Some(2),
            Self::Q3 => Some(3),
            Self::Q4 => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FiscalPeriod {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "FY" => Self::FullYear,
            "Q1" => Self::Q1,
            "Q2" => Self::Q2,
            "Q3" => Self::Q3,
            "Q4" => Self::Q4,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for FiscalPeriod {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<FiscalPeriod> for String {
    fn from(period: FiscalPeriod) -> Self {
        period.as_str().to_string()
    }
}

impl FromStr for FiscalPeriod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Shape of a financial concept.
///
/// Income and cash-flow items are measured over an interval and carry a start date;
/// balance-sheet items are a snapshot at period end and carry none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Measured over a reporting interval (start and end dates).
    Duration,
    /// Measured at a single point in time (end date only).
    Instant,
}

impl MetricKind {
    /// Infers the kind from whether a record carries a period start.
    #[must_use]
    pub const fn from_has_start(has_start: bool) -> Self {
        if has_start { Self::Duration } else { Self::Instant }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration => f.write_str("duration"),
            Self::Instant => f.write_str("instant"),
        }
    }
}
