//! Compounding period units.
//!
//! This module defines [`PeriodUnit`], the closed set of periods a rate or a
//! term can be expressed in, together with its fixed month counts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A compounding period, mapped to a fixed number of months.
///
/// # Example
///
/// ```
/// use tvm_engine::models::PeriodUnit;
///
/// assert_eq!(PeriodUnit::Quarterly.months(), 3);
/// assert_eq!("annual".parse::<PeriodUnit>().unwrap(), PeriodUnit::Annual);
/// assert!("weekly".parse::<PeriodUnit>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodUnit {
    /// One month.
    Monthly,
    /// Two months.
    Bimonthly,
    /// Three months.
    Quarterly,
    /// Six months.
    Semiannual,
    /// Twelve months.
    Annual,
}

impl PeriodUnit {
    /// Every supported unit, shortest first.
    pub const ALL: [PeriodUnit; 5] = [
        PeriodUnit::Monthly,
        PeriodUnit::Bimonthly,
        PeriodUnit::Quarterly,
        PeriodUnit::Semiannual,
        PeriodUnit::Annual,
    ];

    /// Returns the number of months in one period.
    pub const fn months(self) -> u32 {
        match self {
            PeriodUnit::Monthly => 1,
            PeriodUnit::Bimonthly => 2,
            PeriodUnit::Quarterly => 3,
            PeriodUnit::Semiannual => 6,
            PeriodUnit::Annual => 12,
        }
    }

    /// Returns the tag used in requests and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            PeriodUnit::Monthly => "monthly",
            PeriodUnit::Bimonthly => "bimonthly",
            PeriodUnit::Quarterly => "quarterly",
            PeriodUnit::Semiannual => "semiannual",
            PeriodUnit::Annual => "annual",
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodUnit {
    type Err = EngineError;

    /// Parses a period tag, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        PeriodUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == tag)
            .ok_or_else(|| EngineError::InvalidPeriodUnit {
                unit: s.to_string(),
            })
    }
}
