//! Query period for price acquisition.

use std::fmt;

use chrono::NaiveDate;

use super::error::LevsimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Everything the provider has.
    Max,
    /// Inclusive date range.
    Range { start: NaiveDate, end: NaiveDate },
}

impl Period {
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, LevsimError> {
        if start > end {
            return Err(LevsimError::invalid(format!(
                "period start {start} is after end {end}"
            )));
        }
        Ok(Period::Range { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Period::Max => true,
            Period::Range { start, end } => *start <= date && date <= *end,
        }
    }
}

/// Canonical text form; also the period part of a cache key.
impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Max => write!(f, "max"),
            Period::Range { start, end } => write!(f, "{start}..{end}"),
        }
    }
}
