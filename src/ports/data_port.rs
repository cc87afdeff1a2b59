//! Price data access port trait.

use crate::domain::error::LevsimError;
use crate::domain::period::Period;
use crate::domain::price_series::PriceSeries;

/// Source of closing-price series, e.g. a directory of CSV exports.
pub trait DataPort {
    fn fetch_prices(&self, ticker: &str, period: &Period) -> Result<PriceSeries, LevsimError>;
}
