//! Closing-price series representation.

use chrono::NaiveDate;

use super::error::LevsimError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronologically sorted closes for one ticker. Every close is positive and
/// finite; dates strictly increase.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, LevsimError> {
        let ticker = ticker.into();
        if points.is_empty() {
            return Err(LevsimError::invalid(format!(
                "empty price series for {ticker}"
            )));
        }
        for (i, point) in points.iter().enumerate() {
            if !(point.close > 0.0 && point.close.is_finite()) {
                return Err(LevsimError::invalid(format!(
                    "non-positive close {} for {} on {}",
                    point.close, ticker, point.date
                )));
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(LevsimError::invalid(format!(
                    "price series for {} is not strictly ascending at {}",
                    ticker, point.date
                )));
            }
        }
        Ok(Self { ticker, points })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}
