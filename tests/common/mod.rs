#![allow(dead_code)]

use chrono::NaiveDate;
use levsim::domain::error::LevsimError;
use levsim::domain::period::Period;
use levsim::domain::price_series::{PricePoint, PriceSeries};
use levsim::ports::data_port::DataPort;
use std::cell::Cell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_closes(mut self, ticker: &str, start: &str, closes: &[f64]) -> Self {
        self.data
            .insert(ticker.to_string(), make_points(start, closes));
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self, ticker: &str, period: &Period) -> Result<PriceSeries, LevsimError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = self.errors.get(ticker) {
            return Err(LevsimError::Data {
                reason: reason.clone(),
            });
        }
        let points: Vec<PricePoint> = self
            .data
            .get(ticker)
            .map(|p| p.iter().copied().filter(|p| period.contains(p.date)).collect())
            .unwrap_or_default();
        if points.is_empty() {
            return Err(LevsimError::NoData {
                ticker: ticker.to_string(),
                period: period.to_string(),
            });
        }
        PriceSeries::new(ticker, points)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_points(start: &str, closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

pub fn make_series(ticker: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(ticker, make_points("2020-01-01", closes)).unwrap()
}

/// Deterministic zig-zag path: alternating up and down days with drift.
pub fn zigzag_closes(count: usize, start_price: f64) -> Vec<f64> {
    let mut price = start_price;
    (0..count)
        .map(|i| {
            if i > 0 {
                let step = if i % 2 == 0 { 0.012 } else { -0.009 };
                price *= 1.0 + step;
            }
            price
        })
        .collect()
}

/// Write a Yahoo-style CSV export for `ticker` into `dir`.
pub fn write_price_csv(dir: &std::path::Path, ticker: &str, start: &str, closes: &[f64]) {
    let mut content = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for p in make_points(start, closes) {
        content.push_str(&format!(
            "{},{c},{c},{c},{c},{c},1000\n",
            p.date,
            c = p.close
        ));
    }
    std::fs::write(dir.join(format!("{ticker}.csv")), content).unwrap();
}
