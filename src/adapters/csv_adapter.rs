//! CSV file data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv` exports with a header row. Only the
//! `Date` and `Close` columns are used; any other columns (open, high,
//! adjusted close, volume) are ignored.

use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::error::LevsimError;
use crate::domain::period::Period;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self, ticker: &str, period: &Period) -> Result<PriceSeries, LevsimError> {
        let path = self.csv_path(ticker);
        let file = std::fs::File::open(&path).map_err(|e| LevsimError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        tracing::debug!(path = %path.display(), "reading price file");
        read_price_table(ticker, file, period)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, LevsimError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| LevsimError::Data {
            reason: format!("missing {} column", name),
        })
}

/// Parse a `Date,Close` price table, keeping rows inside `period`.
///
/// Rows with an empty or `null` close are skipped. An empty result is
/// reported as [`LevsimError::NoData`].
pub fn read_price_table<R: Read>(
    ticker: &str,
    reader: R,
    period: &Period,
) -> Result<PriceSeries, LevsimError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| LevsimError::Data {
            reason: format!("CSV header error: {}", e),
        })?
        .clone();
    let date_idx = column_index(&headers, "date")?;
    let close_idx = column_index(&headers, "close")?;

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let record = result.map_err(|e| LevsimError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = record.get(date_idx).ok_or_else(|| LevsimError::Data {
            reason: "missing date value".into(),
        })?;
        let date = NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT).map_err(|e| {
            LevsimError::Data {
                reason: format!("invalid date '{}': {}", date_str, e),
            }
        })?;

        if !period.contains(date) {
            continue;
        }

        let close_str = record.get(close_idx).unwrap_or("").trim();
        if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
            skipped += 1;
            continue;
        }
        let close: f64 = close_str.parse().map_err(|e| LevsimError::Data {
            reason: format!("invalid close value '{}' on {}: {}", close_str, date, e),
        })?;

        points.push(PricePoint { date, close });
    }

    if skipped > 0 {
        tracing::warn!(ticker, skipped, "skipped rows without a close price");
    }
    if points.is_empty() {
        return Err(LevsimError::NoData {
            ticker: ticker.to_string(),
            period: period.to_string(),
        });
    }

    points.sort_by_key(|p| p.date);
    PriceSeries::new(ticker, points)
}

/// Serialize a series as a `date,close` CSV table.
pub fn write_price_table(series: &PriceSeries) -> Result<String, LevsimError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let write_err = |e: csv::Error| LevsimError::Data {
        reason: format!("CSV write error: {}", e),
    };

    wtr.write_record(["date", "close"]).map_err(write_err)?;
    for p in series.points() {
        wtr.write_record([
            p.date.format(DATE_FORMAT).to_string(),
            p.close.to_string(),
        ])
        .map_err(write_err)?;
    }

    let bytes = wtr.into_inner().map_err(|e| LevsimError::Data {
        reason: format!("CSV flush error: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| LevsimError::Data {
        reason: format!("CSV output is not UTF-8: {}", e),
    })
}
