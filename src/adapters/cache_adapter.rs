//! On-disk price cache and the caching data-port decorator.
//!
//! Keys are the hex SHA-256 of the canonical query text; each entry is one
//! `<key>.csv` file holding the serialized price table. Nothing expires: an
//! entry is reused until the cache directory is cleared.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::adapters::csv_adapter::{read_price_table, write_price_table};
use crate::domain::error::LevsimError;
use crate::domain::period::Period;
use crate::domain::price_series::PriceSeries;
use crate::ports::cache_port::PriceCache;
use crate::ports::data_port::DataPort;

const ENTRY_EXTENSION: &str = "csv";

/// Cache key for a price query. Tickers are case-insensitive.
pub fn cache_key(ticker: &str, period: &Period) -> String {
    let canonical = format!("ticker={};period={}", ticker.trim().to_uppercase(), period);
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, ENTRY_EXTENSION))
    }
}

impl PriceCache for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>, LevsimError> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LevsimError::Cache {
                reason: format!("failed to read {}: {}", path.display(), e),
            }),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), LevsimError> {
        fs::create_dir_all(&self.dir).map_err(|e| LevsimError::Cache {
            reason: format!("failed to create {}: {}", self.dir.display(), e),
        })?;
        let path = self.entry_path(key);
        fs::write(&path, value).map_err(|e| LevsimError::Cache {
            reason: format!("failed to write {}: {}", path.display(), e),
        })
    }

    fn clear(&self) -> Result<usize, LevsimError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(LevsimError::Cache {
                    reason: format!("failed to read {}: {}", self.dir.display(), e),
                });
            }
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| LevsimError::Cache {
                    reason: format!("directory entry error: {}", e),
                })?
                .path();
            if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                fs::remove_file(&path).map_err(|e| LevsimError::Cache {
                    reason: format!("failed to remove {}: {}", path.display(), e),
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Wraps a [`DataPort`], answering repeated queries from a [`PriceCache`].
pub struct CachedDataPort<D, C> {
    inner: D,
    cache: C,
}

impl<D: DataPort, C: PriceCache> CachedDataPort<D, C> {
    pub fn new(inner: D, cache: C) -> Self {
        Self { inner, cache }
    }
}

impl<D: DataPort, C: PriceCache> DataPort for CachedDataPort<D, C> {
    fn fetch_prices(&self, ticker: &str, period: &Period) -> Result<PriceSeries, LevsimError> {
        let key = cache_key(ticker, period);

        if let Some(payload) = self.cache.get(&key)? {
            tracing::info!(ticker, %period, "price cache hit");
            // Entries are stored already filtered to the query period.
            return read_price_table(ticker, payload.as_bytes(), &Period::Max);
        }

        tracing::info!(ticker, %period, "price cache miss");
        let series = self.inner.fetch_prices(ticker, period)?;
        let payload = write_price_table(&series)?;
        if let Err(e) = self.cache.put(&key, &payload) {
            tracing::warn!(error = %e, "could not store prices in cache");
        }
        Ok(series)
    }
}
