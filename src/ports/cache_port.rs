//! Key-value cache port for serialized price tables.

use crate::domain::error::LevsimError;

/// Content-addressed store. Entries never expire; they stay until
/// [`PriceCache::clear`] removes them.
pub trait PriceCache {
    fn get(&self, key: &str) -> Result<Option<String>, LevsimError>;
    fn put(&self, key: &str, value: &str) -> Result<(), LevsimError>;
    /// Remove every entry, returning how many were removed.
    fn clear(&self) -> Result<usize, LevsimError>;
}
