//! Core domain types and logic.

pub mod comparison;
pub mod config_validation;
pub mod error;
pub mod leverage;
pub mod metrics;
pub mod numeric;
pub mod period;
pub mod price_series;
