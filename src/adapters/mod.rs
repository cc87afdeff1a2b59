//! Concrete adapter implementations for ports.

pub mod cache_adapter;
pub mod chart_svg;
pub mod console_table;
pub mod csv_adapter;
pub mod file_config_adapter;
