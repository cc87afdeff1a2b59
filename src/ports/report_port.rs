//! Report generation port trait.

use crate::domain::comparison::ChartSeries;
use crate::domain::error::LevsimError;
use crate::domain::metrics::MetricsTable;

/// Port for writing comparison reports.
pub trait ReportPort {
    fn write(
        &self,
        table: &MetricsTable,
        series: &[ChartSeries],
        output_path: &str,
    ) -> Result<(), LevsimError>;
}
