//! Console rendering of the metrics table.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};

use crate::domain::metrics::{MetricsTable, Statistic};

pub const NOT_AVAILABLE: &str = "N/A";

fn format_cell(statistic: Statistic, value: Option<f64>) -> String {
    match (statistic, value) {
        (_, None) => NOT_AVAILABLE.to_string(),
        (Statistic::EndValue, Some(v)) => format!("{:.2}", v),
        (_, Some(v)) => format!("{:.3}", v),
    }
}

pub fn render_metrics_table(metrics: &MetricsTable) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec![Cell::new("Statistic")];
    header.extend(metrics.headers().into_iter().map(Cell::new));
    table.set_header(header);

    for (statistic, values) in metrics.rows() {
        let mut row = vec![Cell::new(statistic.label())];
        row.extend(values.into_iter().map(|v| {
            Cell::new(format_cell(statistic, v)).set_alignment(CellAlignment::Right)
        }));
        table.add_row(row);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::SeriesMetrics;

    #[test]
    fn cells_format_by_statistic() {
        assert_eq!(format_cell(Statistic::EndValue, Some(96.0)), "96.00");
        assert_eq!(format_cell(Statistic::Cagr, Some(7.1234)), "7.123");
        assert_eq!(format_cell(Statistic::Volatility, None), "N/A");
    }

    #[test]
    fn renders_every_statistic_and_column() {
        let metrics = MetricsTable {
            columns: vec![
                SeriesMetrics::compute("Close", &[100.0, 110.0, 99.0]).unwrap(),
                SeriesMetrics::compute("2x", &[100.0, 120.0, 96.0]).unwrap(),
            ],
        };
        let out = render_metrics_table(&metrics);

        for stat in Statistic::ALL {
            assert!(out.contains(stat.label()), "missing row {}", stat.label());
        }
        assert!(out.contains("Close"));
        assert!(out.contains("2x"));
        assert!(out.contains("96.00"));
        assert!(out.contains("20.000"));
        // under a year of data
        assert!(out.contains("N/A"));
    }
}
