//! Runs the unleveraged baseline and each leverage level through the
//! metrics engine and collects the results for reporting.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::error::LevsimError;
use super::leverage::{simulate_series, ExpenseMode, LeverageSpec, LeveragedSeries};
use super::metrics::{MetricsTable, SeriesMetrics};
use super::price_series::PriceSeries;

pub const BASELINE_LABEL: &str = "Close";

pub const DEFAULT_LEVERAGES: [f64; 4] = [1.25, 1.5, 2.0, 3.0];

#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub leverages: Vec<f64>,
    pub annual_expense_ratio: f64,
    pub expense_mode: ExpenseMode,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            leverages: DEFAULT_LEVERAGES.to_vec(),
            annual_expense_ratio: 0.0,
            expense_mode: ExpenseMode::Always,
        }
    }
}

impl ComparisonConfig {
    pub fn specs(&self) -> Result<Vec<LeverageSpec>, LevsimError> {
        self.leverages
            .iter()
            .map(|&l| LeverageSpec::from_annual_fee(l, self.annual_expense_ratio, self.expense_mode))
            .collect()
    }
}

/// A labelled (date, value) line for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub baseline: PriceSeries,
    pub leveraged: Vec<LeveragedSeries>,
    pub table: MetricsTable,
}

impl Comparison {
    /// Baseline first, then each leverage level in configured order.
    pub fn chart_series(&self) -> Vec<ChartSeries> {
        let mut out = Vec::with_capacity(self.leveraged.len() + 1);
        out.push(ChartSeries {
            label: BASELINE_LABEL.to_string(),
            dates: self.baseline.dates(),
            values: self.baseline.closes(),
        });
        out.extend(self.leveraged.iter().map(|s| ChartSeries {
            label: s.label(),
            dates: s.dates.clone(),
            values: s.values.clone(),
        }));
        out
    }
}

/// Simulate every leverage level over `series` and build the metrics table.
pub fn run_comparison(
    series: &PriceSeries,
    specs: &[LeverageSpec],
) -> Result<Comparison, LevsimError> {
    let mut columns = Vec::with_capacity(specs.len() + 1);
    columns.push(SeriesMetrics::compute(BASELINE_LABEL, &series.closes())?);

    let mut leveraged = Vec::with_capacity(specs.len());
    for spec in specs {
        let simulated = simulate_series(series, spec)?;
        tracing::debug!(
            leverage = spec.leverage,
            end_value = simulated.end_value(),
            "simulated leverage level"
        );
        columns.push(SeriesMetrics::compute(simulated.label(), &simulated.values)?);
        leveraged.push(simulated);
    }

    Ok(Comparison {
        baseline: series.clone(),
        leveraged,
        table: MetricsTable { columns },
    })
}

/// Parse a comma-separated leverage list such as `1.25, 1.5, 2, 3`.
pub fn parse_leverages(input: &str) -> Result<Vec<f64>, LevsimError> {
    let mut leverages = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim().trim_end_matches(['x', 'X']);
        if trimmed.is_empty() {
            return Err(LevsimError::invalid("empty token in leverage list"));
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| LevsimError::invalid(format!("invalid leverage '{}'", token.trim())))?;
        if !(value > 0.0 && value.is_finite()) {
            return Err(LevsimError::invalid(format!(
                "leverage must be positive, got {value}"
            )));
        }
        if !seen.insert(value.to_bits()) {
            return Err(LevsimError::invalid(format!("duplicate leverage {value}")));
        }
        leverages.push(value);
    }

    Ok(leverages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_series::PricePoint;
    use approx::assert_relative_eq;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect();
        PriceSeries::new("SPX", points).unwrap()
    }

    #[test]
    fn comparison_has_baseline_and_each_level() {
        let config = ComparisonConfig {
            leverages: vec![2.0, 3.0],
            ..Default::default()
        };
        let specs = config.specs().unwrap();
        let cmp = run_comparison(&series(&[100.0, 110.0, 99.0]), &specs).unwrap();

        assert_eq!(cmp.table.headers(), vec!["Close", "2x", "3x"]);
        assert_eq!(cmp.leveraged.len(), 2);
        assert_relative_eq!(cmp.leveraged[0].end_value(), 96.0, epsilon = 1e-9);
        // 3x: 100 -> 130 -> 91
        assert_relative_eq!(cmp.leveraged[1].end_value(), 91.0, epsilon = 1e-9);
    }

    #[test]
    fn chart_series_starts_with_baseline() {
        let specs = vec![LeverageSpec::new(2.0, 0.0, ExpenseMode::Always).unwrap()];
        let cmp = run_comparison(&series(&[100.0, 50.0, 60.0]), &specs).unwrap();
        let lines = cmp.chart_series();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label, "Close");
        assert_eq!(lines[0].values, vec![100.0, 50.0, 60.0]);
        assert_eq!(lines[1].label, "2x");
        assert_eq!(lines[1].values, vec![100.0, 0.0, 0.0]);
        assert_eq!(lines[0].dates, lines[1].dates);
    }

    #[test]
    fn wiped_out_level_reports_na_volatility() {
        let specs = vec![LeverageSpec::new(3.0, 0.0, ExpenseMode::Always).unwrap()];
        let cmp = run_comparison(&series(&[100.0, 50.0, 60.0, 70.0]), &specs).unwrap();
        let col = cmp.table.column("3x").unwrap();

        assert_eq!(col.end_value, 0.0);
        assert_eq!(col.max_drawdown_pct, 100.0);
        assert_eq!(col.appreciation_pct, -100.0);
        assert_eq!(col.volatility_pct, None);
    }

    #[test]
    fn default_config_uses_classic_levels() {
        let config = ComparisonConfig::default();
        assert_eq!(config.leverages, vec![1.25, 1.5, 2.0, 3.0]);
        assert_eq!(config.specs().unwrap().len(), 4);
    }

    #[test]
    fn specs_reject_non_positive_leverage() {
        let config = ComparisonConfig {
            leverages: vec![2.0, 0.0],
            ..Default::default()
        };
        assert!(config.specs().is_err());
    }

    #[test]
    fn parse_leverages_accepts_suffix_and_spaces() {
        assert_eq!(
            parse_leverages("1.25, 1.5x,2 ,3X").unwrap(),
            vec![1.25, 1.5, 2.0, 3.0]
        );
    }

    #[test]
    fn parse_leverages_rejects_bad_tokens() {
        assert!(parse_leverages("2,,3").is_err());
        assert!(parse_leverages("two").is_err());
        assert!(parse_leverages("2,-1").is_err());
        assert!(parse_leverages("2,2").is_err());
    }
}
