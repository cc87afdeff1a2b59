//! Performance metrics over value series.
//!
//! Every function takes a plain slice of values, so the same code measures
//! the unleveraged closes and any simulated series. Percentages are rounded
//! to 3 decimal places.

use super::error::LevsimError;
use super::numeric::{daily_returns, guarded_ratio, round3, sample_stddev};

/// Annualization multiplier for daily volatility. A fixed approximation of
/// sqrt(252), not derived from the series' own sampling frequency.
pub const VOLATILITY_ANNUALIZATION_FACTOR: f64 = 16.0;

/// Points per "year" when sizing the CAGR exponent.
pub const POINTS_PER_CAGR_YEAR: usize = 365;

/// Volatility needs at least two daily returns.
pub const MIN_VOLATILITY_POINTS: usize = 3;

/// Largest peak-to-trough decline, as a percentage in `[0, 100]`.
///
/// Declines smaller than half the rounding step (0.0005%) report as `0.0`.
pub fn max_drawdown(values: &[f64]) -> Result<f64, LevsimError> {
    if values.len() <= 1 {
        return Ok(0.0);
    }
    if let Some(bad) = values.iter().find(|v| !(**v >= 0.0 && v.is_finite())) {
        return Err(LevsimError::invalid(format!(
            "drawdown over negative or non-finite value {bad}"
        )));
    }

    let mut peak = values[0];
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        }
        let dd = guarded_ratio(peak - value, peak).ok_or_else(|| {
            LevsimError::invalid("drawdown running peak is zero")
        })?;
        if dd > max_dd {
            max_dd = dd;
        }
    }

    Ok(round3(max_dd * 100.0))
}

/// Sample standard deviation of daily returns, annualized with
/// [`VOLATILITY_ANNUALIZATION_FACTOR`], as a percentage.
pub fn annualized_volatility(values: &[f64]) -> Result<f64, LevsimError> {
    if values.len() < MIN_VOLATILITY_POINTS {
        return Err(LevsimError::InsufficientData {
            metric: "annualized volatility",
            have: values.len(),
            need: MIN_VOLATILITY_POINTS,
        });
    }

    // A zero base (total loss) leaves later returns undefined.
    let returns = daily_returns(values).ok_or_else(|| LevsimError::InsufficientData {
        metric: "annualized volatility",
        have: values.iter().take_while(|v| **v > 0.0).count(),
        need: values.len(),
    })?;

    let stddev = sample_stddev(&returns).ok_or(LevsimError::InsufficientData {
        metric: "annualized volatility",
        have: values.len(),
        need: MIN_VOLATILITY_POINTS,
    })?;

    Ok(round3(stddev * VOLATILITY_ANNUALIZATION_FACTOR * 100.0))
}

/// Compound annual growth rate as a percentage.
///
/// The span in years is `floor(n / 365)`; less than one full span is
/// reported as insufficient data.
pub fn cagr(values: &[f64]) -> Result<f64, LevsimError> {
    let years = values.len() / POINTS_PER_CAGR_YEAR;
    if years == 0 {
        return Err(LevsimError::InsufficientData {
            metric: "cagr",
            have: values.len(),
            need: POINTS_PER_CAGR_YEAR,
        });
    }

    let growth = total_growth(values, "cagr")?;
    Ok(round3((growth.powf(1.0 / years as f64) - 1.0) * 100.0))
}

/// Total appreciation from first to last value, as a percentage.
pub fn appreciation(values: &[f64]) -> Result<f64, LevsimError> {
    let growth = total_growth(values, "appreciation")?;
    Ok(round3((growth - 1.0) * 100.0))
}

fn total_growth(values: &[f64], metric: &str) -> Result<f64, LevsimError> {
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return Err(LevsimError::invalid(format!("{metric} of an empty series")));
    };
    guarded_ratio(last, first).ok_or_else(|| {
        LevsimError::invalid(format!("{metric} from non-positive start value {first}"))
    })
}

/// Turn an undefined-metric error into `None`; anything else propagates.
fn defined(result: Result<f64, LevsimError>) -> Result<Option<f64>, LevsimError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_insufficient_data() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Metrics for one series. `None` marks a metric the series is too short
/// (or too wiped out) to define.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMetrics {
    pub label: String,
    pub end_value: f64,
    pub appreciation_pct: f64,
    pub volatility_pct: Option<f64>,
    pub max_drawdown_pct: f64,
    pub cagr_pct: Option<f64>,
}

impl SeriesMetrics {
    pub fn compute(label: impl Into<String>, values: &[f64]) -> Result<Self, LevsimError> {
        let appreciation_pct = appreciation(values)?;
        let end_value = values.last().copied().unwrap_or(0.0);
        Ok(SeriesMetrics {
            label: label.into(),
            end_value,
            appreciation_pct,
            volatility_pct: defined(annualized_volatility(values))?,
            max_drawdown_pct: max_drawdown(values)?,
            cagr_pct: defined(cagr(values))?,
        })
    }

    pub fn get(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::EndValue => Some(self.end_value),
            Statistic::Appreciation => Some(self.appreciation_pct),
            Statistic::Volatility => self.volatility_pct,
            Statistic::MaxDrawdown => Some(self.max_drawdown_pct),
            Statistic::Cagr => self.cagr_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    EndValue,
    Appreciation,
    Volatility,
    MaxDrawdown,
    Cagr,
}

impl Statistic {
    pub const ALL: [Statistic; 5] = [
        Statistic::EndValue,
        Statistic::Appreciation,
        Statistic::Volatility,
        Statistic::MaxDrawdown,
        Statistic::Cagr,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Statistic::EndValue => "End Value",
            Statistic::Appreciation => "Appreciation %",
            Statistic::Volatility => "Annualized Volatility %",
            Statistic::MaxDrawdown => "Max Drawdown %",
            Statistic::Cagr => "CAGR %",
        }
    }
}

/// One row per statistic, one column per series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsTable {
    pub columns: Vec<SeriesMetrics>,
}

impl MetricsTable {
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn rows(&self) -> Vec<(Statistic, Vec<Option<f64>>)> {
        Statistic::ALL
            .iter()
            .map(|&stat| (stat, self.columns.iter().map(|c| c.get(stat)).collect()))
            .collect()
    }

    pub fn column(&self, label: &str) -> Option<&SeriesMetrics> {
        self.columns.iter().find(|c| c.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn drawdown_peak_to_trough() {
        let values = [100.0, 110.0, 90.0, 95.0, 80.0, 100.0];
        // (110 - 80) / 110 = 27.2727...%
        assert_eq!(max_drawdown(&values).unwrap(), 27.273);
    }

    #[test]
    fn drawdown_short_series_is_zero() {
        assert_eq!(max_drawdown(&[]).unwrap(), 0.0);
        assert_eq!(max_drawdown(&[123.0]).unwrap(), 0.0);
    }

    #[test]
    fn drawdown_total_loss_is_hundred() {
        assert_eq!(max_drawdown(&[100.0, 120.0, 0.0, 0.0]).unwrap(), 100.0);
    }

    #[test]
    fn drawdown_non_decreasing_is_zero() {
        assert_eq!(max_drawdown(&[1.0, 1.0, 2.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn drawdown_below_rounding_step_reads_zero() {
        // 0.0001% drop rounds away at 3 decimals; 0.001% survives.
        assert_eq!(max_drawdown(&[100.0, 99.9999]).unwrap(), 0.0);
        assert_eq!(max_drawdown(&[100.0, 99.999]).unwrap(), 0.001);
    }

    #[test]
    fn drawdown_rejects_zero_peak() {
        let err = max_drawdown(&[0.0, 0.0, 1.0]).unwrap_err();
        assert!(matches!(err, LevsimError::InvalidInput { .. }));
        let err = max_drawdown(&[10.0, -1.0]).unwrap_err();
        assert!(matches!(err, LevsimError::InvalidInput { .. }));
    }

    #[test]
    fn volatility_known_value() {
        // returns +10%, -10%: mean 0, sample stddev sqrt(0.02)
        let vol = annualized_volatility(&[100.0, 110.0, 99.0]).unwrap();
        let expected = round3(0.02_f64.sqrt() * 16.0 * 100.0);
        assert_eq!(vol, expected);
        assert_relative_eq!(vol, 226.274, epsilon = 1e-9);
    }

    #[test]
    fn volatility_constant_growth_is_zero() {
        let values: Vec<f64> = (0..10).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        assert_eq!(annualized_volatility(&values).unwrap(), 0.0);
    }

    #[test]
    fn volatility_needs_three_points() {
        let err = annualized_volatility(&[100.0, 101.0]).unwrap_err();
        assert!(matches!(
            err,
            LevsimError::InsufficientData { have: 2, need: 3, .. }
        ));
    }

    #[test]
    fn volatility_after_wipeout_is_undefined() {
        let err = annualized_volatility(&[100.0, 120.0, 0.0, 0.0]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn cagr_flat_series_is_zero() {
        let values = vec![250.0; 730];
        assert_eq!(cagr(&values).unwrap(), 0.0);
    }

    #[test]
    fn cagr_uses_whole_years() {
        // 800 points -> 2 years; doubling over 2 years -> sqrt(2) - 1
        let mut values = vec![100.0; 800];
        values[799] = 200.0;
        let expected = round3((2.0_f64.sqrt() - 1.0) * 100.0);
        assert_eq!(cagr(&values).unwrap(), expected);
        assert_eq!(expected, 41.421);
    }

    #[test]
    fn cagr_total_loss_is_minus_hundred() {
        let mut values = vec![100.0; 365];
        values[364] = 0.0;
        assert_eq!(cagr(&values).unwrap(), -100.0);
    }

    #[test]
    fn cagr_under_one_year_is_insufficient() {
        let err = cagr(&vec![100.0; 364]).unwrap_err();
        assert!(matches!(
            err,
            LevsimError::InsufficientData { have: 364, need: 365, .. }
        ));
    }

    #[test]
    fn appreciation_percent() {
        assert_eq!(appreciation(&[100.0, 150.0, 96.0]).unwrap(), -4.0);
        assert_eq!(appreciation(&[80.0]).unwrap(), 0.0);
        assert!(appreciation(&[]).is_err());
    }

    #[test]
    fn series_metrics_marks_undefined_as_none() {
        let m = SeriesMetrics::compute("2x", &[100.0, 120.0]).unwrap();
        assert_eq!(m.label, "2x");
        assert_eq!(m.end_value, 120.0);
        assert_eq!(m.appreciation_pct, 20.0);
        assert_eq!(m.volatility_pct, None);
        assert_eq!(m.max_drawdown_pct, 0.0);
        assert_eq!(m.cagr_pct, None);
    }

    #[test]
    fn series_metrics_propagates_invalid_input() {
        let err = SeriesMetrics::compute("bad", &[0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, LevsimError::InvalidInput { .. }));
    }

    #[test]
    fn table_rows_follow_statistic_order() {
        let table = MetricsTable {
            columns: vec![
                SeriesMetrics::compute("Close", &[100.0, 110.0, 99.0]).unwrap(),
                SeriesMetrics::compute("2x", &[100.0, 120.0, 96.0]).unwrap(),
            ],
        };

        assert_eq!(table.headers(), vec!["Close", "2x"]);
        let rows = table.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].0, Statistic::EndValue);
        assert_eq!(rows[0].1, vec![Some(99.0), Some(96.0)]);
        assert_eq!(rows[4].0, Statistic::Cagr);
        assert_eq!(rows[4].1, vec![None, None]);
        assert_eq!(table.column("2x").unwrap().max_drawdown_pct, 20.0);
        assert!(table.column("3x").is_none());
    }

    proptest! {
        #[test]
        fn drawdown_within_bounds(values in prop::collection::vec(0.01_f64..1e6, 0..200)) {
            let dd = max_drawdown(&values).unwrap();
            prop_assert!((0.0..=100.0).contains(&dd));
        }

        #[test]
        fn drawdown_zero_for_non_decreasing(steps in prop::collection::vec(0.0_f64..10.0, 1..200)) {
            let values: Vec<f64> = steps
                .iter()
                .scan(1.0, |acc, s| { *acc += s; Some(*acc) })
                .collect();
            prop_assert_eq!(max_drawdown(&values).unwrap(), 0.0);
        }

        #[test]
        fn drawdown_positive_after_a_real_drop(
            start in 1.0_f64..1000.0,
            drop in 0.01_f64..0.99,
        ) {
            let values = [start, start * (1.0 - drop)];
            prop_assert!(max_drawdown(&values).unwrap() > 0.0);
        }

        #[test]
        fn cagr_zero_for_equal_endpoints(
            n in 365_usize..2000,
            level in 1.0_f64..1000.0,
            middle in 1.0_f64..1000.0,
        ) {
            let mut values = vec![middle; n];
            values[0] = level;
            values[n - 1] = level;
            prop_assert_eq!(cagr(&values).unwrap(), 0.0);
        }
    }
}
