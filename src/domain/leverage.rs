//! Daily-rebalanced leverage simulation.
//!
//! Each day the underlying's simple return is multiplied by the leverage
//! factor and compounded onto the previous leveraged value, minus a flat
//! daily expense drag. Values are clamped at zero and a zero value absorbs
//! every later day.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::error::LevsimError;
use super::price_series::PriceSeries;

/// Annual fees are converted to a daily fraction over calendar days.
pub const DAYS_PER_FEE_YEAR: f64 = 365.0;

/// When the daily expense drag is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseMode {
    /// Charged every day regardless of the day's outcome.
    #[default]
    Always,
    /// Charged only on days where the leveraged value increased.
    ProfitDaysOnly,
}

impl FromStr for ExpenseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(ExpenseMode::Always),
            "profit_days" | "profit-days" | "profit_days_only" => Ok(ExpenseMode::ProfitDaysOnly),
            other => Err(format!(
                "unknown expense mode '{other}' (expected always or profit_days)"
            )),
        }
    }
}

impl fmt::Display for ExpenseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseMode::Always => write!(f, "always"),
            ExpenseMode::ProfitDaysOnly => write!(f, "profit_days"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeverageSpec {
    pub leverage: f64,
    pub daily_expense_ratio: f64,
    pub expense_mode: ExpenseMode,
}

impl LeverageSpec {
    pub fn new(
        leverage: f64,
        daily_expense_ratio: f64,
        expense_mode: ExpenseMode,
    ) -> Result<Self, LevsimError> {
        validate_leverage(leverage)?;
        validate_expense_ratio(daily_expense_ratio)?;
        Ok(Self {
            leverage,
            daily_expense_ratio,
            expense_mode,
        })
    }

    /// Build from an annualized fee such as `0.0095` for 0.95% per year.
    pub fn from_annual_fee(
        leverage: f64,
        annual_expense_ratio: f64,
        expense_mode: ExpenseMode,
    ) -> Result<Self, LevsimError> {
        Self::new(leverage, annual_expense_ratio / DAYS_PER_FEE_YEAR, expense_mode)
    }

    /// Column label, e.g. `2x` or `1.25x`.
    pub fn label(&self) -> String {
        format!("{}x", self.leverage)
    }
}

/// Leveraged values aligned date-for-date with the source series.
#[derive(Debug, Clone, PartialEq)]
pub struct LeveragedSeries {
    pub spec: LeverageSpec,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl LeveragedSeries {
    pub fn label(&self) -> String {
        self.spec.label()
    }

    pub fn end_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

fn validate_leverage(leverage: f64) -> Result<(), LevsimError> {
    if !(leverage > 0.0 && leverage.is_finite()) {
        return Err(LevsimError::invalid(format!(
            "leverage must be positive, got {leverage}"
        )));
    }
    Ok(())
}

fn validate_expense_ratio(ratio: f64) -> Result<(), LevsimError> {
    if !(ratio >= 0.0 && ratio.is_finite()) {
        return Err(LevsimError::invalid(format!(
            "expense ratio must be non-negative, got {ratio}"
        )));
    }
    Ok(())
}

/// Simulate a daily-leveraged value series from closing prices.
///
/// `output[0]` is anchored to `prices[0]`. Output has the same length as
/// the input and is never negative.
pub fn simulate(
    prices: &[f64],
    leverage: f64,
    daily_expense_ratio: f64,
    expense_mode: ExpenseMode,
) -> Result<Vec<f64>, LevsimError> {
    validate_leverage(leverage)?;
    validate_expense_ratio(daily_expense_ratio)?;

    let Some(&first) = prices.first() else {
        return Err(LevsimError::invalid("empty price series"));
    };
    if let Some((i, bad)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !(**p > 0.0 && p.is_finite()))
    {
        return Err(LevsimError::invalid(format!(
            "non-positive price {bad} at index {i}"
        )));
    }

    let mut output = Vec::with_capacity(prices.len());
    output.push(first);

    for (i, w) in prices.windows(2).enumerate() {
        let prev_value = output[output.len() - 1];
        if prev_value == 0.0 {
            output.push(0.0);
            continue;
        }

        let daily_return = w[1] / w[0] - 1.0;
        let levered_return = daily_return * leverage;
        let mut raw = prev_value * (1.0 + levered_return);

        let charge = match expense_mode {
            ExpenseMode::Always => true,
            ExpenseMode::ProfitDaysOnly => raw > prev_value,
        };
        if charge {
            raw -= raw * daily_expense_ratio;
        }
        if !raw.is_finite() {
            return Err(LevsimError::invalid(format!(
                "leveraged value overflowed at index {}",
                i + 1
            )));
        }

        output.push(if raw < 0.0 { 0.0 } else { raw });
    }

    Ok(output)
}

/// [`simulate`] over a [`PriceSeries`], keeping the date alignment.
pub fn simulate_series(
    series: &PriceSeries,
    spec: &LeverageSpec,
) -> Result<LeveragedSeries, LevsimError> {
    let values = simulate(
        &series.closes(),
        spec.leverage,
        spec.daily_expense_ratio,
        spec.expense_mode,
    )?;
    Ok(LeveragedSeries {
        spec: *spec,
        dates: series.dates(),
        values,
    })
}
