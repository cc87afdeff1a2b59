//! Configuration validation.
//!
//! Validates all config fields before a simulation runs.

use crate::domain::comparison::parse_leverages;
use crate::domain::error::LevsimError;
use crate::domain::leverage::ExpenseMode;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), LevsimError> {
    validate_data_dir(config)?;
    validate_leverages(config)?;
    validate_expense_ratio(config)?;
    validate_expense_mode(config)?;
    Ok(())
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), LevsimError> {
    match config.get_string("data", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(LevsimError::ConfigMissing {
            section: "data".to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

fn validate_leverages(config: &dyn ConfigPort) -> Result<(), LevsimError> {
    if let Some(s) = config.get_string("simulation", "leverages") {
        parse_leverages(&s).map_err(|e| LevsimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "leverages".to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

fn validate_expense_ratio(config: &dyn ConfigPort) -> Result<(), LevsimError> {
    let raw = config.get_string("simulation", "annual_expense_ratio");
    let Some(raw) = raw else {
        return Ok(());
    };
    let value: f64 = raw.trim().parse().map_err(|_| LevsimError::ConfigInvalid {
        section: "simulation".to_string(),
        key: "annual_expense_ratio".to_string(),
        reason: format!("'{raw}' is not a number"),
    })?;
    if !(0.0..1.0).contains(&value) {
        return Err(LevsimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "annual_expense_ratio".to_string(),
            reason: "annual_expense_ratio must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_expense_mode(config: &dyn ConfigPort) -> Result<(), LevsimError> {
    if let Some(s) = config.get_string("simulation", "expense_mode") {
        s.parse::<ExpenseMode>()
            .map_err(|reason| LevsimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "expense_mode".to_string(),
                reason,
            })?;
    }
    Ok(())
}
