//! Configuration validation.
//!
//! Validates all config fields before an analysis runs.

use chrono::NaiveDate;

use crate::domain::error::CrosstraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_csv_dir(config)?;
    validate_symbol(config)?;
    validate_dates(config)?;
    validate_windows(config)?;
    validate_initial_investment(config)?;
    Ok(())
}

fn validate_csv_dir(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    match config.get_string("data", "csv_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(CrosstraderError::ConfigInvalid {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
            reason: "csv_dir must not be empty".to_string(),
        }),
        None => Err(CrosstraderError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
        }),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    match config.get_string("analysis", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(CrosstraderError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "symbol".to_string(),
            reason: "symbol must not be empty".to_string(),
        }),
        None => Err(CrosstraderError::ConfigMissing {
            section: "analysis".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let start_str = config.get_string("analysis", "start_date");
    let end_str = config.get_string("analysis", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(CrosstraderError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, CrosstraderError> {
    match value {
        None => Err(CrosstraderError::ConfigMissing {
            section: "analysis".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            CrosstraderError::ConfigInvalid {
                section: "analysis".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let short = config.get_int("analysis", "short_window", 20);
    let long = config.get_int("analysis", "long_window", 100);

    if short <= 0 {
        return Err(CrosstraderError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "short_window".to_string(),
            reason: "short_window must be positive".to_string(),
        });
    }
    if long <= 0 {
        return Err(CrosstraderError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "long_window".to_string(),
            reason: "long_window must be positive".to_string(),
        });
    }
    if short >= long {
        return Err(CrosstraderError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "short_window".to_string(),
            reason: "short_window must be less than long_window".to_string(),
        });
    }
    Ok(())
}

fn validate_initial_investment(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let value = config.get_double("analysis", "initial_investment", 10_000.0);
    if value <= 0.0 {
        return Err(CrosstraderError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "initial_investment".to_string(),
            reason: "initial_investment must be positive".to_string(),
        });
    }
    Ok(())
}
