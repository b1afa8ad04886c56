//! Day-by-day portfolio simulation over a signaled series.
//!
//! A strictly sequential fold: each day's cash and holdings depend on the
//! previous day's, so the loop must not be reordered or parallelized. Buy
//! crossovers are sized by trend strength (short slope over long slope);
//! sell crossovers liquidate the whole position.

use super::error::CrosstraderError;
use super::series::AnalyzedSeries;

/// What to do when the sizing floor forces a buy beyond available cash.
///
/// The minimum trade size is 1 share even when no whole share is
/// affordable, so a buy can overdraw the account. `Permit` reproduces that
/// behavior; `CapAtCash` skips the trade instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverdraftPolicy {
    Permit,
    CapAtCash,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_investment: f64,
    pub overdraft: OverdraftPolicy,
}

impl SimulationConfig {
    pub fn new(initial_investment: f64) -> Self {
        SimulationConfig {
            initial_investment,
            overdraft: OverdraftPolicy::Permit,
        }
    }
}

/// Simulate with the default overdraft policy.
pub fn simulate(
    series: AnalyzedSeries,
    initial_investment: f64,
) -> Result<AnalyzedSeries, CrosstraderError> {
    simulate_with(series, &SimulationConfig::new(initial_investment))
}

/// Walk the signaled series and fill the account columns.
///
/// Day 0 starts with the full investment in cash and nothing held. Every
/// later day either buys (position +1), liquidates (position -1), or
/// carries state forward unchanged.
pub fn simulate_with(
    mut series: AnalyzedSeries,
    config: &SimulationConfig,
) -> Result<AnalyzedSeries, CrosstraderError> {
    let n = series.len();
    if n == 0 {
        return Err(CrosstraderError::InsufficientData {
            bars: 0,
            minimum: 1,
        });
    }
    if config.initial_investment <= 0.0 || !config.initial_investment.is_finite() {
        return Err(CrosstraderError::InvalidInvestment {
            amount: config.initial_investment,
        });
    }
    if series.position.len() != n || series.short_slope.len() != n || series.long_slope.len() != n
    {
        return Err(CrosstraderError::Data {
            reason: "series is missing signal columns".into(),
        });
    }

    let mut quantity = vec![0i64; n];
    let mut cash = vec![0.0f64; n];
    let mut holdings = vec![0i64; n];
    let mut total_value = vec![0.0f64; n];

    cash[0] = config.initial_investment;
    total_value[0] = cash[0] + holdings[0] as f64 * series.close(0);

    for i in 1..n {
        let close = series.close(i);
        let base_quantity = (cash[i - 1] / close).floor() as i64;
        let min_quantity = 1.max((base_quantity as f64 * 0.1).floor() as i64);
        // The second bound always binds; the min-of-two form is kept so the
        // sizing rule reads exactly as specified.
        let max_quantity = ((base_quantity as f64 * 1.5).floor() as i64).min(base_quantity);

        if series.position[i] == 1 {
            let quantity_to_buy = match trend_strength(&series, i) {
                Some(strength) if strength > 0.0 => {
                    let sized = (base_quantity as f64 * strength.min(1.0)).floor() as i64;
                    sized.min(max_quantity).max(min_quantity)
                }
                _ => min_quantity,
            };

            // Overdraft only arises when base_quantity is 0 and the floor
            // forces a 1-share buy.
            if config.overdraft == OverdraftPolicy::CapAtCash && quantity_to_buy > base_quantity {
                cash[i] = cash[i - 1];
                holdings[i] = holdings[i - 1];
            } else {
                quantity[i] = quantity_to_buy;
                cash[i] = cash[i - 1] - quantity_to_buy as f64 * close;
                holdings[i] = holdings[i - 1] + quantity_to_buy;
            }
        } else if series.position[i] == -1 {
            let sold = holdings[i - 1];
            quantity[i] = -sold;
            cash[i] = cash[i - 1] + sold as f64 * close;
            holdings[i] = 0;
        } else {
            cash[i] = cash[i - 1];
            holdings[i] = holdings[i - 1];
        }

        total_value[i] = cash[i] + holdings[i] as f64 * close;
    }

    series.quantity = quantity;
    series.cash = cash;
    series.holdings = holdings;
    series.total_value = total_value;
    Ok(series)
}

/// Ratio of short-MA slope to long-MA slope on day `i`.
///
/// `None` when either slope has not filled or the long slope is zero; the
/// caller falls back to the minimum buy size, so the ratio never divides
/// by zero.
fn trend_strength(series: &AnalyzedSeries, i: usize) -> Option<f64> {
    let short = series.short_slope[i]?;
    let long = series.long_slope[i]?;
    if long == 0.0 {
        return None;
    }
    Some(short / long)
}
