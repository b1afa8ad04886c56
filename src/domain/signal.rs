//! Crossover signal generation.
//!
//! Computes the short/long moving averages of close, their slopes, the
//! binary trend signal, and the position-change events the simulator
//! trades on.

use super::error::CrosstraderError;
use super::indicator::{first_difference, rolling_mean};
use super::ohlcv::PriceBar;
use super::series::AnalyzedSeries;

/// Annotate `bars` with moving averages, slopes, and crossover signals.
///
/// Windows must satisfy `0 < short_window < long_window`. A `long_window`
/// beyond the series length is accepted: the long average never fills and
/// the signal stays flat for the whole series.
pub fn generate(
    bars: Vec<PriceBar>,
    short_window: usize,
    long_window: usize,
) -> Result<AnalyzedSeries, CrosstraderError> {
    if bars.is_empty() {
        return Err(CrosstraderError::InsufficientData {
            bars: 0,
            minimum: 1,
        });
    }
    if short_window == 0 || long_window == 0 || short_window >= long_window {
        return Err(CrosstraderError::InvalidWindows {
            short: short_window,
            long: long_window,
        });
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let short_ma = rolling_mean(&closes, short_window);
    let long_ma = rolling_mean(&closes, long_window);
    let short_slope = first_difference(&short_ma);
    let long_slope = first_difference(&long_ma);

    // Signal is forced flat for the first `short_window` bars; after
    // that, flat unless the short average sits strictly above the long.
    let signal: Vec<i8> = (0..bars.len())
        .map(|i| {
            if i < short_window {
                return 0;
            }
            match (short_ma[i], long_ma[i]) {
                (Some(short), Some(long)) if short > long => 1,
                _ => 0,
            }
        })
        .collect();

    let position: Vec<i8> = (0..bars.len())
        .map(|i| if i == 0 { 0 } else { signal[i] - signal[i - 1] })
        .collect();

    Ok(AnalyzedSeries {
        bars,
        short_window,
        long_window,
        short_ma,
        long_ma,
        short_slope,
        long_slope,
        signal,
        position,
        quantity: Vec::new(),
        cash: Vec::new(),
        holdings: Vec::new(),
        total_value: Vec::new(),
    })
}
