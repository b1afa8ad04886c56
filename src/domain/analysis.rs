//! Combined analysis entry point and return summary.

use super::error::CrosstraderError;
use super::ohlcv::PriceBar;
use super::series::AnalyzedSeries;
use super::signal;
use super::simulator::{self, SimulationConfig};

/// Run signal generation and portfolio simulation in one step.
pub fn analyze(
    bars: Vec<PriceBar>,
    short_window: usize,
    long_window: usize,
    initial_investment: f64,
) -> Result<AnalyzedSeries, CrosstraderError> {
    analyze_with(
        bars,
        short_window,
        long_window,
        &SimulationConfig::new(initial_investment),
    )
}

/// As [`analyze`], with an explicit simulation config.
pub fn analyze_with(
    bars: Vec<PriceBar>,
    short_window: usize,
    long_window: usize,
    config: &SimulationConfig,
) -> Result<AnalyzedSeries, CrosstraderError> {
    let series = signal::generate(bars, short_window, long_window)?;
    simulator::simulate_with(series, config)
}

/// Final mark-to-market outcome of a simulated series.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub initial_investment: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub trades: usize,
}

impl AnalysisSummary {
    pub fn compute(series: &AnalyzedSeries, initial_investment: f64) -> Self {
        let final_value = series
            .total_value
            .last()
            .copied()
            .unwrap_or(initial_investment);
        let total_return_pct = if initial_investment > 0.0 {
            (final_value - initial_investment) / initial_investment * 100.0
        } else {
            0.0
        };
        AnalysisSummary {
            initial_investment,
            final_value,
            total_return_pct,
            trades: series.trade_log().len(),
        }
    }
}
