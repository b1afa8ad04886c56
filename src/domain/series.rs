//! Analyzed price series: parallel derived columns over the input bars.

use chrono::NaiveDate;
use std::fmt;

use super::ohlcv::PriceBar;

/// The bar sequence plus derived columns, all index-aligned with `bars`.
///
/// Built as an arena of parallel arrays rather than a mutable shared table:
/// [`crate::domain::signal::generate`] fills the indicator and signal
/// columns; the account columns (`quantity`, `cash`, `holdings`,
/// `total_value`) stay empty until [`crate::domain::simulator::simulate`]
/// runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedSeries {
    pub bars: Vec<PriceBar>,
    pub short_window: usize,
    pub long_window: usize,

    /// Trailing mean of `close` over `short_window` bars; `None` during warmup.
    pub short_ma: Vec<Option<f64>>,
    /// Trailing mean of `close` over `long_window` bars; `None` during warmup.
    pub long_ma: Vec<Option<f64>>,
    pub short_slope: Vec<Option<f64>>,
    pub long_slope: Vec<Option<f64>>,
    /// 1 while the short average sits above the long one, else 0.
    pub signal: Vec<i8>,
    /// Day-over-day signal change: +1 buy crossover, -1 sell crossover, 0 none.
    pub position: Vec<i8>,

    /// Signed shares traded per day; 0 when no trade.
    pub quantity: Vec<i64>,
    pub cash: Vec<f64>,
    pub holdings: Vec<i64>,
    /// Mark-to-market account value: `cash + holdings * close`.
    pub total_value: Vec<f64>,
}

impl AnalyzedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn date(&self, i: usize) -> NaiveDate {
        self.bars[i].date
    }

    pub fn close(&self, i: usize) -> f64 {
        self.bars[i].close
    }

    /// Whether the account columns have been filled by the simulator.
    pub fn is_simulated(&self) -> bool {
        !self.bars.is_empty() && self.cash.len() == self.bars.len()
    }

    /// Executed trades: bars where a crossover fired and shares moved.
    ///
    /// Empty until the series has been simulated.
    pub fn trade_log(&self) -> Vec<TradeRecord> {
        let mut log = Vec::new();
        for (i, &qty) in self.quantity.iter().enumerate() {
            if self.position[i] == 0 || qty == 0 {
                continue;
            }
            let side = if self.position[i] > 0 {
                TradeSide::Buy
            } else {
                TradeSide::Sell
            };
            log.push(TradeRecord {
                date: self.bars[i].date,
                side,
                price: self.bars[i].close,
                size: qty.abs(),
            });
        }
        log
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the trade-log view: executed price and unsigned size.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub price: f64,
    pub size: i64,
}
