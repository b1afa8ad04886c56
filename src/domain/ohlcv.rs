//! Daily OHLCV bar representation.

use chrono::NaiveDate;

/// One trading day for a symbol. The analysis core only reads `close`;
/// the remaining columns are carried through for providers and reports.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}
