//! Price-series provider port.

use chrono::NaiveDate;

use crate::domain::error::CrosstraderError;
use crate::domain::ohlcv::PriceBar;

/// Source of daily OHLCV bars. An empty result is not an adapter error;
/// the caller decides whether missing data is fatal.
pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, CrosstraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError>;

    /// First date, last date, and bar count for a symbol, if any data exists.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrosstraderError>;
}
