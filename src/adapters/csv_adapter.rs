//! CSV file data adapter.
//!
//! Reads `<dir>/<SYMBOL>.csv` files with a `date,open,high,low,close,volume`
//! header, dates formatted `%Y-%m-%d`.

use crate::domain::error::CrosstraderError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_column<T: FromStr>(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
) -> Result<T, CrosstraderError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| CrosstraderError::Data {
        reason: format!("missing {} column", column),
    })?;
    raw.parse().map_err(|e| CrosstraderError::Data {
        reason: format!("invalid {} value {:?}: {}", column, raw, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, CrosstraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| CrosstraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| CrosstraderError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| CrosstraderError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                CrosstraderError::Data {
                    reason: format!("invalid date {:?}: {}", date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(PriceBar {
                symbol: symbol.to_string(),
                date,
                open: parse_column(&record, 1, "open")?,
                high: parse_column(&record, 2, "high")?,
                low: parse_column(&record, 3, "low")?,
                close: parse_column(&record, 4, "close")?,
                volume: parse_column(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CrosstraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CrosstraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrosstraderError> {
        let bars = self.fetch_ohlcv(symbol, NaiveDate::MIN, NaiveDate::MAX)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
