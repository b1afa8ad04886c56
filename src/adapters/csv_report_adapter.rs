//! CSV report adapter implementing ReportPort.
//!
//! Exports the column set charting frontends read: date, close, the two
//! moving averages, position, traded quantity, and total value. Warmup
//! slots serialize as empty cells.

use serde::Serialize;

use crate::domain::error::CrosstraderError;
use crate::domain::series::AnalyzedSeries;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct ReportRow {
    date: String,
    close: f64,
    short_ma: Option<f64>,
    long_ma: Option<f64>,
    position: i8,
    quantity: i64,
    total_value: Option<f64>,
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, series: &AnalyzedSeries, output_path: &str) -> Result<(), CrosstraderError> {
        let mut writer =
            csv::Writer::from_path(output_path).map_err(|e| CrosstraderError::Data {
                reason: format!("failed to open {}: {}", output_path, e),
            })?;

        for i in 0..series.len() {
            let row = ReportRow {
                date: series.date(i).format("%Y-%m-%d").to_string(),
                close: series.close(i),
                short_ma: series.short_ma[i],
                long_ma: series.long_ma[i],
                position: series.position[i],
                quantity: series.quantity.get(i).copied().unwrap_or(0),
                total_value: series.total_value.get(i).copied(),
            };
            writer.serialize(row).map_err(|e| CrosstraderError::Data {
                reason: format!("failed to write {}: {}", output_path, e),
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::analyze;
    use crate::domain::ohlcv::PriceBar;
    use chrono::NaiveDate;

    fn sample_series() -> AnalyzedSeries {
        let bars = [10.0, 10.0, 10.0, 20.0, 10.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                symbol: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        analyze(bars, 2, 3, 100.0).unwrap()
    }

    #[test]
    fn writes_one_row_per_bar_plus_header() {
        let series = sample_series();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.csv");

        CsvReportAdapter::new()
            .write(&series, path.to_str().unwrap())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "date,close,short_ma,long_ma,position,quantity,total_value"
        );
    }

    #[test]
    fn warmup_cells_are_empty() {
        let series = sample_series();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.csv");

        CsvReportAdapter::new()
            .write(&series, path.to_str().unwrap())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let first_row: Vec<&str> = content.lines().nth(1).unwrap().split(',').collect();
        // short_ma and long_ma are still warming up on day one
        assert_eq!(first_row[2], "");
        assert_eq!(first_row[3], "");
    }

    #[test]
    fn trade_row_records_the_buy() {
        let series = sample_series();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.csv");

        CsvReportAdapter::new()
            .write(&series, path.to_str().unwrap())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let buy_row: Vec<&str> = content.lines().nth(4).unwrap().split(',').collect();
        assert_eq!(buy_row[0], "2024-01-04");
        assert_eq!(buy_row[4], "1");
        assert_eq!(buy_row[5], "5");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let series = sample_series();
        let result = CsvReportAdapter::new().write(&series, "/nonexistent/dir/report.csv");
        assert!(matches!(result, Err(CrosstraderError::Data { .. })));
    }
}
