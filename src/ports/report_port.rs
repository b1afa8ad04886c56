//! Report writer port.

use crate::domain::error::CrosstraderError;
use crate::domain::series::AnalyzedSeries;

/// Port for exporting an analyzed series.
pub trait ReportPort {
    fn write(&self, series: &AnalyzedSeries, output_path: &str) -> Result<(), CrosstraderError>;
}
