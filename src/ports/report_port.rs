//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TraderError;

/// Port for writing the results of one or more strategy runs.
pub trait ReportPort {
    fn write(&self, results: &[BacktestResult], output_path: &str) -> Result<(), TraderError>;
}
