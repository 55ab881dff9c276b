//! Cumulative-return report as CSV.
//!
//! One `Date` column plus one column per strategy holding the portfolio's
//! cumulative return since its first valued date (0 on that date). Dates a
//! strategy has no valuation for are left blank.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TraderError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }
}

fn cumulative_columns(results: &[BacktestResult]) -> BTreeMap<NaiveDate, Vec<Option<f64>>> {
    let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    for (col, result) in results.iter().enumerate() {
        let first = result.simulation.valued_points().first().map(|p| p.0);
        let series = first
            .into_iter()
            .map(|date| (date, 0.0))
            .chain(result.report.daily_cumulative_returns.iter().copied());
        for (date, value) in series {
            rows.entry(date).or_insert_with(|| vec![None; results.len()])[col] = Some(value);
        }
    }
    rows
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, results: &[BacktestResult], output_path: &str) -> Result<(), TraderError> {
        let write_error = |e: csv::Error| TraderError::DataLoad {
            reason: format!("{}: failed to write report: {}", output_path, e),
        };

        let mut wtr = csv::Writer::from_path(output_path).map_err(write_error)?;
        let header: Vec<&str> = std::iter::once("Date")
            .chain(results.iter().map(|r| r.strategy_name.as_str()))
            .collect();
        wtr.write_record(&header).map_err(write_error)?;

        for (date, values) in cumulative_columns(results) {
            let record: Vec<String> = std::iter::once(date.format("%Y-%m-%d").to_string())
                .chain(
                    values
                        .iter()
                        .map(|v| v.map(|x| format!("{:.6}", x)).unwrap_or_default()),
                )
                .collect();
            wtr.write_record(&record).map_err(write_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{AnalysisConfig, PerformanceReport};
    use crate::domain::portfolio::{EquityPoint, PortfolioState, Simulation};
    use std::fs;
    use tempfile::TempDir;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn result(name: &str, values: &[(u32, Option<f64>)]) -> BacktestResult {
        let simulation = Simulation {
            starting_cash: 100.0,
            equity_curve: values
                .iter()
                .map(|&(day, value)| EquityPoint { date: d(day), value })
                .collect(),
            final_state: PortfolioState::new(100.0),
            skipped_orders: Vec::new(),
            fees_paid: 0.0,
            trade_count: 0,
        };
        let report = PerformanceReport::from_simulation(&simulation, &AnalysisConfig::default())
            .unwrap();
        BacktestResult {
            strategy_name: name.to_string(),
            orders: Vec::new(),
            simulation,
            report,
        }
    }

    #[test]
    fn writes_one_column_per_strategy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("returns.csv");
        let results = vec![
            result("oracle", &[(1, Some(100.0)), (2, Some(110.0)), (3, Some(121.0))]),
            result("baseline", &[(1, Some(100.0)), (2, None), (3, Some(90.0))]),
        ];

        CsvReportAdapter::new()
            .write(&results, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Date,oracle,baseline");
        assert_eq!(lines[1], "2024-01-01,0.000000,0.000000");
        assert_eq!(lines[2], "2024-01-02,0.100000,");
        assert_eq!(lines[3], "2024-01-03,0.210000,-0.100000");
        assert_eq!(lines.len(), 4);
    }
}
