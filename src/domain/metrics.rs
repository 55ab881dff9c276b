//! Performance metrics and statistics.
//!
//! Return statistics use the sample standard deviation (n-1), the same
//! convention as the Bollinger band width.

use chrono::NaiveDate;

use super::error::TraderError;
use super::indicator::stddev::sample_stddev;
use super::portfolio::Simulation;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Per-period risk-free rate subtracted from each daily return.
    pub risk_free_rate: f64,
    pub annualization_factor: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            risk_free_rate: 0.0,
            annualization_factor: TRADING_DAYS_PER_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub average_daily_return: f64,
    pub cumulative_return: f64,
    pub stdev_daily_return: f64,
    /// `None` when the excess returns have zero spread.
    pub sharpe_ratio: Option<f64>,
    pub end_value: f64,
    pub max_drawdown: f64,
    pub daily_cumulative_returns: Vec<(NaiveDate, f64)>,
}

impl PerformanceReport {
    pub fn from_simulation(sim: &Simulation, config: &AnalysisConfig) -> Result<Self, TraderError> {
        Self::compute(&sim.valued_points(), config)
    }

    /// Reduce a dated portfolio-value series (dates without a value already
    /// removed) to summary statistics.
    pub fn compute(values: &[(NaiveDate, f64)], config: &AnalysisConfig) -> Result<Self, TraderError> {
        if values.len() < 2 {
            return Err(TraderError::InsufficientData {
                have: values.len(),
                need: 2,
            });
        }

        let cumulative_return = cumulative_return(values)?;
        let returns = daily_returns(values)?;
        let plain: Vec<f64> = returns.iter().map(|r| r.1).collect();

        let mut growth = 1.0;
        let daily_cumulative_returns = returns
            .iter()
            .map(|&(date, r)| {
                growth *= 1.0 + r;
                (date, growth - 1.0)
            })
            .collect();

        let sharpe_ratio = match sharpe_ratio(
            &plain,
            config.risk_free_rate,
            config.annualization_factor,
        ) {
            Ok(v) => Some(v),
            Err(TraderError::DegenerateStatistics { .. }) => None,
            Err(e) => return Err(e),
        };

        let equity: Vec<f64> = values.iter().map(|v| v.1).collect();

        Ok(PerformanceReport {
            average_daily_return: mean(&plain),
            cumulative_return,
            stdev_daily_return: sample_stddev(&plain),
            sharpe_ratio,
            end_value: equity[equity.len() - 1],
            max_drawdown: compute_drawdown(&equity),
            daily_cumulative_returns,
        })
    }
}

/// value[last] / value[first] - 1.
pub fn cumulative_return(values: &[(NaiveDate, f64)]) -> Result<f64, TraderError> {
    let (Some(&(first_date, first)), Some(&(_, last))) = (values.first(), values.last()) else {
        return Err(TraderError::InsufficientData { have: 0, need: 1 });
    };
    if first == 0.0 {
        return Err(TraderError::ZeroBaseValue { date: first_date });
    }
    Ok(last / first - 1.0)
}

/// Period-over-period returns, dated by the later observation.
pub fn daily_returns(values: &[(NaiveDate, f64)]) -> Result<Vec<(NaiveDate, f64)>, TraderError> {
    values
        .windows(2)
        .map(|w| {
            let (prev_date, prev) = w[0];
            let (date, curr) = w[1];
            if prev == 0.0 {
                Err(TraderError::ZeroBaseValue { date: prev_date })
            } else {
                Ok((date, curr / prev - 1.0))
            }
        })
        .collect()
}

/// mean(r - rf) / stdev(r - rf) * sqrt(annualization_factor).
pub fn sharpe_ratio(
    returns: &[f64],
    risk_free_rate: f64,
    annualization_factor: f64,
) -> Result<f64, TraderError> {
    let excess: Vec<f64> = returns.iter().map(|r| r - risk_free_rate).collect();
    let stddev = sample_stddev(&excess);
    if stddev == 0.0 || !stddev.is_finite() {
        return Err(TraderError::DegenerateStatistics {
            reason: "daily returns have zero standard deviation; Sharpe ratio undefined".into(),
        });
    }
    Ok(mean(&excess) / stddev * annualization_factor.sqrt())
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

/// Largest peak-to-trough decline as a fraction of the peak.
fn compute_drawdown(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in equity {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - value) / peak);
        }
    }
    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dated(values: &[f64]) -> Vec<(NaiveDate, f64)> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Duration::days(i as i64), v))
            .collect()
    }

    #[test]
    fn total_return_positive() {
        let report = PerformanceReport::compute(&dated(&[100_000.0, 110_000.0]), &AnalysisConfig::default())
            .unwrap();
        assert_relative_eq!(report.cumulative_return, 0.10, epsilon = 1e-12);
        assert_relative_eq!(report.end_value, 110_000.0);
    }

    #[test]
    fn total_return_negative() {
        let values = dated(&[100_000.0, 90_000.0]);
        assert_relative_eq!(cumulative_return(&values).unwrap(), -0.10, epsilon = 1e-12);
    }

    #[test]
    fn daily_returns_are_pct_change() {
        let returns = daily_returns(&dated(&[100.0, 110.0, 99.0])).unwrap();
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0].1, 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[1].1, -0.10, epsilon = 1e-12);
    }

    #[test]
    fn zero_base_value_is_an_error() {
        let err = daily_returns(&dated(&[100.0, 0.0, 50.0])).unwrap_err();
        assert!(matches!(err, TraderError::ZeroBaseValue { .. }));

        let err = cumulative_return(&dated(&[0.0, 50.0])).unwrap_err();
        assert!(matches!(err, TraderError::ZeroBaseValue { .. }));
    }

    #[test]
    fn daily_cumulative_series_compounds() {
        let report = PerformanceReport::compute(&dated(&[100.0, 110.0, 99.0, 121.0]), &AnalysisConfig::default())
            .unwrap();
        let series: Vec<f64> = report.daily_cumulative_returns.iter().map(|p| p.1).collect();

        assert_eq!(series.len(), 3);
        assert_relative_eq!(series[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(series[1], -0.01, epsilon = 1e-12);
        assert_relative_eq!(series[2], 0.21, epsilon = 1e-12);
        assert_relative_eq!(series[2], report.cumulative_return, epsilon = 1e-12);
    }

    #[test]
    fn flat_series_has_degenerate_sharpe() {
        let report = PerformanceReport::compute(&dated(&[500.0; 6]), &AnalysisConfig::default()).unwrap();
        assert_eq!(report.cumulative_return, 0.0);
        assert_eq!(report.stdev_daily_return, 0.0);
        assert_eq!(report.sharpe_ratio, None);

        let err = sharpe_ratio(&[0.0, 0.0, 0.0], 0.0, 252.0).unwrap_err();
        assert!(matches!(err, TraderError::DegenerateStatistics { .. }));
    }

    #[test]
    fn sharpe_ratio_formula() {
        let returns = [0.01, -0.02, 0.03, 0.0];
        let mean = 0.005;
        let var = ((0.005f64).powi(2) + (0.025f64).powi(2) + (0.025f64).powi(2) + (0.005f64).powi(2)) / 3.0;
        let expected = mean / var.sqrt() * 252f64.sqrt();

        assert_relative_eq!(sharpe_ratio(&returns, 0.0, 252.0).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn sharpe_subtracts_risk_free_rate() {
        let returns = [0.01, 0.02, 0.03];
        let with_rf = sharpe_ratio(&returns, 0.02, 1.0).unwrap();
        assert_relative_eq!(with_rf, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn average_and_stdev_are_sample_statistics() {
        let report = PerformanceReport::compute(&dated(&[100.0, 110.0, 99.0]), &AnalysisConfig::default())
            .unwrap();
        assert_relative_eq!(report.average_daily_return, 0.0, epsilon = 1e-12);
        // returns +0.1, -0.1 -> sample variance 0.02
        assert_relative_eq!(report.stdev_daily_return, 0.02f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn single_value_is_insufficient() {
        let err = PerformanceReport::compute(&dated(&[100.0]), &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, TraderError::InsufficientData { have: 1, need: 2 }));
    }

    #[test]
    fn max_drawdown() {
        let dd = compute_drawdown(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        assert_relative_eq!(dd, (110.0 - 80.0) / 110.0, epsilon = 1e-12);
        assert_eq!(compute_drawdown(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(compute_drawdown(&[]), 0.0);
    }
}
