//! CSV file data adapter.
//!
//! One file per symbol at `<base_path>/<SYMBOL>.csv`, in the layout of a
//! daily quote download: a `Date` column (`YYYY-MM-DD`) and an `Adj Close`
//! column, located by header name. Other columns are ignored.

use crate::domain::error::TraderError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const DATE_COLUMN: &str = "Date";
const PRICE_COLUMN: &str = "Adj Close";

pub struct CsvAdapter {
    base_path: PathBuf,
    calendar_symbol: Option<String>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            calendar_symbol: None,
        }
    }

    /// Take the date index from `symbol`'s file and left-join every fetched
    /// symbol onto it.
    pub fn with_calendar(mut self, symbol: impl Into<String>) -> Self {
        self.calendar_symbol = Some(symbol.into());
        self
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_rows(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, TraderError> {
        let path = self.csv_path(symbol);
        if !path.is_file() {
            return Err(TraderError::UnknownSymbol {
                symbol: symbol.to_string(),
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| TraderError::DataLoad {
            reason: format!("{}: CSV header error: {}", path.display(), e),
        })?;
        let date_idx = column_index(headers, DATE_COLUMN, &path)?;
        let price_idx = column_index(headers, PRICE_COLUMN, &path)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TraderError::DataLoad {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

            let date_str = record.get(date_idx).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TraderError::DataLoad {
                    reason: format!("{}: invalid date {:?}: {}", path.display(), date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let price = parse_price(record.get(price_idx).unwrap_or(""))
                .map_err(|reason| TraderError::DataLoad {
                    reason: format!("{}: {} on {}", path.display(), reason, date),
                })?;
            points.push(PricePoint { date, price });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    path: &std::path::Path,
) -> Result<usize, TraderError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| TraderError::DataLoad {
            reason: format!("{}: missing {:?} column", path.display(), name),
        })
}

/// Blank, `NaN` and `null` cells are gaps, not errors.
fn parse_price(cell: &str) -> Result<Option<f64>, String> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid price {:?}: {}", cell, e))
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TraderError> {
        let rows = self.read_rows(symbol, start_date, end_date)?;

        let points = match self.calendar_symbol.as_deref() {
            Some(calendar) if calendar != symbol => {
                let by_date: HashMap<NaiveDate, Option<f64>> =
                    rows.into_iter().map(|p| (p.date, p.price)).collect();
                self.read_rows(calendar, start_date, end_date)?
                    .into_iter()
                    .map(|c| PricePoint {
                        date: c.date,
                        price: by_date.get(&c.date).copied().flatten(),
                    })
                    .collect()
            }
            _ => rows,
        };

        let series = PriceSeries::new(symbol, points)?;
        debug!(
            symbol,
            dates = series.len(),
            missing = series.missing_count(),
            "prices loaded"
        );
        Ok(series)
    }
}
