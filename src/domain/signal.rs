//! Daily directional verdicts.
//!
//! Sub-verdicts come from individual indicators; [`aggregate`] sums their
//! scores per date and the sign of the sum decides. A date where any input is
//! undefined aggregates to FLAT.

use chrono::NaiveDate;

use crate::domain::indicator::{IndicatorSeries, IndicatorValue};
use crate::domain::price::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Long,
    Flat,
    Short,
}

impl Verdict {
    pub fn score(self) -> i32 {
        match self {
            Verdict::Long => 1,
            Verdict::Flat => 0,
            Verdict::Short => -1,
        }
    }

    pub fn from_score(score: i32) -> Self {
        match score.signum() {
            1 => Verdict::Long,
            -1 => Verdict::Short,
            _ => Verdict::Flat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedVerdict {
    pub date: NaiveDate,
    pub verdict: Verdict,
}

/// MACD threshold crossings: LONG when the line moves from below `threshold`
/// to at/above it, SHORT when it moves from at/above to below, FLAT otherwise.
/// Undefined when either today's or yesterday's reading is undefined.
// NOTE: crosses the raw line against a fixed level, not the usual MACD vs
// signal-line crossover. Kept literal so results stay comparable.
pub fn macd_crossings(macd: &IndicatorSeries, threshold: f64) -> Vec<Option<Verdict>> {
    let lines = macd.primary_values();
    let mut out = Vec::with_capacity(lines.len());
    for (i, curr) in lines.iter().enumerate() {
        let prev = if i == 0 { None } else { lines[i - 1] };
        out.push(match (prev, *curr) {
            (Some(prev), Some(curr)) if prev < threshold && curr >= threshold => {
                Some(Verdict::Long)
            }
            (Some(prev), Some(curr)) if prev >= threshold && curr < threshold => {
                Some(Verdict::Short)
            }
            (Some(_), Some(_)) => Some(Verdict::Flat),
            _ => None,
        });
    }
    out
}

/// RSI bands: SHORT above `overbought`, LONG below `oversold`.
pub fn rsi_bands(rsi: &IndicatorSeries, overbought: f64, oversold: f64) -> Vec<Option<Verdict>> {
    rsi.primary_values()
        .into_iter()
        .map(|v| {
            v.map(|rsi| {
                if rsi > overbought {
                    Verdict::Short
                } else if rsi < oversold {
                    Verdict::Long
                } else {
                    Verdict::Flat
                }
            })
        })
        .collect()
}

/// Price against Bollinger bands: SHORT above the upper band, LONG below the
/// lower band.
pub fn bollinger_breaches(bands: &IndicatorSeries, points: &[PricePoint]) -> Vec<Option<Verdict>> {
    bands
        .values
        .iter()
        .zip(points)
        .map(|(band, point)| match (&band.value, point.price) {
            (Some(IndicatorValue::Bollinger { upper, lower, .. }), Some(price)) => {
                Some(if price > *upper {
                    Verdict::Short
                } else if price < *lower {
                    Verdict::Long
                } else {
                    Verdict::Flat
                })
            }
            _ => None,
        })
        .collect()
}

/// Combine date-aligned sub-verdict columns into one verdict per date.
pub fn aggregate(points: &[PricePoint], columns: &[Vec<Option<Verdict>>]) -> Vec<DatedVerdict> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let scores: Option<i32> = columns
                .iter()
                .map(|col| col.get(i).copied().flatten().map(Verdict::score))
                .sum();
            let verdict = match (point.price, scores) {
                (Some(_), Some(total)) => Verdict::from_score(total),
                _ => Verdict::Flat,
            };
            DatedVerdict {
                date: point.date,
                verdict,
            }
        })
        .collect()
}

/// Perfect-foresight verdicts from the sign of the next day's price change.
/// The last date, and any date whose change touches a missing price, is FLAT.
pub fn oracle_verdicts(points: &[PricePoint]) -> Vec<DatedVerdict> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let next = points.get(i + 1).and_then(|p| p.price);
            let verdict = match (point.price, next) {
                (Some(today), Some(tomorrow)) if tomorrow > today => Verdict::Long,
                (Some(today), Some(tomorrow)) if tomorrow < today => Verdict::Short,
                _ => Verdict::Flat,
            };
            DatedVerdict {
                date: point.date,
                verdict,
            }
        })
        .collect()
}

/// Buy-and-hold: LONG on the first date with a price, FLAT afterwards.
pub fn baseline_verdicts(points: &[PricePoint]) -> Vec<DatedVerdict> {
    let first = points.iter().position(|p| p.price.is_some());
    points
        .iter()
        .enumerate()
        .map(|(i, point)| DatedVerdict {
            date: point.date,
            verdict: if Some(i) == first {
                Verdict::Long
            } else {
                Verdict::Flat
            },
        })
        .collect()
}
