//! Position-limited order sizing.
//!
//! The held position is always one of [`LEGAL_POSITIONS`]. Each date the
//! sizer receives a verdict and emits exactly one order (possibly zero
//! shares) that moves the position to a legal level:
//!
//! | position | verdict | order  | new position |
//! |----------|---------|--------|--------------|
//! | > 0      | LONG    | 0      | unchanged    |
//! | 0        | LONG    | +1000  | +1000        |
//! | < 0      | LONG    | +2000  | +1000        |
//! | < 0      | SHORT   | 0      | unchanged    |
//! | 0        | SHORT   | -1000  | -1000        |
//! | > 0      | SHORT   | -2000  | -1000        |
//! | any      | FLAT    | 0      | unchanged    |

use chrono::NaiveDate;

use super::signal::{DatedVerdict, Verdict};

pub const LEGAL_POSITIONS: [i64; 5] = [-2000, -1000, 0, 1000, 2000];
pub const LOT_SIZE: i64 = 1000;

pub fn is_legal_position(shares: i64) -> bool {
    LEGAL_POSITIONS.contains(&shares)
}

/// Signed share change issued for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub date: NaiveDate,
    pub shares: i64,
}

impl Order {
    pub fn is_buy(&self) -> bool {
        self.shares > 0
    }

    pub fn is_sell(&self) -> bool {
        self.shares < 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PositionSizer {
    position: i64,
}

impl PositionSizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn is_long(&self) -> bool {
        self.position > 0
    }

    pub fn is_short(&self) -> bool {
        self.position < 0
    }

    /// Apply one verdict and return the order delta.
    pub fn step(&mut self, verdict: Verdict) -> i64 {
        let delta = match verdict {
            Verdict::Long if self.is_long() => 0,
            Verdict::Long => LOT_SIZE - self.position,
            Verdict::Short if self.is_short() => 0,
            Verdict::Short => -LOT_SIZE - self.position,
            Verdict::Flat => 0,
        };
        self.position += delta;
        debug_assert!(is_legal_position(self.position));
        delta
    }

    /// Run the whole verdict sequence from a flat start, one order per date.
    pub fn size_orders(verdicts: &[DatedVerdict]) -> Vec<Order> {
        let mut sizer = PositionSizer::new();
        verdicts
            .iter()
            .map(|v| Order {
                date: v.date,
                shares: sizer.step(v.verdict),
            })
            .collect()
    }
}
