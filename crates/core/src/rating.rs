//! Beer rating aggregation.
//!
//! A review scores a beer on four axes (aroma, sabor, cuerpo, apariencia),
//! each an integer in `1..=5`. Its score is the mean of the four axes, and a
//! beer's `avg_rating` is the mean of its reviews' scores rounded to two
//! decimals, or exactly `0` with no reviews.
//!
//! Rounding is half away from zero. The aggregate is computed on integer
//! totals so create, update and delete paths always agree on the last digit.

use serde::{Deserialize, Serialize};

/// Lowest accepted score on any axis.
pub const MIN_AXIS_SCORE: i16 = 1;
/// Highest accepted score on any axis.
pub const MAX_AXIS_SCORE: i16 = 5;
/// Number of rated axes per review.
pub const AXIS_COUNT: i64 = 4;

/// The four per-axis scores of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisScores {
    pub aroma: i16,
    pub sabor: i16,
    pub cuerpo: i16,
    pub apariencia: i16,
}

impl AxisScores {
    pub fn new(aroma: i16, sabor: i16, cuerpo: i16, apariencia: i16) -> Self {
        Self {
            aroma,
            sabor,
            cuerpo,
            apariencia,
        }
    }

    /// Sum of the four axes.
    pub fn total(&self) -> i64 {
        i64::from(self.aroma)
            + i64::from(self.sabor)
            + i64::from(self.cuerpo)
            + i64::from(self.apariencia)
    }

    /// Per-review score: the unrounded mean of the four axes.
    pub fn mean(&self) -> f64 {
        self.total() as f64 / AXIS_COUNT as f64
    }

    /// Named axis values in display order.
    pub fn axes(&self) -> [(&'static str, i16); 4] {
        [
            ("aroma", self.aroma),
            ("sabor", self.sabor),
            ("cuerpo", self.cuerpo),
            ("apariencia", self.apariencia),
        ]
    }
}

/// Average of per-review scores, rounded to two decimals.
///
/// `round(Σ(total_i / 4) / n, 2)` equals `round(25 * Σtotal_i / n)` cents,
/// which is evaluated exactly with integer division.
pub fn average_rating(reviews: &[AxisScores]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let n = reviews.len() as i64;
    let sum: i64 = reviews.iter().map(AxisScores::total).sum();
    cents_to_rating(div_round_half_away(sum * 25, n))
}

/// Round an already-computed mean to two decimals, half away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn cents_to_rating(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Integer division rounding half away from zero. `den` must be positive.
fn div_round_half_away(num: i64, den: i64) -> i64 {
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((2 * -num + den) / (2 * den))
    }
}
