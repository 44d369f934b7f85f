//! Initial trend generation.
//!
//! A trend is a bounded random walk: start somewhere in `[50, 100)`, take
//! [`TREND_LEN`] steps of at most ±7.5 each, and clamp every point into
//! `[TREND_MIN, TREND_MAX]`.

use rand::Rng;

use crate::trend_window::{TREND_LEN, TrendHistory};

pub const TREND_MIN: f64 = 10.0;
pub const TREND_MAX: f64 = 90.0;

const START_BASE: f64 = 50.0;
const START_SPREAD: f64 = 50.0;
const STEP_HALF_WIDTH: f64 = 7.5;

/// Generate a fresh, independent trend history.
pub fn generate_trend<R: Rng + ?Sized>(rng: &mut R) -> TrendHistory {
    let mut value = START_BASE + rng.random::<f64>() * START_SPREAD;

    let points: [f64; TREND_LEN] = std::array::from_fn(|_| {
        value += rng.random_range(-1.0..1.0) * STEP_HALF_WIDTH;
        value = value.clamp(TREND_MIN, TREND_MAX);
        value
    });

    TrendHistory::from_array(points)
}
