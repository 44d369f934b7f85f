use std::collections::VecDeque;

use serde::Serialize;

/// Number of points in every trend history.
pub const TREND_LEN: usize = 24;

/// Fixed-length sliding window of trend points, oldest first.
///
/// The window is always full: it can only be built from exactly
/// [`TREND_LEN`] values, and every push evicts the oldest point.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrendHistory {
    values: VecDeque<f64>,
}

impl TrendHistory {
    /// Returns `None` unless exactly [`TREND_LEN`] values are supplied.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let values: VecDeque<f64> = values.into_iter().collect();
        (values.len() == TREND_LEN).then_some(Self { values })
    }

    pub fn from_array(values: [f64; TREND_LEN]) -> Self {
        Self {
            values: VecDeque::from(values),
        }
    }

    /// Evict the oldest point and append `value`.
    pub fn push(&mut self, value: f64) {
        self.values.pop_front();
        self.values.push_back(value);
    }

    /// Copy of this window advanced by one point.
    pub fn pushed(&self, value: f64) -> Self {
        let mut next = self.clone();
        next.push(value);
        next
    }

    pub fn latest(&self) -> f64 {
        self.values.back().copied().unwrap_or_default()
    }

    pub fn oldest(&self) -> f64 {
        self.values.front().copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
