//! View pipeline: filter by search term, then sort by the selected key.
//!
//! Pure functions over a record slice; the same inputs always produce the
//! same ordered output.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseSortKeyError;
use crate::model::AssetRecord;

/// Ranking key for the displayed list. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortKey {
    #[default]
    MarketCap,
    Price,
    /// By |change_24h|: a -5% mover ranks above a +3% one.
    Change24h,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::MarketCap, SortKey::Price, SortKey::Change24h];

    /// Short label used on the sort selector.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::MarketCap => "MCAP",
            SortKey::Price => "PRICE",
            SortKey::Change24h => "24H%",
        }
    }

    fn metric(self, r: &AssetRecord) -> f64 {
        match self {
            SortKey::MarketCap => r.market_cap,
            SortKey::Price => r.price,
            SortKey::Change24h => r.change_24h.abs(),
        }
    }

    fn compare_desc(self, a: &AssetRecord, b: &AssetRecord) -> Ordering {
        self.metric(b).total_cmp(&self.metric(a))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcap" | "marketcap" | "market_cap" => Ok(SortKey::MarketCap),
            "price" => Ok(SortKey::Price),
            "24h" | "24h%" | "change" | "change24h" | "change_24h" => Ok(SortKey::Change24h),
            other => Err(ParseSortKeyError::Unknown(other.to_string())),
        }
    }
}

/// Filter + sort, producing the displayed ordering.
///
/// The filter keeps records whose name or symbol contains `search_term` as a
/// literal, case-insensitive substring; an empty term keeps everything.
/// Sorting is stable, so ties keep their input order.
pub fn view(records: &[AssetRecord], search_term: &str, sort_key: SortKey) -> Vec<AssetRecord> {
    let needle = search_term.to_lowercase();

    let mut rows: Vec<AssetRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || r.matches_lowercase(&needle))
        .cloned()
        .collect();

    rows.sort_by(|a, b| sort_key.compare_desc(a, b));
    rows
}

/// User-controlled inputs of the view pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub search_term: String,
    pub sort_key: SortKey,
}

impl ViewState {
    pub fn new(search_term: impl Into<String>, sort_key: SortKey) -> Self {
        Self {
            search_term: search_term.into(),
            sort_key,
        }
    }

    pub fn apply(&self, records: &[AssetRecord]) -> Vec<AssetRecord> {
        view(records, &self.search_term, self.sort_key)
    }
}
