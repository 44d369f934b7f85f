use serde::Serialize;

use crate::model::AssetRecord;

/// Summary figures over the full tracked collection (never the filtered view).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MarketTotals {
    pub total_market_cap: f64,
    pub avg_change_24h: f64,
    pub asset_count: usize,
}

pub fn total_market_cap(records: &[AssetRecord]) -> f64 {
    records.iter().map(|r| r.market_cap).sum()
}

/// Mean 24h change; 0 for an empty collection.
pub fn avg_change_24h(records: &[AssetRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    records.iter().map(|r| r.change_24h).sum::<f64>() / records.len() as f64
}

pub fn aggregate(records: &[AssetRecord]) -> MarketTotals {
    MarketTotals {
        total_market_cap: total_market_cap(records),
        avg_change_24h: avg_change_24h(records),
        asset_count: records.len(),
    }
}
