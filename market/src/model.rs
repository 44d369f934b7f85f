use std::fmt;

use serde::Serialize;

use crate::trend_window::TrendHistory;

/// Stable identifier of a tracked asset (e.g. `"btc"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One tracked asset.
///
/// `id`, `symbol`, `name`, `market_cap` and `volume_24h` never change after
/// creation. `price`, `change_24h` and `trend` are replaced on every
/// simulation tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,

    /// Quote price, strictly positive.
    pub price: f64,

    /// 24h change in percent. May be negative.
    #[serde(rename = "change24h")]
    pub change_24h: f64,

    pub market_cap: f64,

    #[serde(rename = "volume24h")]
    pub volume_24h: f64,

    /// Recent trend points, oldest first.
    pub trend: TrendHistory,
}

impl AssetRecord {
    /// Whether the row should render as "up" (green / ▲).
    pub fn is_positive(&self) -> bool {
        self.change_24h >= 0.0
    }

    /// Case-insensitive literal substring match on name or symbol.
    /// `needle` must already be lower-cased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}
