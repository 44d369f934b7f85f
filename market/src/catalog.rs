//! Startup catalog of tracked assets.

use rand::Rng;

use crate::model::{AssetId, AssetRecord};
use crate::sparkline::generate_trend;

/// Static part of a catalog entry; the trend is generated at startup.
#[derive(Debug, Clone, Copy)]
pub struct SeedAsset {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
}

pub const SEED_CATALOG: [SeedAsset; 8] = [
    SeedAsset {
        id: "btc",
        symbol: "BTC",
        name: "Bitcoin",
        price: 67_245.89,
        change_24h: 2.34,
        market_cap: 1_324_000_000_000.0,
        volume_24h: 28_500_000_000.0,
    },
    SeedAsset {
        id: "eth",
        symbol: "ETH",
        name: "Ethereum",
        price: 3_521.42,
        change_24h: -1.28,
        market_cap: 423_000_000_000.0,
        volume_24h: 15_200_000_000.0,
    },
    SeedAsset {
        id: "sol",
        symbol: "SOL",
        name: "Solana",
        price: 178.93,
        change_24h: 5.67,
        market_cap: 82_000_000_000.0,
        volume_24h: 3_400_000_000.0,
    },
    SeedAsset {
        id: "bnb",
        symbol: "BNB",
        name: "BNB Chain",
        price: 612.45,
        change_24h: 0.89,
        market_cap: 91_000_000_000.0,
        volume_24h: 1_800_000_000.0,
    },
    SeedAsset {
        id: "xrp",
        symbol: "XRP",
        name: "Ripple",
        price: 0.5234,
        change_24h: -0.45,
        market_cap: 28_000_000_000.0,
        volume_24h: 1_200_000_000.0,
    },
    SeedAsset {
        id: "ada",
        symbol: "ADA",
        name: "Cardano",
        price: 0.4521,
        change_24h: 3.21,
        market_cap: 16_000_000_000.0,
        volume_24h: 520_000_000.0,
    },
    SeedAsset {
        id: "doge",
        symbol: "DOGE",
        name: "Dogecoin",
        price: 0.1234,
        change_24h: -2.15,
        market_cap: 18_000_000_000.0,
        volume_24h: 890_000_000.0,
    },
    SeedAsset {
        id: "avax",
        symbol: "AVAX",
        name: "Avalanche",
        price: 38.76,
        change_24h: 4.32,
        market_cap: 14_500_000_000.0,
        volume_24h: 620_000_000.0,
    },
];

impl SeedAsset {
    pub fn to_record<R: Rng + ?Sized>(&self, rng: &mut R) -> AssetRecord {
        AssetRecord {
            id: AssetId::new(self.id),
            symbol: self.symbol.to_string(),
            name: self.name.to_string(),
            price: self.price,
            change_24h: self.change_24h,
            market_cap: self.market_cap,
            volume_24h: self.volume_24h,
            trend: generate_trend(rng),
        }
    }
}

/// Build the initial record set, one fresh trend per asset, in catalog order.
pub fn seed_records<R: Rng + ?Sized>(rng: &mut R) -> Vec<AssetRecord> {
    SEED_CATALOG.iter().map(|s| s.to_record(&mut *rng)).collect()
}
