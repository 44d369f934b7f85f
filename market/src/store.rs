use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::model::{AssetId, AssetRecord};

/// Immutable view of the whole tracked collection at one point in time.
///
/// Records keep catalog order and ids are unique within a snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct MarketSnapshot {
    /// 0 for the seed collection, +1 per simulation tick.
    pub seq: u64,

    /// Snapshot timestamp (ms since epoch)
    pub ts_ms: u64,

    pub records: Vec<AssetRecord>,
}

impl MarketSnapshot {
    pub fn new(seq: u64, ts_ms: u64, records: Vec<AssetRecord>) -> Self {
        Self {
            seq,
            ts_ms,
            records,
        }
    }

    pub fn get(&self, id: &AssetId) -> Option<&AssetRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &AssetId> + '_ {
        self.records.iter().map(|r| &r.id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Holder of the canonical snapshot.
///
/// Readers get a shared `Arc` and can keep it as long as they like; the
/// simulation swaps in a whole new snapshot per tick, so a reader never
/// observes a half-applied tick. Only this crate can publish.
#[derive(Clone)]
pub struct MarketStore {
    inner: Arc<RwLock<Arc<MarketSnapshot>>>,
}

impl MarketStore {
    pub fn new(initial: MarketSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    /// Latest published snapshot.
    pub async fn current(&self) -> Arc<MarketSnapshot> {
        let g = self.inner.read().await;
        Arc::clone(&g)
    }

    /// Replace the canonical snapshot. Last write wins.
    pub(crate) async fn publish(&self, next: Arc<MarketSnapshot>) {
        let mut g = self.inner.write().await;
        *g = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_records;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn snapshot(seq: u64) -> MarketSnapshot {
        MarketSnapshot::new(seq, 0, seed_records(&mut StdRng::seed_from_u64(3)))
    }

    #[tokio::test]
    async fn readers_keep_their_snapshot_across_publish() {
        let store = MarketStore::new(snapshot(0));

        let before = store.current().await;
        store.publish(Arc::new(snapshot(1))).await;
        let after = store.current().await;

        assert_eq!(before.seq, 0);
        assert_eq!(after.seq, 1);
    }

    #[test]
    fn lookup_by_id() {
        let s = snapshot(0);

        assert_eq!(s.get(&AssetId::new("eth")).map(|r| r.symbol.as_str()), Some("ETH"));
        assert!(s.get(&AssetId::new("nope")).is_none());
        assert_eq!(s.ids().count(), s.len());
    }
}
