//! Simulation engine.
//!
//! Owns the canonical [`MarketStore`] and is its only writer. Every tick it:
//!   • perturbs each record's price, 24h change and trend independently
//!   • publishes the new collection as one immutable snapshot
//!   • pushes the snapshot to every subscriber so read-side views recompute
//!
//! `Simulation` is Arc-managed so the tick loop can own a clone of `self`.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{
    Mutex,
    mpsc::{self, Receiver, Sender, error::TrySendError},
};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, instrument, warn};

use common::time::now_ms;

use crate::model::AssetRecord;
use crate::store::{MarketSnapshot, MarketStore};

/// Reference cadence of the feed.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(2_000);

/// Max relative price move per tick (0.1%).
pub const PRICE_STEP: f64 = 0.001;

/// Max additive 24h-change move per tick, in percentage points.
pub const CHANGE_STEP: f64 = 0.05;

/// Max additive move of the appended trend point.
pub const TREND_STEP: f64 = 2.5;

/// Advance one record by one tick.
///
/// No clamping: `change_24h` and the trend may drift without bound over a
/// long session. Price stays positive because the factor is within
/// `[1 - PRICE_STEP, 1 + PRICE_STEP]`.
pub fn advance<R: Rng + ?Sized>(record: &AssetRecord, rng: &mut R) -> AssetRecord {
    let price = record.price * (1.0 + rng.random_range(-1.0..1.0) * PRICE_STEP);
    let change_24h = record.change_24h + rng.random_range(-1.0..1.0) * CHANGE_STEP;
    let next_point = record.trend.latest() + rng.random_range(-1.0..1.0) * TREND_STEP;

    AssetRecord {
        price,
        change_24h,
        trend: record.trend.pushed(next_point),
        ..record.clone()
    }
}

/// Produce the next snapshot. Order and ids are preserved.
pub fn tick<R: Rng + ?Sized>(snapshot: &MarketSnapshot, rng: &mut R, ts_ms: u64) -> MarketSnapshot {
    let records = snapshot
        .records
        .iter()
        .map(|r| advance(r, &mut *rng))
        .collect();

    MarketSnapshot::new(snapshot.seq + 1, ts_ms, records)
}

pub struct Simulation {
    store: MarketStore,

    /// Read-side components waiting for fresh snapshots.
    subscribers: Arc<Mutex<Vec<Sender<Arc<MarketSnapshot>>>>>,
}

impl Simulation {
    /// Seed the store with `records` as snapshot 0.
    pub fn new(records: Vec<AssetRecord>) -> Arc<Self> {
        let seed = MarketSnapshot::new(0, now_ms(), records);

        info!(assets = seed.len(), "simulation seeded");

        Arc::new(Self {
            store: MarketStore::new(seed),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Read handle on the canonical snapshot.
    pub fn store(&self) -> MarketStore {
        self.store.clone()
    }

    /// Register a subscriber. It receives every snapshot published after
    /// this call; a slow subscriber misses snapshots rather than stalling
    /// the tick.
    pub async fn subscribe(&self, capacity: usize) -> Receiver<Arc<MarketSnapshot>> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        self.subscribers.lock().await.push(tx);
        rx
    }

    /// Apply one tick and broadcast the result.
    #[instrument(skip(self, rng))]
    pub async fn step<R: Rng + ?Sized>(&self, rng: &mut R) -> Arc<MarketSnapshot> {
        let current = self.store.current().await;
        let next = Arc::new(tick(&current, rng, now_ms()));

        self.store.publish(Arc::clone(&next)).await;

        debug!(seq = next.seq, assets = next.len(), "simulation tick applied");

        self.broadcast(&next).await;
        next
    }

    async fn broadcast(&self, snapshot: &Arc<MarketSnapshot>) {
        let mut subs = self.subscribers.lock().await;

        subs.retain(|ch| match ch.try_send(Arc::clone(snapshot)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(seq = snapshot.seq, "subscriber lagging; snapshot dropped for it");
                true
            }
            Err(TrySendError::Closed(_)) => {
                debug!("subscriber gone; removing");
                false
            }
        });
    }

    /// Tick forever at `period`. The first tick happens one full period after
    /// start. Runs until the owning task is cancelled.
    pub async fn run<R: Rng + Send>(self: Arc<Self>, mut rng: R, period: Duration) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(every_ms = period.as_millis() as u64, "simulation loop started");

        loop {
            ticker.tick().await;
            self.step(&mut rng).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_records;
    use crate::sparkline::{TREND_MAX, TREND_MIN};
    use crate::trend_window::{TREND_LEN, TrendHistory};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tracing_test::traced_test;

    fn record_with_trend(trend: TrendHistory) -> AssetRecord {
        AssetRecord {
            id: "x".into(),
            symbol: "X".into(),
            name: "Example".into(),
            price: 1.0,
            change_24h: 0.0,
            market_cap: 1.0,
            volume_24h: 1.0,
            trend,
        }
    }

    #[test]
    fn advance_keeps_immutable_fields() {
        let mut rng = StdRng::seed_from_u64(5);
        let r = seed_records(&mut rng).remove(0);
        let next = advance(&r, &mut rng);

        assert_eq!(next.id, r.id);
        assert_eq!(next.symbol, r.symbol);
        assert_eq!(next.name, r.name);
        assert_eq!(next.market_cap, r.market_cap);
        assert_eq!(next.volume_24h, r.volume_24h);
    }

    #[test]
    fn advance_shifts_trend_window_by_one() {
        let mut rng = StdRng::seed_from_u64(5);
        let r = seed_records(&mut rng).remove(0);
        let next = advance(&r, &mut rng);

        let old: Vec<f64> = r.trend.iter().collect();
        let new: Vec<f64> = next.trend.iter().collect();

        assert_eq!(new.len(), TREND_LEN);
        assert_eq!(&new[..TREND_LEN - 1], &old[1..]);
        assert!((next.trend.latest() - r.trend.latest()).abs() <= TREND_STEP);
    }

    #[test]
    fn trend_is_not_clamped_after_generation() {
        // Sitting on the upper bound, roughly half of all ticks must escape it.
        let r = record_with_trend(TrendHistory::from_array([TREND_MAX; TREND_LEN]));
        let mut rng = StdRng::seed_from_u64(9);

        let escaped = (0..200)
            .map(|_| advance(&r, &mut rng).trend.latest())
            .any(|v| v > TREND_MAX);
        assert!(escaped);

        let r = record_with_trend(TrendHistory::from_array([TREND_MIN; TREND_LEN]));
        let escaped = (0..200)
            .map(|_| advance(&r, &mut rng).trend.latest())
            .any(|v| v < TREND_MIN);
        assert!(escaped);
    }

    #[test]
    fn tick_preserves_order_ids_and_bumps_seq() {
        let mut rng = StdRng::seed_from_u64(5);
        let s0 = MarketSnapshot::new(0, 0, seed_records(&mut rng));
        let s1 = tick(&s0, &mut rng, 42);

        assert_eq!(s1.seq, 1);
        assert_eq!(s1.ts_ms, 42);
        assert!(s0.ids().eq(s1.ids()));
    }

    #[test]
    fn tick_on_empty_collection_is_empty() {
        let s0 = MarketSnapshot::new(0, 0, Vec::new());
        let s1 = tick(&s0, &mut StdRng::seed_from_u64(1), 0);
        assert!(s1.is_empty());
        assert_eq!(s1.seq, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn step_publishes_and_broadcasts() {
        let mut rng = StdRng::seed_from_u64(5);
        let sim = Simulation::new(seed_records(&mut rng));
        let mut rx = sim.subscribe(4).await;

        let published = sim.step(&mut rng).await;

        assert_eq!(sim.store().current().await.seq, 1);
        let received = rx.recv().await.expect("snapshot broadcast");
        assert!(Arc::ptr_eq(&published, &received));
        assert!(logs_contain("simulation tick applied"));
    }

    #[tokio::test]
    async fn closed_subscribers_are_pruned() {
        let mut rng = StdRng::seed_from_u64(5);
        let sim = Simulation::new(seed_records(&mut rng));

        drop(sim.subscribe(1).await);
        let mut live = sim.subscribe(1).await;

        sim.step(&mut rng).await;

        assert_eq!(sim.subscribers.lock().await.len(), 1);
        assert_eq!(live.recv().await.map(|s| s.seq), Some(1));
    }

    #[tokio::test]
    async fn full_subscriber_does_not_block_tick() {
        let mut rng = StdRng::seed_from_u64(5);
        let sim = Simulation::new(seed_records(&mut rng));
        let mut rx = sim.subscribe(1).await;

        sim.step(&mut rng).await;
        sim.step(&mut rng).await;

        assert_eq!(sim.store().current().await.seq, 2);
        // Only the first snapshot fit in the channel.
        assert_eq!(rx.recv().await.map(|s| s.seq), Some(1));
        assert!(rx.try_recv().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]
        #[test]
        fn ticks_keep_price_positive_and_trend_full(seed in any::<u64>(), ticks in 1usize..200) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut snap = MarketSnapshot::new(0, 0, seed_records(&mut rng));

            for _ in 0..ticks {
                snap = tick(&snap, &mut rng, 0);
            }

            for r in &snap.records {
                prop_assert!(r.price > 0.0);
                prop_assert_eq!(r.trend.len(), TREND_LEN);
            }
        }
    }
}
