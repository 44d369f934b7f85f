//! Per-row flash timers.
//!
//! Every displayed row owns an independent timer whose period depends on the
//! row's rank in the current view (`base + rank * step`). On each elapse the
//! row flashes with a fixed probability. The flash is a rendering hint only:
//! it is temporally, not causally, related to price updates.
//!
//! [`FlashBoard::sync`] keeps the timer set aligned with the view:
//!   • new rows get a timer
//!   • rows whose rank changed get a restarted timer with the new period
//!   • rows that left the view lose their timer and flag

use std::collections::HashMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::{debug, trace};

use common::logger::annotate_span;
use common::task::ScopedTask;
use market::model::AssetId;

use crate::config::FlashConfig;
use crate::roll;
use crate::state::EffectState;

struct RowTimer {
    rank: usize,
    _task: ScopedTask,
}

pub struct FlashBoard {
    cfg: FlashConfig,
    state: EffectState,

    /// Seeds one independent generator per row timer.
    seeder: StdRng,

    rows: HashMap<AssetId, RowTimer>,
}

impl FlashBoard {
    pub fn new(cfg: FlashConfig, state: EffectState, seeder: StdRng) -> Self {
        Self {
            cfg,
            state,
            seeder,
            rows: HashMap::new(),
        }
    }

    /// Align timers with the displayed rows, given in rank order.
    pub fn sync<'a, I>(&mut self, ranked: I)
    where
        I: IntoIterator<Item = &'a AssetId>,
    {
        let mut next = HashMap::with_capacity(self.rows.len());

        for (rank, id) in ranked.into_iter().enumerate() {
            let timer = match self.rows.remove(id) {
                Some(existing) if existing.rank == rank => existing,
                // Dropping a replaced timer cancels it.
                _ => self.spawn_row(id.clone(), rank),
            };
            next.insert(id.clone(), timer);
        }

        for id in self.rows.keys() {
            self.state.end_flash(id);
            debug!(asset_id = %id, "row left view; flash timer cancelled");
        }

        // Anything still in `self.rows` is dropped (cancelled) here.
        self.rows = next;
    }

    /// Current rank of a row that has a timer.
    pub fn rank_of(&self, id: &AssetId) -> Option<usize> {
        self.rows.get(id).map(|r| r.rank)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cancel every row timer and clear all flash flags.
    pub fn clear(&mut self) {
        for id in self.rows.keys() {
            self.state.end_flash(id);
        }
        self.rows.clear();
    }

    fn spawn_row(&mut self, id: AssetId, rank: usize) -> RowTimer {
        let period = self.cfg.period_for_rank(rank);
        let rng = StdRng::from_rng(&mut self.seeder);

        debug!(asset_id = %id, rank, period_ms = period.as_millis() as u64, "flash timer (re)started");

        RowTimer {
            rank,
            _task: ScopedTask::spawn(
                "flash_row",
                run_row(id, period, self.cfg, self.state.clone(), rng),
            ),
        }
    }
}

impl Drop for FlashBoard {
    fn drop(&mut self) {
        self.clear();
    }
}

async fn run_row(
    id: AssetId,
    period: Duration,
    cfg: FlashConfig,
    state: EffectState,
    mut rng: StdRng,
) {
    annotate_span(id.as_str());

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if !roll(&mut rng, cfg.probability) {
            continue;
        }

        trace!(asset_id = %id, "row flash on");
        state.start_flash(&id, cfg.duration);
        sleep(cfg.duration).await;
        state.end_flash(&id);
    }
}
