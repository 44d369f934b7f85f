//! One dashboard session: the simulation, every effect timer and the user's
//! view state, wired together.
//!
//! The session owns every [`ScopedTask`] it starts. [`DashboardSession::shutdown`]
//! (or dropping the session) cancels all of them.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::sync::mpsc::Receiver;
use tracing::{Span, info};

use common::logger::{TraceId, root_span};
use common::task::ScopedTask;
use effects::flash::FlashBoard;
use effects::glitch::spawn_glitch;
use effects::state::EffectState;
use effects::status::{spawn_block_height, spawn_clock};
use market::aggregate::{MarketTotals, aggregate};
use market::catalog::seed_records;
use market::format::format_clock;
use market::model::AssetRecord;
use market::simulation::Simulation;
use market::store::{MarketSnapshot, MarketStore};
use market::view::{SortKey, ViewState};

use crate::command::Command;
use crate::config::AppConfig;

/// One displayed row.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRow {
    /// 1-based position in the current view.
    pub rank: usize,
    pub flashing: bool,

    #[serde(flatten)]
    pub record: AssetRecord,
}

/// Everything a renderer needs for one redraw.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub seq: u64,
    pub view: ViewState,
    pub rows: Vec<FrameRow>,

    /// Over the full collection, not the filtered rows.
    pub totals: MarketTotals,

    pub glitched: bool,
    pub block_height: u64,
    pub clock: Option<String>,
    pub tick_interval_ms: u64,
}

pub struct DashboardSession {
    trace_id: TraceId,
    span: Span,
    cfg: AppConfig,

    simulation: Arc<Simulation>,
    store: MarketStore,
    view_state: ViewState,

    effects: EffectState,
    flash: FlashBoard,

    /// Simulation, glitch, clock and block-height timers.
    timers: Vec<ScopedTask>,
}

impl DashboardSession {
    /// Seed the catalog and start every timer. Must be called from within a
    /// tokio runtime.
    pub fn start(cfg: AppConfig) -> Self {
        let trace_id = TraceId::default();
        let span = root_span("dashboard", &trace_id);
        let entered = span.enter();

        let mut master = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let records = seed_records(&mut master);
        let simulation = Simulation::new(records);
        let store = simulation.store();

        let effects = EffectState::new(cfg.effects.status.initial_block_height);
        let flash = FlashBoard::new(
            cfg.effects.flash,
            effects.clone(),
            StdRng::from_rng(&mut master),
        );

        let timers = vec![
            ScopedTask::spawn(
                "simulation",
                Arc::clone(&simulation).run(StdRng::from_rng(&mut master), cfg.tick_interval),
            ),
            spawn_glitch(
                cfg.effects.glitch,
                effects.clone(),
                StdRng::from_rng(&mut master),
            ),
            spawn_clock(cfg.effects.status, effects.clone()),
            spawn_block_height(
                cfg.effects.status,
                effects.clone(),
                StdRng::from_rng(&mut master),
            ),
        ];

        info!(
            seed = ?cfg.seed,
            tick_ms = cfg.tick_interval.as_millis() as u64,
            search = %cfg.search_term,
            sort = %cfg.sort_key,
            "dashboard session started"
        );

        let view_state = ViewState::new(cfg.search_term.clone(), cfg.sort_key);

        drop(entered);

        Self {
            trace_id,
            span,
            cfg,
            simulation,
            store,
            view_state,
            effects,
            flash,
            timers,
        }
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Receive every snapshot published from now on.
    pub async fn subscribe(&self) -> Receiver<Arc<MarketSnapshot>> {
        self.simulation.subscribe(self.cfg.subscriber_capacity).await
    }

    pub fn store(&self) -> MarketStore {
        self.store.clone()
    }

    pub fn effects(&self) -> &EffectState {
        &self.effects
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.view_state.search_term = term.into();
        self.span.in_scope(|| {
            info!(search = %self.view_state.search_term, "search term changed");
        });
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.view_state.sort_key = key;
        self.span.in_scope(|| info!(sort = %key, "sort key changed"));
    }

    /// Apply a view command. Returns `false` when the command asks to quit.
    pub fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Search(term) => self.set_search_term(term),
            Command::Clear => self.set_search_term(String::new()),
            Command::Sort(key) => self.set_sort_key(key),
            Command::Quit => return false,
        }
        true
    }

    /// Build the current frame and realign the per-row flash timers with the
    /// displayed rows.
    pub async fn frame(&mut self) -> Frame {
        let snapshot = self.store.current().await;
        let rows = self.view_state.apply(&snapshot.records);

        {
            let _enter = self.span.enter();
            self.flash.sync(rows.iter().map(|r| &r.id));
        }

        let fx = self.effects.snapshot();

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, record)| FrameRow {
                rank: i + 1,
                flashing: fx.is_flashing(&record.id),
                record,
            })
            .collect();

        Frame {
            seq: snapshot.seq,
            view: self.view_state.clone(),
            rows,
            totals: aggregate(&snapshot.records),
            glitched: fx.glitched,
            block_height: fx.block_height,
            clock: fx.clock.as_ref().map(format_clock),
            tick_interval_ms: self.cfg.tick_interval.as_millis() as u64,
        }
    }

    /// Number of session-wide timers still running (row flash timers excluded).
    pub fn active_timers(&self) -> usize {
        self.timers.iter().filter(|t| !t.is_finished()).count()
    }

    /// Number of rows that currently own a flash timer.
    pub fn flash_rows(&self) -> usize {
        self.flash.len()
    }

    /// Cancel every timer owned by the session.
    pub fn shutdown(mut self) {
        let _enter = self.span.enter();

        self.flash.clear();
        for task in self.timers.drain(..) {
            task.cancel();
        }

        info!("dashboard session stopped");
    }
}
