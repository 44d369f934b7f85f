//! Shared transient-effect state.
//!
//! Keyed by asset id (flash) or global (glitch, clock, block height), and
//! kept apart from the asset records so the data model stays free of
//! rendering concerns. Flags carry an expiry, so a reader never sees a flag
//! past its window even if the timer that clears it has not run yet.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use tokio::time::Instant;

use market::model::AssetId;

#[derive(Debug, Default)]
struct Inner {
    flashing: HashMap<AssetId, Instant>,
    glitch_until: Option<Instant>,
    clock: Option<DateTime<Local>>,
    block_height: u64,
}

/// Cheap-to-clone handle; all clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct EffectState {
    inner: Arc<RwLock<Inner>>,
}

/// Point-in-time copy of every effect flag, for one rendered frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectSnapshot {
    pub flashing: HashSet<AssetId>,
    pub glitched: bool,
    pub clock: Option<DateTime<Local>>,
    pub block_height: u64,
}

impl EffectSnapshot {
    pub fn is_flashing(&self, id: &AssetId) -> bool {
        self.flashing.contains(id)
    }
}

impl EffectState {
    pub fn new(initial_block_height: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                block_height: initial_block_height,
                ..Inner::default()
            })),
        }
    }

    // ---- flash ----

    pub fn is_flashing(&self, id: &AssetId) -> bool {
        let now = Instant::now();
        self.inner
            .read()
            .flashing
            .get(id)
            .is_some_and(|until| now < *until)
    }

    pub(crate) fn start_flash(&self, id: &AssetId, duration: Duration) {
        let until = Instant::now() + duration;
        self.inner.write().flashing.insert(id.clone(), until);
    }

    pub(crate) fn end_flash(&self, id: &AssetId) {
        self.inner.write().flashing.remove(id);
    }

    // ---- glitch ----

    pub fn is_glitched(&self) -> bool {
        let now = Instant::now();
        self.inner.read().glitch_until.is_some_and(|until| now < until)
    }

    pub(crate) fn start_glitch(&self, duration: Duration) {
        self.inner.write().glitch_until = Some(Instant::now() + duration);
    }

    pub(crate) fn end_glitch(&self) {
        self.inner.write().glitch_until = None;
    }

    // ---- status bar ----

    pub fn clock(&self) -> Option<DateTime<Local>> {
        self.inner.read().clock
    }

    pub(crate) fn set_clock(&self, now: DateTime<Local>) {
        self.inner.write().clock = Some(now);
    }

    pub fn block_height(&self) -> u64 {
        self.inner.read().block_height
    }

    /// Apply `f` to the block height and return the new value.
    pub(crate) fn update_block_height(&self, f: impl FnOnce(u64) -> u64) -> u64 {
        let mut g = self.inner.write();
        g.block_height = f(g.block_height);
        g.block_height
    }

    /// Copy all live flags at once (single lock acquisition).
    pub fn snapshot(&self) -> EffectSnapshot {
        let now = Instant::now();
        let g = self.inner.read();

        EffectSnapshot {
            flashing: g
                .flashing
                .iter()
                .filter(|(_, until)| now < **until)
                .map(|(id, _)| id.clone())
                .collect(),
            glitched: g.glitch_until.is_some_and(|until| now < until),
            clock: g.clock,
            block_height: g.block_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn flash_expires_even_without_explicit_end() {
        let s = EffectState::new(0);
        let id = AssetId::new("btc");

        s.start_flash(&id, Duration::from_millis(200));
        assert!(s.is_flashing(&id));
        assert!(s.snapshot().is_flashing(&id));

        advance(Duration::from_millis(200)).await;
        assert!(!s.is_flashing(&id));
        assert!(s.snapshot().flashing.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn end_flash_clears_immediately() {
        let s = EffectState::new(0);
        let id = AssetId::new("eth");

        s.start_flash(&id, Duration::from_secs(10));
        s.end_flash(&id);

        assert!(!s.is_flashing(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn glitch_window() {
        let s = EffectState::new(0);
        assert!(!s.is_glitched());

        s.start_glitch(Duration::from_millis(100));
        assert!(s.snapshot().glitched);

        advance(Duration::from_millis(50)).await;
        assert!(s.is_glitched());

        s.end_glitch();
        assert!(!s.is_glitched());
    }

    #[test]
    fn block_height_starts_at_initial_value() {
        let s = EffectState::new(842_156);
        assert_eq!(s.block_height(), 842_156);
        assert_eq!(s.update_block_height(|h| h + 1), 842_157);
        assert_eq!(s.snapshot().block_height, 842_157);
    }

    #[test]
    fn clones_share_state() {
        let a = EffectState::new(0);
        let b = a.clone();

        b.set_clock(Local::now());
        assert!(a.clock().is_some());
    }
}
