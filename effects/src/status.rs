//! Status bar tickers: wall clock and simulated block height.

use chrono::Local;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use common::task::ScopedTask;

use crate::config::StatusConfig;
use crate::roll;
use crate::state::EffectState;

/// Next block height: `height + 1` with probability `p`, else unchanged.
pub fn next_block_height<R: Rng + ?Sized>(height: u64, rng: &mut R, p: f64) -> u64 {
    height + u64::from(roll(rng, p))
}

/// Refresh the displayed wall clock now and then every `clock_period`.
pub fn spawn_clock(cfg: StatusConfig, state: EffectState) -> ScopedTask {
    state.set_clock(Local::now());

    ScopedTask::every("clock", cfg.clock_period, move || {
        state.set_clock(Local::now());
    })
}

/// Advance the block height every `block_period`, by at most one.
pub fn spawn_block_height(cfg: StatusConfig, state: EffectState, mut rng: StdRng) -> ScopedTask {
    ScopedTask::every("block_height", cfg.block_period, move || {
        let before = state.block_height();
        let after = state.update_block_height(|h| next_block_height(h, &mut rng, cfg.block_probability));

        if after != before {
            debug!(block_height = after, "new block");
        }
    })
}
