//! Global title glitch: a short-lived, purely decorative artifact.

use rand::rngs::StdRng;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::trace;

use common::task::ScopedTask;

use crate::config::GlitchConfig;
use crate::roll;
use crate::state::EffectState;

/// Start the glitch timer. Dropping the returned handle stops it.
pub fn spawn_glitch(cfg: GlitchConfig, state: EffectState, mut rng: StdRng) -> ScopedTask {
    ScopedTask::spawn("glitch", async move {
        let mut ticker = interval_at(Instant::now() + cfg.period, cfg.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if !roll(&mut rng, cfg.probability) {
                continue;
            }

            trace!("glitch on");
            state.start_glitch(cfg.duration);
            sleep(cfg.duration).await;
            state.end_glitch();
        }
    })
}
