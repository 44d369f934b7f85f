use std::time::Duration;

/// Per-row flash timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashConfig {
    /// Period of the top-ranked row.
    pub base_period: Duration,

    /// Extra period per rank below the top.
    pub rank_step: Duration,

    /// Chance that a period elapse starts a flash.
    pub probability: f64,

    /// How long a flash stays on.
    pub duration: Duration,
}

impl FlashConfig {
    /// `base_period + rank * rank_step`
    pub fn period_for_rank(&self, rank: usize) -> Duration {
        self.base_period + self.rank_step * rank as u32
    }
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            base_period: Duration::from_millis(2_000),
            rank_step: Duration::from_millis(500),
            probability: 0.3,
            duration: Duration::from_millis(200),
        }
    }
}

/// Global title glitch timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlitchConfig {
    pub period: Duration,
    pub probability: f64,
    pub duration: Duration,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(500),
            probability: 0.05,
            duration: Duration::from_millis(100),
        }
    }
}

/// Status bar: wall clock and simulated block height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusConfig {
    pub clock_period: Duration,
    pub block_period: Duration,

    /// Chance that a block period produces a new block.
    pub block_probability: f64,

    pub initial_block_height: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            clock_period: Duration::from_millis(1_000),
            block_period: Duration::from_millis(3_000),
            block_probability: 0.3,
            initial_block_height: 842_156,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectConfig {
    pub flash: FlashConfig,
    pub glitch: GlitchConfig,
    pub status: StatusConfig,
}
