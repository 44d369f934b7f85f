//! Transient, purely cosmetic dashboard state.
//!
//! Controllers here never read or write asset records. Each one is an
//! independent timer owned by a [`common::task::ScopedTask`] and only
//! mutates the shared [`state::EffectState`] slice that renderers observe.

pub mod config;
pub mod flash;
pub mod glitch;
pub mod state;
pub mod status;

use rand::Rng;

/// True with probability `p` (values outside `[0, 1]` saturate).
pub fn roll<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn roll_extremes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!((0..1_000).all(|_| !roll(&mut rng, 0.0)));
        assert!((0..1_000).all(|_| roll(&mut rng, 1.0)));
    }

    #[test]
    fn roll_rate_is_close_to_p() {
        let mut rng = StdRng::seed_from_u64(0);
        let hits = (0..10_000).filter(|_| roll(&mut rng, 0.3)).count();
        assert!((2_700..3_300).contains(&hits), "hits = {hits}");
    }
}
