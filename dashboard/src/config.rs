use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;

use effects::config::EffectConfig;
use market::error::ParseSortKeyError;
use market::simulation::DEFAULT_TICK_INTERVAL;
use market::view::SortKey;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid number: {source}")]
    InvalidNumber {
        var: &'static str,
        value: String,
        source: ParseIntError,
    },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },

    #[error("FEED_SORT: {0}")]
    InvalidSortKey(#[from] ParseSortKeyError),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    // =========================
    // Simulation
    // =========================
    /// Cadence of the simulation tick.
    pub tick_interval: Duration,

    /// Seed for every random generator in the session.
    ///
    /// `None` seeds from OS entropy, so each run differs. A fixed seed makes
    /// the initial trends and every subsequent tick reproducible.
    pub seed: Option<u64>,

    /// Buffer of each snapshot subscriber. A subscriber that falls this far
    /// behind starts missing snapshots instead of stalling the tick.
    pub subscriber_capacity: usize,

    // =========================
    // Presentation
    // =========================
    /// How often the frame is redrawn even without a new tick, so that
    /// clock, flash and glitch changes show up.
    pub render_interval: Duration,

    /// Initial search term.
    pub search_term: String,

    /// Initial sort key.
    pub sort_key: SortKey,

    /// Emit JSON logs instead of human-readable ones.
    pub json_logs: bool,

    /// Flash / glitch / status timers.
    pub effects: EffectConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
            subscriber_capacity: 16,
            render_interval: Duration::from_millis(1_000),
            search_term: String::new(),
            sort_key: SortKey::default(),
            json_logs: false,
            effects: EffectConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(ms) = parse_u64(&lookup, "FEED_TICK_MS")? {
            cfg.tick_interval = non_zero_ms("FEED_TICK_MS", ms)?;
        }
        if let Some(ms) = parse_u64(&lookup, "FEED_RENDER_MS")? {
            cfg.render_interval = non_zero_ms("FEED_RENDER_MS", ms)?;
        }
        if let Some(cap) = parse_u64(&lookup, "FEED_SUBSCRIBER_CAPACITY")? {
            if cap == 0 {
                return Err(ConfigError::Zero {
                    var: "FEED_SUBSCRIBER_CAPACITY",
                });
            }
            cfg.subscriber_capacity = cap as usize;
        }

        cfg.seed = parse_u64(&lookup, "FEED_SEED")?;

        if let Some(term) = lookup("FEED_SEARCH") {
            cfg.search_term = term;
        }
        if let Some(key) = lookup("FEED_SORT") {
            cfg.sort_key = key.parse()?;
        }

        cfg.json_logs = lookup("APP_ENV").is_some_and(|env| env == "production");

        Ok(cfg)
    }
}

fn parse_u64<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|source| ConfigError::InvalidNumber {
            var,
            value: raw,
            source,
        })
}

fn non_zero_ms(var: &'static str, ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::Zero { var });
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(|_| None).unwrap();

        assert_eq!(cfg.tick_interval, Duration::from_millis(2_000));
        assert_eq!(cfg.render_interval, Duration::from_millis(1_000));
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.sort_key, SortKey::MarketCap);
        assert!(cfg.search_term.is_empty());
        assert!(!cfg.json_logs);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("FEED_TICK_MS", "500"),
            ("FEED_SEED", "42"),
            ("FEED_SEARCH", "sol"),
            ("FEED_SORT", "24h"),
            ("FEED_SUBSCRIBER_CAPACITY", "4"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();

        assert_eq!(cfg.tick_interval, Duration::from_millis(500));
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.search_term, "sol");
        assert_eq!(cfg.sort_key, SortKey::Change24h);
        assert_eq!(cfg.subscriber_capacity, 4);
        assert!(cfg.json_logs);
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = AppConfig::from_lookup(lookup_from(&[("FEED_TICK_MS", "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: "FEED_TICK_MS", .. }));
    }

    #[test]
    fn rejects_zero_interval() {
        let err = AppConfig::from_lookup(lookup_from(&[("FEED_RENDER_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Zero { var: "FEED_RENDER_MS" }));
    }

    #[test]
    fn rejects_unknown_sort_key() {
        let err = AppConfig::from_lookup(lookup_from(&[("FEED_SORT", "volume")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSortKey(_)));
        assert!(err.to_string().contains("volume"));
    }
}
