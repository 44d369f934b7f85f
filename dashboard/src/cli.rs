use clap::{Parser, ValueEnum};

use market::view::SortKey;

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Mcap,
    Price,
    #[value(name = "24h")]
    Change,
}

#[derive(Debug, Parser)]
#[clap(name = "crypto-feed", version)]
pub struct Cli {
    /// Initial search term (name or symbol substring)
    #[clap(long)]
    pub search: Option<String>,

    /// Initial sort key
    #[clap(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Seed for reproducible runs
    #[clap(long)]
    pub seed: Option<u64>,

    /// Exit after this many simulation ticks
    #[clap(long)]
    pub ticks: Option<u64>,

    /// Emit JSON logs
    #[clap(long)]
    pub json_logs: bool,

    /// Print each frame as one JSON line instead of the text table
    #[clap(long)]
    pub json: bool,
}

/// Convert CLI sort selection → view sort key
pub(crate) fn cli_to_sort_key(s: SortArg) -> SortKey {
    match s {
        SortArg::Mcap => SortKey::MarketCap,
        SortArg::Price => SortKey::Price,
        SortArg::Change => SortKey::Change24h,
    }
}

impl Cli {
    /// Flags win over environment values.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(term) = &self.search {
            cfg.search_term = term.clone();
        }
        if let Some(sort) = self.sort {
            cfg.sort_key = cli_to_sort_key(sort);
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if self.json_logs {
            cfg.json_logs = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "crypto-feed",
            "--search",
            "sol",
            "--sort",
            "24h",
            "--seed",
            "7",
            "--ticks",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.search.as_deref(), Some("sol"));
        assert_eq!(cli.sort, Some(SortArg::Change));
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.ticks, Some(3));
        assert!(!cli.json);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["crypto-feed", "--sort", "price", "--json-logs"]).unwrap();
        let mut cfg = AppConfig {
            search_term: "eth".into(),
            seed: Some(1),
            ..AppConfig::default()
        };

        cli.apply(&mut cfg);

        assert_eq!(cfg.sort_key, SortKey::Price);
        assert_eq!(cfg.search_term, "eth", "unset flag keeps env value");
        assert_eq!(cfg.seed, Some(1));
        assert!(cfg.json_logs);
    }

    #[test]
    fn rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["crypto-feed", "--sort", "volume"]).is_err());
    }
}
