use thiserror::Error;

use market::error::ParseSortKeyError;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown command: {0:?} (try: search <term>, clear, sort <mcap|price|24h>, quit)")]
    UnknownCommand(String),

    #[error(transparent)]
    InvalidSortKey(#[from] ParseSortKeyError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
