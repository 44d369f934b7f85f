use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSortKeyError {
    #[error("unknown sort key {0:?} (expected one of: mcap, price, 24h)")]
    Unknown(String),
}
