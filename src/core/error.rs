//! Error handling - Hierarchical, zero-cost errors

use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// flipdesk error hierarchy
#[derive(Debug, Error)]
pub enum Error {
    /// Trade rejected because the consecutive-loss pause is active
    #[error("Trading paused: {0} consecutive losses hit the configured limit")]
    TradingPaused(u32),

    /// Stake validation
    #[error("Trading: stake must be positive, got {0}")]
    InvalidStake(Decimal),

    /// Configuration errors
    #[error("Config: {0}")]
    Config(String),

    /// Snapshot storage errors
    #[error("Storage: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization
    #[error("Serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for the one rejection the caller is expected to recover from.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::TradingPaused(_))
    }
}
