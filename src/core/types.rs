//! Core types - Strong typing for safety

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Call,
    Put,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Call => write!(f, "CALL"),
            Direction::Put => write!(f, "PUT"),
        }
    }
}

/// Settled trade outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
}

impl std::fmt::Display for TradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeResult::Win => write!(f, "WIN"),
            TradeResult::Loss => write!(f, "LOSS"),
        }
    }
}

/// Settled trade record. Immutable once created; only the wholesale
/// daily reset touches the collections it lives in, and even that leaves
/// history alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub asset: String,
    pub direction: Direction,
    pub amount: Decimal,
    pub expiry: String,
    pub result: TradeResult,
    pub payout: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// What the caller wants to trade, before the outcome is drawn.
#[derive(Debug, Clone)]
pub struct TradeIntent {
    pub asset: String,
    pub direction: Direction,
    pub amount: Decimal,
    pub expiry: String,
}

impl TradeIntent {
    pub fn new(
        asset: impl Into<String>,
        direction: Direction,
        amount: Decimal,
        expiry: impl Into<String>,
    ) -> Self {
        Self {
            asset: asset.into(),
            direction,
            amount,
            expiry: expiry.into(),
        }
    }
}

/// Today's running statistics. Invariant: `trades == wins + losses`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayStats {
    pub profit: Decimal,
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
}

impl DayStats {
    pub fn record(&mut self, result: TradeResult, payout: Decimal) {
        self.profit += payout;
        self.trades += 1;
        match result {
            TradeResult::Win => self.wins += 1,
            TradeResult::Loss => self.losses += 1,
        }
    }
}
