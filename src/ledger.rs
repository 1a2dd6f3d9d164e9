//! Session Ledger - authoritative state machine for one practice session
//!
//! Owns balance, trade history, today's statistics, and the consecutive-loss
//! pause. Storage and display never reach into this module; they observe it
//! from the outside (see `desk`).

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::{
    DayStats, Error, Result, RiskSettings, SettingsUpdate, Trade, TradeIntent, TradeResult,
};
use crate::outcome::OutcomeSource;
use crate::store::{PersistedSettings, Snapshot};

/// Opening balance for a fresh practice session.
pub fn starting_balance() -> Decimal {
    Decimal::from(10_000)
}

/// Advisory threshold signals from `check_trading_limits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitAlert {
    ProfitTargetReached,
    LossLimitHit,
    TradingPaused,
}

impl std::fmt::Display for LimitAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitAlert::ProfitTargetReached => write!(f, "Daily profit target reached"),
            LimitAlert::LossLimitHit => write!(f, "Daily loss limit hit"),
            LimitAlert::TradingPaused => write!(f, "Trading paused after consecutive losses"),
        }
    }
}

/// One latch per threshold. A threshold fires when its condition becomes
/// true and re-arms only once the condition clears again.
#[derive(Debug, Clone, Copy, Default)]
struct AlertLatch {
    profit_target: bool,
    loss_limit: bool,
    paused: bool,
}

/// The session ledger. Single-threaded, explicitly constructed and passed;
/// there is no process-wide instance.
#[derive(Debug, Clone)]
pub struct SessionLedger {
    balance: Decimal,
    settings: RiskSettings,
    consecutive_losses: u32,
    paused: bool,
    today: DayStats,
    /// Newest first. Callers rely on index 0 being the latest trade.
    history: Vec<Trade>,
    latch: AlertLatch,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::with_settings(RiskSettings::default())
    }

    pub fn with_settings(settings: RiskSettings) -> Self {
        Self {
            balance: starting_balance(),
            settings,
            consecutive_losses: 0,
            paused: false,
            today: DayStats::default(),
            history: Vec::new(),
            latch: AlertLatch::default(),
        }
    }

    /// Restore a session from a persisted snapshot. The pause and the loss
    /// streak are session-local and always start cleared.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let settings = RiskSettings {
            daily_profit_target: snapshot.settings.daily_profit_target,
            daily_loss_limit: snapshot.settings.daily_loss_limit,
            max_consecutive_losses: snapshot.settings.max_consecutive_losses,
            ..RiskSettings::default()
        };

        Self {
            balance: snapshot.balance,
            settings,
            consecutive_losses: 0,
            paused: false,
            today: snapshot.today,
            history: snapshot.history,
            latch: AlertLatch::default(),
        }
    }

    /// Full serializable state for a persistence round-trip.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balance: self.balance,
            history: self.history.clone(),
            today: self.today.clone(),
            settings: PersistedSettings {
                daily_profit_target: self.settings.daily_profit_target,
                daily_loss_limit: self.settings.daily_loss_limit,
                max_consecutive_losses: self.settings.max_consecutive_losses,
            },
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn consecutive_losses(&self) -> u32 {
        self.consecutive_losses
    }

    pub fn today(&self) -> &DayStats {
        &self.today
    }

    pub fn history(&self) -> &[Trade] {
        &self.history
    }

    pub fn settings(&self) -> &RiskSettings {
        &self.settings
    }

    /// Place a simulated trade. Rejected without any state change while the
    /// consecutive-loss pause is active.
    pub fn place_trade(
        &mut self,
        intent: &TradeIntent,
        outcome: &mut dyn OutcomeSource,
    ) -> Result<Trade> {
        if self.paused {
            return Err(Error::TradingPaused(self.consecutive_losses));
        }
        if intent.amount <= Decimal::ZERO {
            return Err(Error::InvalidStake(intent.amount));
        }

        let is_win = outcome.draw();
        let (result, payout) = if is_win {
            (TradeResult::Win, intent.amount * self.settings.payout_multiplier)
        } else {
            (TradeResult::Loss, -intent.amount)
        };

        let trade = Trade {
            id: Uuid::new_v4(),
            asset: intent.asset.clone(),
            direction: intent.direction,
            amount: intent.amount,
            expiry: intent.expiry.clone(),
            result,
            payout,
            timestamp: Utc::now(),
        };

        // One logical transaction: balance, day stats, streak, history.
        self.balance += payout;
        self.today.record(result, payout);
        match result {
            TradeResult::Win => self.consecutive_losses = 0,
            TradeResult::Loss => {
                self.consecutive_losses += 1;
                // Pause is set here and nowhere else; only the daily reset
                // clears it.
                if self.consecutive_losses >= self.settings.max_consecutive_losses {
                    self.paused = true;
                }
            }
        }
        self.history.insert(0, trade.clone());

        tracing::debug!(
            "{} {} {} @ {} settled {}: payout {}",
            trade.id,
            trade.direction,
            trade.asset,
            trade.amount,
            trade.result,
            trade.payout
        );

        Ok(trade)
    }

    /// Zero today's statistics and clear the pause. Balance and history are
    /// untouched.
    pub fn reset_daily_stats(&mut self) {
        self.today = DayStats::default();
        self.paused = false;
        self.consecutive_losses = 0;
    }

    /// Lenient settings overwrite; bad fields fall back to defaults.
    pub fn apply_settings(&mut self, update: &SettingsUpdate) {
        self.settings.apply(update);
    }

    /// Advisory threshold check, run after every mutation. Edge-triggered:
    /// each alert fires once per crossing and re-arms when its condition
    /// clears (e.g. after the daily reset).
    pub fn check_trading_limits(&mut self) -> Vec<LimitAlert> {
        let mut fired = Vec::new();

        let profit_hit = self.today.profit >= self.settings.daily_profit_target;
        if profit_hit && !self.latch.profit_target {
            fired.push(LimitAlert::ProfitTargetReached);
        }
        self.latch.profit_target = profit_hit;

        let loss_hit = self.today.profit <= self.settings.daily_loss_limit;
        if loss_hit && !self.latch.loss_limit {
            fired.push(LimitAlert::LossLimitHit);
        }
        self.latch.loss_limit = loss_hit;

        let pause_hit = self.consecutive_losses >= self.settings.max_consecutive_losses;
        if pause_hit && !self.latch.paused {
            fired.push(LimitAlert::TradingPaused);
        }
        self.latch.paused = pause_hit;

        fired
    }
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new()
    }
}
