//! Presentation adapter - display math and the notification surface
//!
//! `LedgerView` is the fully computed render model; presenters only format.
//! Notification auto-dismiss timing belongs to the host surface and is not
//! modeled here.

use chrono::Local;
use rust_decimal::Decimal;

use crate::core::Trade;
use crate::ledger::SessionLedger;

/// Only the newest trades are presented; storage keeps the rest.
pub const RECENT_TRADES_SHOWN: usize = 5;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// Display surface for ledger state and transient messages.
pub trait Presenter {
    fn render(&mut self, view: &LedgerView);
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Computed display state.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerView {
    /// Balance, 2 decimal places
    pub balance: Decimal,
    /// Today's profit, 2 decimal places
    pub today_profit: Decimal,
    /// wins / trades * 100, 1 decimal place, 0 with no trades
    pub win_rate: Decimal,
    pub trades_today: u32,
    /// default stake / balance * 100, 1 decimal place, 0 on empty balance
    pub risk_exposure: Decimal,
    /// Newest first, at most [`RECENT_TRADES_SHOWN`]
    pub recent: Vec<Trade>,
}

impl LedgerView {
    pub fn of(ledger: &SessionLedger) -> Self {
        let today = ledger.today();
        let balance = ledger.balance();

        let win_rate = if today.trades == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(today.wins) * Decimal::ONE_HUNDRED / Decimal::from(today.trades))
                .round_dp(1)
        };
        let risk_exposure = if balance.is_zero() {
            Decimal::ZERO
        } else {
            (ledger.settings().default_trade_amount * Decimal::ONE_HUNDRED / balance).round_dp(1)
        };

        Self {
            balance: balance.round_dp(2),
            today_profit: today.profit.round_dp(2),
            win_rate,
            trades_today: today.trades,
            risk_exposure,
            recent: ledger
                .history()
                .iter()
                .take(RECENT_TRADES_SHOWN)
                .cloned()
                .collect(),
        }
    }
}

/// Renders through `tracing`; the demo binary's display surface.
#[derive(Debug, Clone, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn render(&mut self, view: &LedgerView) {
        tracing::info!(
            "💰 Balance {} | today {} over {} trades | win rate {}% | exposure {}%",
            view.balance,
            view.today_profit,
            view.trades_today,
            view.win_rate,
            view.risk_exposure
        );
        for trade in &view.recent {
            tracing::info!(
                "   {} {} {} {} → {} ({})",
                trade.timestamp.with_timezone(&Local).format("%H:%M:%S"),
                trade.asset,
                trade.direction,
                trade.amount,
                trade.result,
                trade.payout
            );
        }
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!("{}", message),
            Severity::Success => tracing::info!("✅ {}", message),
            Severity::Warning => tracing::warn!("{}", message),
            Severity::Danger => tracing::error!("{}", message),
        }
    }
}

/// Headless presenter; drops everything.
#[derive(Debug, Clone, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _view: &LedgerView) {}
    fn notify(&mut self, _message: &str, _severity: Severity) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Direction, TradeIntent};
    use crate::outcome::Scripted;

    fn stake(amount: i64) -> TradeIntent {
        TradeIntent::new("EUR/USD", Direction::Call, Decimal::from(amount), "1m")
    }

    #[test]
    fn test_fresh_session_view() {
        let view = LedgerView::of(&SessionLedger::new());

        assert_eq!(view.balance, Decimal::from(10_000));
        assert_eq!(view.win_rate, Decimal::ZERO);
        assert_eq!(view.trades_today, 0);
        // 50 / 10000 * 100 = 0.5%
        assert_eq!(view.risk_exposure, Decimal::new(5, 1));
        assert!(view.recent.is_empty());
    }

    #[test]
    fn test_win_rate_rounds_to_one_decimal() {
        let mut ledger = SessionLedger::new();
        let mut source = Scripted::new([true, false, false]);
        for _ in 0..3 {
            ledger.place_trade(&stake(10), &mut source).unwrap();
        }

        // 1 of 3 → 33.3%
        assert_eq!(LedgerView::of(&ledger).win_rate, Decimal::new(333, 1));
    }

    #[test]
    fn test_recent_is_capped_at_five() {
        let mut ledger = SessionLedger::new();
        let mut source = Scripted::new([true; 8]);
        let mut last = None;
        for _ in 0..8 {
            last = Some(ledger.place_trade(&stake(10), &mut source).unwrap());
        }

        let view = LedgerView::of(&ledger);
        assert_eq!(view.recent.len(), RECENT_TRADES_SHOWN);
        assert_eq!(view.recent[0], last.unwrap());
        assert_eq!(ledger.history().len(), 8);
    }

    #[test]
    fn test_profit_rounded_to_cents() {
        let mut ledger = SessionLedger::new();
        let mut source = Scripted::new([true]);
        // 12.34 * 1.8 = 22.212 → shown as 22.21
        ledger
            .place_trade(&stake_amount(Decimal::new(1234, 2)), &mut source)
            .unwrap();

        let view = LedgerView::of(&ledger);
        assert_eq!(view.today_profit, Decimal::new(2221, 2));
    }

    fn stake_amount(amount: Decimal) -> TradeIntent {
        TradeIntent::new("EUR/USD", Direction::Call, amount, "1m")
    }
}
