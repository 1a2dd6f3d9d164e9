//! Trading desk - wires the session ledger to storage and display
//!
//! The ledger commits first; the snapshot save, the render, and the
//! threshold notifications observe the committed state afterwards. A
//! rejected trade reaches none of them.

use crate::core::{Direction, Result, RiskSettings, SettingsUpdate, Trade, TradeIntent};
use crate::ledger::{LimitAlert, SessionLedger};
use crate::outcome::OutcomeSource;
use crate::store::SnapshotStore;
use crate::view::{LedgerView, Presenter, Severity};

pub struct TradingDesk<S, P> {
    ledger: SessionLedger,
    store: S,
    presenter: P,
}

impl<S: SnapshotStore, P: Presenter> TradingDesk<S, P> {
    /// Open a session: restore the stored snapshot, or start fresh with
    /// default settings when the store is empty.
    pub fn open(store: S, presenter: P) -> Result<Self> {
        Self::open_with_settings(store, presenter, RiskSettings::default())
    }

    /// Like [`open`](Self::open), but a fresh session starts from the given
    /// settings. A restored snapshot keeps its persisted settings.
    pub fn open_with_settings(store: S, presenter: P, settings: RiskSettings) -> Result<Self> {
        let ledger = match store.load()? {
            Some(snapshot) => {
                tracing::info!("📋 Restored session snapshot");
                SessionLedger::from_snapshot(snapshot)
            }
            None => SessionLedger::with_settings(settings),
        };
        Ok(Self {
            ledger,
            store,
            presenter,
        })
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn view(&self) -> LedgerView {
        LedgerView::of(&self.ledger)
    }

    /// Place a trade and run the post-commit side effects.
    pub fn place_trade(
        &mut self,
        intent: &TradeIntent,
        outcome: &mut dyn OutcomeSource,
    ) -> Result<Trade> {
        let trade = match self.ledger.place_trade(intent, outcome) {
            Ok(trade) => trade,
            Err(e) => {
                if e.is_rejection() {
                    self.presenter
                        .notify("Trading paused: reset daily stats to resume", Severity::Warning);
                }
                return Err(e);
            }
        };

        self.store.save(&self.ledger.snapshot())?;
        self.presenter.render(&LedgerView::of(&self.ledger));
        self.emit_limit_alerts();
        Ok(trade)
    }

    /// Place a trade at the configured default stake.
    pub fn place_with_default_stake(
        &mut self,
        asset: &str,
        direction: Direction,
        expiry: &str,
        outcome: &mut dyn OutcomeSource,
    ) -> Result<Trade> {
        let intent = TradeIntent::new(
            asset,
            direction,
            self.ledger.settings().default_trade_amount,
            expiry,
        );
        self.place_trade(&intent, outcome)
    }

    /// Daily reset: clears today's stats and the pause, then saves and
    /// refreshes. Re-arms the threshold alerts.
    pub fn reset_daily_stats(&mut self) -> Result<()> {
        self.ledger.reset_daily_stats();
        self.store.save(&self.ledger.snapshot())?;
        self.presenter.render(&LedgerView::of(&self.ledger));
        self.emit_limit_alerts();
        Ok(())
    }

    /// Lenient settings update, saved immediately.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> Result<()> {
        self.ledger.apply_settings(update);
        self.store.save(&self.ledger.snapshot())?;
        Ok(())
    }

    /// Re-render the current state on demand.
    pub fn refresh(&mut self) {
        self.presenter.render(&LedgerView::of(&self.ledger));
    }

    fn emit_limit_alerts(&mut self) {
        for alert in self.ledger.check_trading_limits() {
            let severity = match alert {
                LimitAlert::ProfitTargetReached => Severity::Success,
                LimitAlert::LossLimitHit => Severity::Danger,
                LimitAlert::TradingPaused => Severity::Warning,
            };
            self.presenter.notify(&alert.to_string(), severity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Scripted;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    /// Captures renders and notifications for assertions.
    #[derive(Debug, Clone, Default)]
    struct RecordingPresenter {
        renders: u32,
        notes: Vec<(String, Severity)>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, _view: &LedgerView) {
            self.renders += 1;
        }
        fn notify(&mut self, message: &str, severity: Severity) {
            self.notes.push((message.to_string(), severity));
        }
    }

    fn intent(amount: i64) -> TradeIntent {
        TradeIntent::new("EUR/USD", Direction::Call, Decimal::from(amount), "1m")
    }

    fn open_desk() -> TradingDesk<MemoryStore, RecordingPresenter> {
        TradingDesk::open(MemoryStore::new(), RecordingPresenter::default()).unwrap()
    }

    #[test]
    fn test_trade_saves_and_renders() {
        let mut desk = open_desk();
        let mut source = Scripted::new([true]);

        desk.place_trade(&intent(50), &mut source).unwrap();

        assert!(!desk.store().is_empty());
        assert_eq!(desk.presenter().renders, 1);
        assert!(desk.presenter().notes.is_empty());
    }

    #[test]
    fn test_rejection_notifies_without_side_effects() {
        let mut desk = open_desk();
        let mut source = Scripted::new([false, false, false]);
        for _ in 0..3 {
            desk.place_trade(&intent(50), &mut source).unwrap();
        }
        let renders_before = desk.presenter().renders;

        let mut untouched = Scripted::new([true]);
        assert!(desk.place_trade(&intent(50), &mut untouched).is_err());

        assert_eq!(desk.presenter().renders, renders_before);
        let (message, severity) = desk.presenter().notes.last().unwrap();
        assert!(message.starts_with("Trading paused"));
        assert_eq!(*severity, Severity::Warning);
    }

    #[test]
    fn test_pause_alert_fires_once_per_crossing() {
        let mut desk = open_desk();
        let mut source = Scripted::new([false, false, false]);
        for _ in 0..3 {
            desk.place_trade(&intent(10), &mut source).unwrap();
        }

        let pause_alerts = desk
            .presenter()
            .notes
            .iter()
            .filter(|(_, s)| *s == Severity::Warning)
            .count();
        assert_eq!(pause_alerts, 1);
    }

    #[test]
    fn test_profit_target_alert_is_success() {
        let mut desk = open_desk();
        let mut source = Scripted::new([true]);

        desk.place_trade(&intent(300), &mut source).unwrap();

        assert_eq!(
            desk.presenter().notes,
            vec![(
                "Daily profit target reached".to_string(),
                Severity::Success
            )]
        );
    }

    #[test]
    fn test_session_survives_reopen() {
        let mut desk = open_desk();
        let mut source = Scripted::new([false]);
        desk.place_trade(&intent(100), &mut source).unwrap();
        let balance = desk.ledger().balance();

        let store = desk.store().clone();
        let reopened = TradingDesk::open(store, RecordingPresenter::default()).unwrap();

        assert_eq!(reopened.ledger().balance(), balance);
        assert_eq!(reopened.ledger().history().len(), 1);
        assert!(!reopened.ledger().is_paused());
    }

    #[test]
    fn test_reset_saves_and_renders() {
        let mut desk = open_desk();
        let mut source = Scripted::new([false, false, false]);
        for _ in 0..3 {
            desk.place_trade(&intent(10), &mut source).unwrap();
        }

        desk.reset_daily_stats().unwrap();

        assert!(!desk.ledger().is_paused());
        let stored = desk.store().load().unwrap().unwrap();
        assert_eq!(stored.today.trades, 0);
        assert_eq!(stored.history.len(), 3);
    }

    #[test]
    fn test_default_stake_follows_settings() {
        let mut desk = open_desk();
        desk.update_settings(&SettingsUpdate {
            default_trade_amount: Some("25".to_string()),
            ..Default::default()
        })
        .unwrap();

        let mut source = Scripted::new([false]);
        let trade = desk
            .place_with_default_stake("EUR/USD", Direction::Put, "1m", &mut source)
            .unwrap();

        assert_eq!(trade.amount, Decimal::from(25));
    }
}
