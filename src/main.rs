use tracing_subscriber::{EnvFilter, fmt};

use flipdesk::TradingDesk;
use flipdesk::core::Direction;
use flipdesk::core::config::AppConfig;
use flipdesk::outcome::CoinFlip;
use flipdesk::store::JsonFileStore;
use flipdesk::view::ConsolePresenter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flipdesk=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    tracing::info!("🪙 flipdesk starting (binary-options practice session)...");

    let config = AppConfig::load_default();
    let store = JsonFileStore::new(&config.session.storage_path);
    tracing::info!("💾 Session file: {}", store.path().display());

    // A restored snapshot keeps its persisted settings; config.risk only
    // seeds a fresh session.
    let mut desk = TradingDesk::open_with_settings(store, ConsolePresenter, config.risk)?;
    desk.refresh();

    let mut coin = CoinFlip::default();
    let assets = ["EUR/USD", "GBP/JPY", "BTC/USD"];

    for i in 0..config.session.demo_trades {
        let asset = assets[(i as usize) % assets.len()];
        let direction = if i % 2 == 0 { Direction::Call } else { Direction::Put };

        match desk.place_with_default_stake(asset, direction, "1m", &mut coin) {
            Ok(trade) => {
                tracing::info!(
                    "🎯 {} {} settled {} for {}",
                    trade.direction,
                    trade.asset,
                    trade.result,
                    trade.payout
                );
            }
            Err(e) if e.is_rejection() => {
                tracing::warn!("Session paused after {} trades; stopping the demo run", i);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    desk.refresh();
    tracing::info!("👋 Session saved. Run again to continue, or delete the session file to start over.");

    Ok(())
}
