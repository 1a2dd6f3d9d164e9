//! Settings and configuration - Type-safe, validated, lenient on bad input
//!
//! Risk settings arrive from two places: the optional `flipdesk.toml` read at
//! startup, and free-form text updates from the caller at runtime. Both fall
//! back to the documented defaults rather than failing.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::{Error, Result};

fn default_trade_amount() -> Decimal {
    Decimal::from(50)
}
fn default_profit_target() -> Decimal {
    Decimal::from(500)
}
fn default_loss_limit() -> Decimal {
    Decimal::from(-300)
}
fn default_max_losses() -> u32 {
    3
}
fn default_payout_multiplier() -> Decimal {
    // 1.8x stake on a winning flip
    Decimal::new(18, 1)
}

/// Session risk settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiskSettings {
    /// Stake used when the caller does not size a trade explicitly
    #[serde(default = "default_trade_amount")]
    pub default_trade_amount: Decimal,
    /// Daily profit threshold for the advisory signal
    #[serde(default = "default_profit_target")]
    pub daily_profit_target: Decimal,
    /// Daily loss threshold (negative) for the advisory signal
    #[serde(default = "default_loss_limit")]
    pub daily_loss_limit: Decimal,
    /// Losses in a row before the session pauses (>= 1)
    #[serde(default = "default_max_losses")]
    pub max_consecutive_losses: u32,
    /// Win payout as a multiple of stake
    #[serde(default = "default_payout_multiplier")]
    pub payout_multiplier: Decimal,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            default_trade_amount: default_trade_amount(),
            daily_profit_target: default_profit_target(),
            daily_loss_limit: default_loss_limit(),
            max_consecutive_losses: default_max_losses(),
            payout_multiplier: default_payout_multiplier(),
        }
    }
}

/// Free-form settings update. `None` leaves a field unchanged; a field that
/// fails to parse as a number falls back to its documented default.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub daily_profit_target: Option<String>,
    pub daily_loss_limit: Option<String>,
    pub max_consecutive_losses: Option<String>,
    pub default_trade_amount: Option<String>,
}

impl RiskSettings {
    /// Apply a lenient update field-by-field. Never fails.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(raw) = &update.daily_profit_target {
            self.daily_profit_target = decimal_or(raw, default_profit_target());
        }
        if let Some(raw) = &update.daily_loss_limit {
            self.daily_loss_limit = decimal_or(raw, default_loss_limit());
        }
        if let Some(raw) = &update.max_consecutive_losses {
            self.max_consecutive_losses = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .unwrap_or_else(default_max_losses);
        }
        if let Some(raw) = &update.default_trade_amount {
            self.default_trade_amount = decimal_or(raw, default_trade_amount());
        }
    }
}

fn decimal_or(raw: &str, fallback: Decimal) -> Decimal {
    raw.trim().parse::<Decimal>().unwrap_or(fallback)
}

/// Top-level config file structure for the demo binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub risk: RiskSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Where the snapshot file lives
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// How many coin-flip trades the demo session places
    #[serde(default = "default_demo_trades")]
    pub demo_trades: u32,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("flipdesk_session.json")
}
fn default_demo_trades() -> u32 {
    6
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            demo_trades: default_demo_trades(),
        }
    }
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load from the default location (project root flipdesk.toml).
    pub fn load_default() -> Self {
        let candidates = [
            "flipdesk.toml",
            concat!(env!("CARGO_MANIFEST_DIR"), "/flipdesk.toml"),
        ];

        for path in &candidates {
            if let Ok(cfg) = Self::load(Path::new(path)) {
                tracing::info!("📋 Loaded config from {}", path);
                return cfg;
            }
        }

        tracing::warn!("⚠️ No flipdesk.toml found, using defaults");
        Self::default()
    }
}
