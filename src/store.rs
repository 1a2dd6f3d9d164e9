//! Snapshot storage - persistence adapter for the session ledger
//!
//! The ledger is saved as one JSON document under a fixed storage key.
//! Loading is lenient: every field decodes independently and falls back to
//! its documented default, so a half-broken snapshot never kills a session.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::core::{DayStats, Result, RiskSettings, Trade};
use crate::ledger::starting_balance;

/// Fixed storage key the snapshot lives under.
pub const STORAGE_KEY: &str = "flipdesk.session";

/// Serializable ledger state. The pause flag and loss streak are
/// deliberately absent; they reset with every session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub balance: Decimal,
    pub history: Vec<Trade>,
    pub today: DayStats,
    pub settings: PersistedSettings,
}

/// The subset of risk settings that survives a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    pub daily_profit_target: Decimal,
    pub daily_loss_limit: Decimal,
    pub max_consecutive_losses: u32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        let defaults = RiskSettings::default();
        Self {
            daily_profit_target: defaults.daily_profit_target,
            daily_loss_limit: defaults.daily_loss_limit,
            max_consecutive_losses: defaults.max_consecutive_losses,
        }
    }
}

fn field_or<T: DeserializeOwned>(value: &Value, key: &str, fallback: T) -> T {
    value
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or(fallback)
}

impl Snapshot {
    /// Decode field-by-field with per-field defaults. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let defaults = PersistedSettings::default();
        let settings = value.get("settings").unwrap_or(&Value::Null);
        Self {
            balance: field_or(value, "balance", starting_balance()),
            history: field_or(value, "history", Vec::new()),
            today: field_or(value, "today", DayStats::default()),
            settings: PersistedSettings {
                daily_profit_target: field_or(
                    settings,
                    "daily_profit_target",
                    defaults.daily_profit_target,
                ),
                daily_loss_limit: field_or(settings, "daily_loss_limit", defaults.daily_loss_limit),
                max_consecutive_losses: field_or(
                    settings,
                    "max_consecutive_losses",
                    defaults.max_consecutive_losses,
                ),
            },
        }
    }
}

/// Persistence adapter. `load` returning `Ok(None)` means "no data".
pub trait SnapshotStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
    fn load(&self) -> Result<Option<Snapshot>>;
}

/// One JSON file on disk, the whole document keyed by [`STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let mut doc = serde_json::Map::new();
        doc.insert(STORAGE_KEY.to_string(), serde_json::to_value(snapshot)?);
        std::fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(doc))?)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let doc: Value = match serde_json::from_str(&content) {
            Ok(doc) => doc,
            Err(e) => {
                // Unreadable document counts as "no data", not a fatal load.
                tracing::warn!("⚠️ Discarding unreadable snapshot {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        Ok(doc.get(STORAGE_KEY).map(Snapshot::from_value))
    }
}

/// In-memory slot for tests and ephemeral sessions. Stores the serialized
/// form so loads run through the same lenient decoder as the file store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.slot = Some(serde_json::to_value(snapshot)?);
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.slot.as_ref().map(Snapshot::from_value))
    }
}
