//! Core module - Common types, settings, and error handling

pub mod config;
pub mod error;
pub mod types;

pub use config::{RiskSettings, SettingsUpdate};
pub use error::{Error, Result};
pub use types::*;
