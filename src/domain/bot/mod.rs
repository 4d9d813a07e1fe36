//! Bot domain — read-only views of backend strategy executors.
//!
//! Bot lifecycle is owned entirely by the backend scheduler; the SDK only
//! observes it.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::shared::TradingId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Runtime state of a backend bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Pending,
    Running,
    Stopping,
    Stopped,
    Errored,
}

/// A strategy executor attached to a trading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub id: String,
    pub trading_id: TradingId,
    pub status: BotStatus,
    #[serde(default)]
    pub last_error: Option<String>,
    pub updated_at: DateTime<Utc>,
}
