//! Wire types for the bot endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Bot, BotStatus};
use crate::shared::serde_util::timestamp_ms;
use crate::shared::TradingId;

/// Bot as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct BotWire {
    pub id: String,
    pub trading_id: String,
    pub status: BotStatus,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(with = "timestamp_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<BotWire> for Bot {
    fn from(w: BotWire) -> Self {
        Bot {
            id: w.id,
            trading_id: TradingId::from(w.trading_id),
            status: w.status,
            last_error: w.last_error,
            updated_at: w.updated_at,
        }
    }
}
