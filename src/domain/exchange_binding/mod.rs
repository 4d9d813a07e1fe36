//! Exchange binding domain — stored API credentials for real exchanges.
//!
//! Secrets are write-only: they go up in [`wire::CreateBindingRequest`] and
//! never come back; list/get responses carry only a masked key tail for
//! display.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::shared::BindingId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Binance,
    Okx,
    Kraken,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Okx => "okx",
            Self::Kraken => "kraken",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored exchange credential, as visible to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeBinding {
    pub id: BindingId,
    pub name: String,
    pub exchange: Exchange,
    /// Last characters of the API key, for recognition in lists.
    pub api_key_tail: String,
    pub created_at: DateTime<Utc>,
}
