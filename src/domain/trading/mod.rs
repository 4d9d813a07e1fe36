//! Trading domain — paper/backtest/real trading configurations.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

pub use convert::ValidationError;

use crate::shared::{BindingId, TradingId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Execution mode of a trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingType {
    Paper,
    Backtest,
    Real,
}

impl TradingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Backtest => "backtest",
            Self::Real => "real",
        }
    }
}

impl std::fmt::Display for TradingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status, driven by the backend bot scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingStatus {
    Draft,
    Running,
    Stopped,
    Completed,
    Failed,
}

/// A trading — one strategy bound to one market pair with its own funds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trading {
    pub id: TradingId,
    pub name: String,
    pub trading_type: TradingType,
    pub status: TradingStatus,
    /// Funds the trading started with; the ROI denominator.
    pub initial_funds: Decimal,
    pub stock_symbol: String,
    pub quote_symbol: String,
    pub exchange_binding_id: Option<BindingId>,
    pub created_at: DateTime<Utc>,
}

impl Trading {
    /// Whether the backend will accept a start request.
    pub fn can_start(&self) -> bool {
        matches!(self.status, TradingStatus::Draft | TradingStatus::Stopped)
    }

    /// Whether the backend will accept a stop request.
    pub fn can_stop(&self) -> bool {
        self.status == TradingStatus::Running
    }
}
