//! Wire types for the trading endpoints.

use serde::{Deserialize, Serialize};

use super::{TradingStatus, TradingType};

/// Trading as the backend sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingWire {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub trading_type: TradingType,
    pub status: TradingStatus,
    /// Decimal string; parsed at the domain boundary.
    pub initial_funds: String,
    pub stock_symbol: String,
    pub quote_symbol: String,
    #[serde(default)]
    pub exchange_binding_id: Option<String>,
    /// Epoch milliseconds.
    pub created_at: u64,
}

/// Body for `POST /v1/tradings`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTradingRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub trading_type: TradingType,
    pub initial_funds: String,
    pub stock_symbol: String,
    pub quote_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_binding_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
}

/// Body for `PUT /v1/tradings/{id}` — partial update, absent fields untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTradingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_binding_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
}
