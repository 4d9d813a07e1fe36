//! Equity domain — performance-curve data and derived metrics.

#[cfg(feature = "http")]
pub mod client;
pub mod metrics;
pub mod state;
pub mod wire;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::EquityCurveState;

/// A fetched (slice of an) equity curve plus its pricing context.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurve {
    pub points: Vec<EquityPoint>,
    /// Stock price at curve start, used as a late fallback when valuing holdings.
    pub baseline_price: Option<Decimal>,
    pub initial_funds: Option<Decimal>,
}

/// One timestamped snapshot of portfolio value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    /// Backend-computed total value. Used as-is when no price is resolvable.
    pub equity: Decimal,
    pub quote_balance: Decimal,
    pub stock_balance: Decimal,
    #[serde(default)]
    pub stock_price: Option<Decimal>,
    /// Buy-and-hold benchmark return over the same period, as a fraction.
    #[serde(default)]
    pub benchmark_return: Option<f64>,
}
