//! Wire types for equity-curve and candle endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::EquityPoint;
use crate::shared::serde_util::timestamp_ms;

/// One equity point as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct EquityPointWire {
    #[serde(with = "timestamp_ms")]
    pub timestamp: DateTime<Utc>,
    pub equity: Decimal,
    pub quote_balance: Decimal,
    pub stock_balance: Decimal,
    #[serde(default)]
    pub stock_price: Option<Decimal>,
    #[serde(default)]
    pub benchmark_return: Option<f64>,
}

impl From<EquityPointWire> for EquityPoint {
    fn from(w: EquityPointWire) -> Self {
        EquityPoint {
            timestamp: w.timestamp,
            equity: w.equity,
            quote_balance: w.quote_balance,
            stock_balance: w.stock_balance,
            stock_price: w.stock_price,
            benchmark_return: w.benchmark_return,
        }
    }
}

/// Response from `GET /v1/tradings/{id}/equity-curve`.
#[derive(Debug, Clone, Deserialize)]
pub struct EquityCurveWire {
    pub points: Vec<EquityPointWire>,
    /// Stock price at the start of the curve; last resort for price resolution.
    #[serde(default)]
    pub baseline_price: Option<Decimal>,
    #[serde(default)]
    pub initial_funds: Option<Decimal>,
}

/// One candle from `GET /v1/market/klines`.
#[derive(Debug, Clone, Deserialize)]
pub struct KlineWire {
    #[serde(with = "timestamp_ms")]
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equity_point_wire_optional_fields() {
        let w: EquityPointWire = serde_json::from_str(
            r#"{"timestamp":1700000000000,"equity":"1050","quote_balance":"500","stock_balance":"0.01"}"#,
        )
        .unwrap();
        assert!(w.stock_price.is_none());
        assert!(w.benchmark_return.is_none());
        let p: EquityPoint = w.into();
        assert_eq!(p.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_curve_wire_deserializes() {
        let w: EquityCurveWire = serde_json::from_str(
            r#"{"points":[],"baseline_price":"64000","initial_funds":"1000"}"#,
        )
        .unwrap();
        assert!(w.points.is_empty());
        assert!(w.baseline_price.is_some());
    }
}
