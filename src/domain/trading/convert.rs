//! Wire → domain conversions with validation.

use std::str::FromStr;

use chrono::DateTime;
use rust_decimal::Decimal;
use thiserror::Error;

use super::wire::TradingWire;
use super::Trading;
use crate::shared::{BindingId, TradingId};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid initial_funds {value:?}: {reason}")]
    InvalidFunds { value: String, reason: String },

    #[error("invalid created_at timestamp {0}")]
    InvalidTimestamp(u64),

    #[error("initial_funds must not be negative: {0}")]
    NegativeFunds(Decimal),
}

impl TryFrom<TradingWire> for Trading {
    type Error = ValidationError;

    fn try_from(w: TradingWire) -> Result<Self, Self::Error> {
        let initial_funds =
            Decimal::from_str(&w.initial_funds).map_err(|e| ValidationError::InvalidFunds {
                value: w.initial_funds.clone(),
                reason: e.to_string(),
            })?;
        if initial_funds.is_sign_negative() {
            return Err(ValidationError::NegativeFunds(initial_funds));
        }

        let created_at = DateTime::from_timestamp_millis(w.created_at as i64)
            .ok_or(ValidationError::InvalidTimestamp(w.created_at))?;

        Ok(Trading {
            id: TradingId::from(w.id),
            name: w.name,
            trading_type: w.trading_type,
            status: w.status,
            initial_funds,
            stock_symbol: w.stock_symbol,
            quote_symbol: w.quote_symbol,
            exchange_binding_id: w.exchange_binding_id.map(BindingId::from),
            created_at,
        })
    }
}
