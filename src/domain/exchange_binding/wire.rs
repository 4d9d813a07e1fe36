//! Wire types for the exchange-binding endpoints.

use serde::{Deserialize, Serialize};

use super::{Exchange, ExchangeBinding};
use crate::shared::serde_util::timestamp_ms;
use crate::shared::BindingId;
use chrono::{DateTime, Utc};

/// Binding as the backend sends it. No conversion layer needed — the shape is
/// already display-ready, so the wire struct maps directly.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingWire {
    pub id: String,
    pub name: String,
    pub exchange: Exchange,
    pub api_key_tail: String,
    #[serde(with = "timestamp_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<BindingWire> for ExchangeBinding {
    fn from(w: BindingWire) -> Self {
        ExchangeBinding {
            id: BindingId::from(w.id),
            name: w.name,
            exchange: w.exchange,
            api_key_tail: w.api_key_tail,
            created_at: w.created_at,
        }
    }
}

/// Body for `POST /v1/exchange-bindings`. The only place secrets appear.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBindingRequest {
    pub name: String,
    pub exchange: Exchange,
    pub api_key: String,
    pub api_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_wire_deserializes() {
        let w: BindingWire = serde_json::from_str(
            r#"{"id":"bnd_1","name":"main","exchange":"binance","api_key_tail":"x9Qz","created_at":1700000000000}"#,
        )
        .unwrap();
        let binding: ExchangeBinding = w.into();
        assert_eq!(binding.exchange, Exchange::Binance);
        assert_eq!(binding.api_key_tail, "x9Qz");
    }

    #[test]
    fn test_create_request_omits_empty_passphrase() {
        let req = CreateBindingRequest {
            name: "main".into(),
            exchange: Exchange::Okx,
            api_key: "k".into(),
            api_secret: "s".into(),
            passphrase: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("passphrase"));
    }
}
