//! # Quantflow SDK
//!
//! A Rust client for the Quantflow trading platform: authentication session
//! lifecycle, OAuth handshake coordination, resource CRUD, and equity-curve
//! analytics. Works on native and WASM targets.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared newtypes, errors, formatting, network constants (always available)
//! 2. **Auth** — Token bundle + store, OAuth handshake state machine, session manager
//! 3. **HTTP API** — `QuantflowHttp` with per-endpoint retry policies and envelope decoding
//! 4. **High-Level Client** — `QuantflowClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quantflow_sdk::prelude::*;
//!
//! let client = QuantflowClient::builder()
//!     .base_url("https://api.quantflow.app")
//!     .build()?;
//!
//! client.session().restore().await?;
//! let tradings = client.tradings().list().await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types and classification.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: token bundle, token store, OAuth handshake, session manager.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `QuantflowClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{BindingId, Timeframe, TradingId};

    // Domain types — trading
    pub use crate::domain::trading::{Trading, TradingStatus, TradingType};

    // Domain types — exchange binding, bot
    pub use crate::domain::bot::{Bot, BotStatus};
    pub use crate::domain::exchange_binding::{Exchange, ExchangeBinding};

    // Domain types — equity
    pub use crate::domain::equity::metrics::{CurveMetrics, LightweightMetrics};
    pub use crate::domain::equity::{EquityCurve, EquityCurveState, EquityPoint};

    // Errors
    pub use crate::error::{classify, ErrorKind, SdkError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // Auth types
    pub use crate::auth::handshake::{AuthorizationCode, CallbackEvent, CallbackMessage};
    pub use crate::auth::store::{FileTokenStore, MemoryTokenStore, TokenStore};
    pub use crate::auth::{Provider, Session, TokenBundle, UserSettings};
    #[cfg(feature = "http")]
    pub use crate::auth::session::{OauthOutcome, SessionState};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        BotsClient, EquityClient, ExchangeBindingsClient, QuantflowClient,
        QuantflowClientBuilder, SessionSubClient, TradingsClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
}
