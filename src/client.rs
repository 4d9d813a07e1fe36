//! High-level client — `QuantflowClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`; the
//! session manager lives in `auth/session.rs`. This module keeps the builder,
//! shared session state, and accessor methods.

use crate::auth::handshake::OauthHandshake;
use crate::auth::session::{SessionClient, SessionState};
use crate::auth::store::{MemoryTokenStore, TokenStore};
use crate::domain::bot::client::Bots;
use crate::domain::equity::client::Equity;
use crate::domain::exchange_binding::client::ExchangeBindings;
use crate::domain::trading::client::Tradings;
use crate::error::SdkError;
use crate::http::QuantflowHttp;

use async_lock::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export sub-client types for convenience.
pub use crate::auth::session::SessionClient as SessionSubClient;
pub use crate::domain::bot::client::Bots as BotsClient;
pub use crate::domain::equity::client::Equity as EquityClient;
pub use crate::domain::exchange_binding::client::ExchangeBindings as ExchangeBindingsClient;
pub use crate::domain::trading::client::Tradings as TradingsClient;

/// The primary entry point for the Quantflow SDK.
///
/// Explicitly constructed (never a process-global singleton) so tests and
/// multi-account hosts can hold independent instances with their own token
/// stores.
pub struct QuantflowClient {
    pub(crate) http: QuantflowHttp,
    /// Injected persistence for the token bundle.
    pub(crate) token_store: Arc<dyn TokenStore>,
    /// Tagged session lifecycle state.
    pub(crate) session_state: Arc<RwLock<SessionState>>,
    /// When the most recent login completed, for the one-time welcome flag.
    pub(crate) just_signed_in_at: Arc<RwLock<Option<Instant>>>,
    /// The single in-flight OAuth handshake slot.
    pub(crate) handshake: Arc<RwLock<Option<OauthHandshake>>>,
    /// Redirect URI registered with the identity providers.
    pub(crate) redirect_uri: String,
    /// Origin accepted for OAuth callback messages.
    pub(crate) app_origin: String,
    /// Cadence of the proactive token refresh check.
    pub(crate) refresh_check_interval: Duration,
}

impl QuantflowClient {
    pub fn builder() -> QuantflowClientBuilder {
        QuantflowClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn session(&self) -> SessionClient<'_> {
        SessionClient { client: self }
    }

    pub fn tradings(&self) -> Tradings<'_> {
        Tradings { client: self }
    }

    pub fn exchange_bindings(&self) -> ExchangeBindings<'_> {
        ExchangeBindings { client: self }
    }

    pub fn bots(&self) -> Bots<'_> {
        Bots { client: self }
    }

    pub fn equity(&self) -> Equity<'_> {
        Equity { client: self }
    }
}

impl Clone for QuantflowClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            token_store: self.token_store.clone(),
            session_state: self.session_state.clone(),
            just_signed_in_at: self.just_signed_in_at.clone(),
            handshake: self.handshake.clone(),
            redirect_uri: self.redirect_uri.clone(),
            app_origin: self.app_origin.clone(),
            refresh_check_interval: self.refresh_check_interval,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct QuantflowClientBuilder {
    base_url: String,
    redirect_uri: Option<String>,
    app_origin: String,
    token_store: Option<Arc<dyn TokenStore>>,
    refresh_check_interval: Duration,
}

impl Default for QuantflowClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            redirect_uri: None,
            app_origin: crate::network::DEFAULT_APP_ORIGIN.to_string(),
            token_store: None,
            refresh_check_interval: Duration::from_secs(60),
        }
    }
}

impl QuantflowClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Redirect URI registered with the identity providers. Defaults to
    /// `<app_origin>/auth/callback`.
    pub fn redirect_uri(mut self, uri: &str) -> Self {
        self.redirect_uri = Some(uri.to_string());
        self
    }

    /// Origin trusted for OAuth callback messages.
    pub fn app_origin(mut self, origin: &str) -> Self {
        self.app_origin = origin.trim_end_matches('/').to_string();
        self
    }

    /// Inject a token store. Defaults to an in-memory store.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn refresh_check_interval(mut self, interval: Duration) -> Self {
        self.refresh_check_interval = interval;
        self
    }

    pub fn build(self) -> Result<QuantflowClient, SdkError> {
        let redirect_uri = self
            .redirect_uri
            .unwrap_or_else(|| format!("{}/auth/callback", self.app_origin));

        Ok(QuantflowClient {
            http: QuantflowHttp::new(&self.base_url),
            token_store: self
                .token_store
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
            session_state: Arc::new(RwLock::new(SessionState::Unauthenticated)),
            just_signed_in_at: Arc::new(RwLock::new(None)),
            handshake: Arc::new(RwLock::new(None)),
            redirect_uri,
            app_origin: self.app_origin,
            refresh_check_interval: self.refresh_check_interval,
        })
    }
}
