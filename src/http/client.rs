//! Low-level HTTP client — `QuantflowHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens at the sub-client boundary). Internal to the SDK — the high-level
//! client wraps this.

use crate::auth::{AuthResponse, EmailCredentials, OauthInitResponse, RefreshResponse, UserWire};
use crate::domain::bot::wire::BotWire;
use crate::domain::equity::wire::{EquityCurveWire, KlineWire};
use crate::domain::exchange_binding::wire::{BindingWire, CreateBindingRequest};
use crate::domain::trading::wire::{CreateTradingRequest, TradingWire, UpdateTradingRequest};
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::http::wire::Envelope;
use crate::network::API_PREFIX;
use crate::shared::Timeframe;

use async_lock::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Low-level HTTP client for the Quantflow REST API.
pub struct QuantflowHttp {
    base_url: String,
    client: Client,
    /// Bearer token injected into authenticated requests. NEVER exposed publicly.
    access_token: Arc<RwLock<Option<String>>>,
}

impl QuantflowHttp {
    pub fn new(base_url: &str) -> Self {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Self {
            base_url: format!("{}{}", base_url.trim_end_matches('/'), API_PREFIX),
            client: builder.build().unwrap_or_default(),
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the access token used for bearer injection.
    pub(crate) async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    /// Clear the access token.
    pub(crate) async fn clear_access_token(&self) {
        *self.access_token.write().await = None;
    }

    // ── Auth ─────────────────────────────────────────────────────────────

    pub async fn oauth_initiate(
        &self,
        provider: &str,
        redirect_uri: &str,
    ) -> Result<OauthInitResponse, HttpError> {
        let url = format!("{}/auth/login", self.base_url);
        let body = serde_json::json!({ "provider": provider, "redirect_uri": redirect_uri });
        self.post(&url, &body, RetryPolicy::None).await
    }

    pub async fn oauth_callback(
        &self,
        provider: &str,
        code: &str,
        state: &str,
        redirect_uri: &str,
    ) -> Result<AuthResponse, HttpError> {
        let url = format!("{}/auth/callback", self.base_url);
        let body = serde_json::json!({
            "provider": provider,
            "code": code,
            "state": state,
            "redirect_uri": redirect_uri,
        });
        self.post(&url, &body, RetryPolicy::None).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, HttpError> {
        let url = format!("{}/auth/refresh", self.base_url);
        let body = serde_json::json!({ "refresh_token": refresh_token });
        self.post(&url, &body, RetryPolicy::None).await
    }

    pub async fn signup(&self, credentials: &EmailCredentials) -> Result<AuthResponse, HttpError> {
        let url = format!("{}/auth/signup", self.base_url);
        self.post(&url, credentials, RetryPolicy::None).await
    }

    pub async fn signin(&self, credentials: &EmailCredentials) -> Result<AuthResponse, HttpError> {
        let url = format!("{}/auth/signin", self.base_url);
        self.post(&url, credentials, RetryPolicy::None).await
    }

    pub async fn logout(&self) -> Result<(), HttpError> {
        let url = format!("{}/auth/logout", self.base_url);
        self.post_unit(&url, &serde_json::json!({}), RetryPolicy::None)
            .await
    }

    pub async fn get_me(&self) -> Result<UserWire, HttpError> {
        let url = format!("{}/users/me", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Tradings ─────────────────────────────────────────────────────────

    pub async fn list_tradings(&self) -> Result<Vec<TradingWire>, HttpError> {
        let url = format!("{}/tradings", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn get_trading(&self, id: &str) -> Result<TradingWire, HttpError> {
        let url = format!("{}/tradings/{}", self.base_url, id);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn create_trading(
        &self,
        request: &CreateTradingRequest,
    ) -> Result<TradingWire, HttpError> {
        let url = format!("{}/tradings", self.base_url);
        self.post(&url, request, RetryPolicy::None).await
    }

    pub async fn update_trading(
        &self,
        id: &str,
        request: &UpdateTradingRequest,
    ) -> Result<TradingWire, HttpError> {
        let url = format!("{}/tradings/{}", self.base_url, id);
        self.put(&url, request, RetryPolicy::None).await
    }

    pub async fn delete_trading(&self, id: &str) -> Result<(), HttpError> {
        let url = format!("{}/tradings/{}", self.base_url, id);
        self.delete_unit(&url).await
    }

    pub async fn start_trading(&self, id: &str) -> Result<TradingWire, HttpError> {
        let url = format!("{}/tradings/{}/start", self.base_url, id);
        self.post(&url, &serde_json::json!({}), RetryPolicy::None)
            .await
    }

    pub async fn stop_trading(&self, id: &str) -> Result<TradingWire, HttpError> {
        let url = format!("{}/tradings/{}/stop", self.base_url, id);
        self.post(&url, &serde_json::json!({}), RetryPolicy::None)
            .await
    }

    // ── Exchange bindings ────────────────────────────────────────────────

    pub async fn list_exchange_bindings(&self) -> Result<Vec<BindingWire>, HttpError> {
        let url = format!("{}/exchange-bindings", self.base_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn get_exchange_binding(&self, id: &str) -> Result<BindingWire, HttpError> {
        let url = format!("{}/exchange-bindings/{}", self.base_url, id);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn create_exchange_binding(
        &self,
        request: &CreateBindingRequest,
    ) -> Result<BindingWire, HttpError> {
        let url = format!("{}/exchange-bindings", self.base_url);
        self.post(&url, request, RetryPolicy::None).await
    }

    pub async fn delete_exchange_binding(&self, id: &str) -> Result<(), HttpError> {
        let url = format!("{}/exchange-bindings/{}", self.base_url, id);
        self.delete_unit(&url).await
    }

    // ── Bots ─────────────────────────────────────────────────────────────

    pub async fn list_bots(&self, trading_id: Option<&str>) -> Result<Vec<BotWire>, HttpError> {
        let mut url = format!("{}/bots", self.base_url);
        if let Some(id) = trading_id {
            url = format!("{}?trading_id={}", url, urlencoding::encode(id));
        }
        self.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn get_bot(&self, id: &str) -> Result<BotWire, HttpError> {
        let url = format!("{}/bots/{}", self.base_url, id);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Equity curve & market data ───────────────────────────────────────

    pub async fn get_equity_curve(
        &self,
        trading_id: &str,
        timeframe: Timeframe,
        since: Option<u64>,
        limit: Option<u32>,
    ) -> Result<EquityCurveWire, HttpError> {
        let mut url = format!(
            "{}/tradings/{}/equity-curve?timeframe={}",
            self.base_url,
            trading_id,
            timeframe.as_str()
        );
        if let Some(s) = since {
            url = format!("{}&since={}", url, s);
        }
        if let Some(l) = limit {
            url = format!("{}&limit={}", url, l);
        }
        // Fresh tradings answer 202 until the first snapshot lands.
        self.get(&url, RetryPolicy::Custom(RetryConfig::warmup_tolerant()))
            .await
    }

    pub async fn get_klines(
        &self,
        symbol: &str,
        quote: &str,
        timeframe: Timeframe,
        limit: Option<u32>,
    ) -> Result<Vec<KlineWire>, HttpError> {
        let mut url = format!(
            "{}/market/klines?symbol={}&quote={}&timeframe={}",
            self.base_url,
            urlencoding::encode(symbol),
            urlencoding::encode(quote),
            timeframe.as_str()
        );
        if let Some(l) = limit {
            url = format!("{}&limit={}", url, l);
        }
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str, retry: RetryPolicy) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, None::<&()>, retry)
            .await?
            .into_result()
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::POST, url, Some(body), retry)
            .await?
            .into_result()
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::PUT, url, Some(body), retry)
            .await?
            .into_result()
    }

    /// POST to an endpoint that acknowledges without a payload.
    async fn post_unit<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<(), HttpError> {
        self.request_with_retry::<serde_json::Value, B>(reqwest::Method::POST, url, Some(body), retry)
            .await?
            .into_unit_result()
    }

    async fn delete_unit(&self, url: &str) -> Result<(), HttpError> {
        self.request_with_retry::<serde_json::Value, ()>(
            reqwest::Method::DELETE,
            url,
            None::<&()>,
            RetryPolicy::None,
        )
        .await?
        .into_unit_result()
    }

    async fn request_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<Envelope<T>, HttpError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(&method, url, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, B>(&method, url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let mut fixed_delay = None;
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => {
                            config.retryable_statuses.contains(status)
                        }
                        HttpError::RateLimited { retry_after_ms } => {
                            if let Some(ms) = retry_after_ms {
                                fixed_delay = Some(Duration::from_millis(*ms));
                            }
                            true
                        }
                        HttpError::Warmup => {
                            fixed_delay = Some(config.warmup_poll_interval);
                            true
                        }
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => {
                            #[cfg(not(target_arch = "wasm32"))]
                            let retryable = re.is_connect() || re.is_timeout() || re.is_request();
                            #[cfg(target_arch = "wasm32")]
                            let retryable = re.is_timeout() || re.is_request();
                            retryable
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = fixed_delay.unwrap_or_else(|| config.delay_for_attempt(attempt));
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Envelope<T>, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(token) = self.access_token.read().await.as_ref() {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.as_u16() == 202 {
            return Err(HttpError::Warmup);
        }

        if status.is_success() {
            // 200 still carries the envelope; the caller decides whether a
            // missing payload is an error.
            return Ok(resp.json::<Envelope<T>>().await?);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            409 => Err(HttpError::Conflict(body_text)),
            429 => Err(HttpError::RateLimited {
                retry_after_ms: None,
            }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl Clone for QuantflowHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            access_token: self.access_token.clone(),
        }
    }
}
