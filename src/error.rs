//! Unified SDK error types and the user-facing error classification.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend 202 — the requested data is still being prepared.
    /// Retried by the idempotent policy rather than surfaced as a failure.
    #[error("Warming up")]
    Warmup,

    /// Application-level failure: HTTP 200 with `success:false` in the envelope.
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Authentication and OAuth-handshake errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("No OAuth handshake in progress")]
    NoHandshake,

    #[error("OAuth state mismatch — possible CSRF or stale flow")]
    StateMismatch,

    #[error("Sign-in popup was blocked by the browser")]
    PopupBlocked,

    #[error("Login cancelled")]
    Cancelled,

    #[error("Identity provider error: {error}{}", .description.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default())]
    ProviderError {
        error: String,
        description: Option<String>,
    },

    #[error("Invalid callback message: {0}")]
    InvalidCallback(String),

    #[error("Token expired")]
    TokenExpired,
}

// ═════════════════════════════════════════════════════════════════════════════
// Classification
// ═════════════════════════════════════════════════════════════════════════════

/// Closed set of user-facing error categories.
///
/// Callers branch on this instead of pattern-matching error internals at every
/// call site; the mapping from transport/backend detail to category lives in
/// one place ([`classify`] and [`SdkError::kind`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Cannot reach the backend at all.
    Network,
    /// Request rejected as invalid (400 or a validation code).
    Validation,
    /// Missing, expired, or rejected credentials (401).
    Unauthorized,
    /// Resource does not exist (404).
    NotFound,
    /// Conflicting resource state (409).
    Conflict,
    /// Too many requests (429).
    RateLimited,
    /// Backend fault (5xx).
    Server,
    /// Data still being prepared (202) — poll again.
    Warmup,
    /// OAuth provider not supported or misconfigured.
    InvalidProvider,
    /// OAuth redirect URI does not match the registered one.
    RedirectUriMismatch,
    /// CSRF state validation failed.
    StateMismatch,
    /// Authorization-code exchange rejected by the backend.
    TokenExchangeFailed,
    /// User abandoned the sign-in flow.
    Cancelled,
    /// Browser refused to open the sign-in popup.
    PopupBlocked,
    /// Anything that escapes the categories above.
    Unknown,
}

/// Map an HTTP status and an optional application error code to an [`ErrorKind`].
///
/// `status` of `None` means the request never produced a response (transport
/// failure). Body codes take precedence over the status so that a 400 carrying
/// `state_mismatch` classifies as the specific OAuth failure, not generic
/// validation.
pub fn classify(status: Option<u16>, body_code: Option<&str>) -> ErrorKind {
    if let Some(code) = body_code {
        match code {
            "invalid_provider" => return ErrorKind::InvalidProvider,
            "redirect_uri_mismatch" => return ErrorKind::RedirectUriMismatch,
            "state_mismatch" => return ErrorKind::StateMismatch,
            "token_exchange_failed" => return ErrorKind::TokenExchangeFailed,
            "validation_error" => return ErrorKind::Validation,
            "invalid_credentials" => return ErrorKind::Unauthorized,
            _ => {}
        }
    }

    match status {
        None => ErrorKind::Network,
        Some(202) => ErrorKind::Warmup,
        Some(400) => ErrorKind::Validation,
        Some(401) => ErrorKind::Unauthorized,
        Some(404) => ErrorKind::NotFound,
        Some(409) => ErrorKind::Conflict,
        Some(429) => ErrorKind::RateLimited,
        Some(s) if s >= 500 => ErrorKind::Server,
        Some(_) => ErrorKind::Unknown,
    }
}

impl SdkError {
    /// Classify this error into the closed [`ErrorKind`] set.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::Http(e) => e.kind(),
            SdkError::Auth(e) => e.kind(),
            SdkError::Validation(_) => ErrorKind::Validation,
            SdkError::Serde(_) => ErrorKind::Unknown,
            SdkError::Other(_) => ErrorKind::Unknown,
        }
    }
}

impl HttpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "http")]
            HttpError::Reqwest(_) => ErrorKind::Network,
            HttpError::ServerError { status, .. } => classify(Some(*status), None),
            HttpError::RateLimited { .. } => ErrorKind::RateLimited,
            HttpError::Unauthorized => ErrorKind::Unauthorized,
            HttpError::NotFound(_) => ErrorKind::NotFound,
            HttpError::BadRequest(_) => ErrorKind::Validation,
            HttpError::Conflict(_) => ErrorKind::Conflict,
            HttpError::Warmup => ErrorKind::Warmup,
            HttpError::Api { code, .. } => classify(Some(200), Some(code)),
            HttpError::Timeout => ErrorKind::Network,
            HttpError::MaxRetriesExceeded { .. } => ErrorKind::Network,
        }
    }
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::NotAuthenticated | AuthError::TokenExpired => ErrorKind::Unauthorized,
            AuthError::LoginFailed(_) => ErrorKind::TokenExchangeFailed,
            AuthError::NoHandshake => ErrorKind::StateMismatch,
            AuthError::StateMismatch => ErrorKind::StateMismatch,
            AuthError::PopupBlocked => ErrorKind::PopupBlocked,
            AuthError::Cancelled => ErrorKind::Cancelled,
            AuthError::ProviderError { .. } => ErrorKind::TokenExchangeFailed,
            AuthError::InvalidCallback(_) => ErrorKind::StateMismatch,
        }
    }
}
