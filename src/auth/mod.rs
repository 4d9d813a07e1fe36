//! Authentication — token bundle, session types, OAuth handshake, wire types.
//!
//! ## Security model
//!
//! - The access/refresh token pair ([`TokenBundle`]) is the only durable
//!   authentication artifact. It lives behind the [`store::TokenStore`]
//!   abstraction injected into the client; the SDK never logs token values.
//! - OAuth handshake state (the CSRF nonce) is held in memory for exactly one
//!   initiate/callback round trip and discarded on consumption, success or not.
//! - Logout clears local state unconditionally; the backend call is advisory.
//!
//! ## Session hydration
//!
//! Use `client.session().restore()` on startup to rebuild the session from the
//! stored token bundle (refreshing first when the token is near expiry), and
//! `client.session().run_refresh_loop()` to keep it fresh in the background.

pub mod handshake;
#[cfg(feature = "http")]
pub mod session;
pub mod store;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

/// Refresh this many seconds before the access token actually expires, so
/// that user-facing requests rarely race an expired token.
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 60;

/// The safety margin as a `chrono` duration.
pub fn expiry_safety_margin() -> ChronoDuration {
    ChronoDuration::seconds(EXPIRY_SAFETY_MARGIN_SECS)
}

// ============================================================================
// User profile types
// ============================================================================

/// Identity provider a session was established through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Wechat,
    Email,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Wechat => "wechat",
            Self::Email => "email",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-user display preferences, stored server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub timezone: String,
    pub currency: String,
    pub notifications: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            currency: "USD".to_string(),
            notifications: true,
        }
    }
}

/// The authenticated user, as held in memory by the session manager.
///
/// Owned exclusively by the session manager; mutated only through
/// login/refresh/logout operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub provider: Provider,
    pub email_verified: bool,
    #[serde(default)]
    pub settings: UserSettings,
}

// ============================================================================
// Token bundle
// ============================================================================

/// The access/refresh token pair plus expiry — the only durable auth artifact.
///
/// All-or-nothing by construction: there is no way to hold an access token
/// without its expiry and refresh token. Partial data read from a store is
/// treated as no bundle at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenBundle {
    /// Build a bundle from an auth response's `expires_in` (seconds from now).
    pub fn from_expires_in(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + ChronoDuration::seconds(expires_in),
        }
    }

    /// Whether the access token expires within `margin` of now (or already has).
    pub fn expires_within(&self, margin: ChronoDuration) -> bool {
        Utc::now() + margin >= self.expires_at
    }

    /// Whether the access token is usable without a refresh first.
    pub fn is_fresh(&self) -> bool {
        !self.expires_within(expiry_safety_margin())
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// User profile as the backend sends it (`GET /v1/users/me`, login responses).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWire {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub provider: Provider,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub settings: Option<UserSettings>,
}

impl From<UserWire> for Session {
    fn from(w: UserWire) -> Self {
        let display_name = w
            .full_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| w.email.clone());
        Session {
            user_id: w.id,
            email: w.email,
            display_name,
            avatar_url: w.avatar_url,
            provider: w.provider,
            email_verified: w.email_verified,
            settings: w.settings.unwrap_or_default(),
        }
    }
}

/// Response from `POST /v1/auth/login` (OAuth initiate).
#[derive(Debug, Clone, Deserialize)]
pub struct OauthInitResponse {
    pub auth_url: String,
    pub state: String,
}

/// Response shape shared by `POST /v1/auth/callback`, `/auth/signup`
/// and `/auth/signin`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserWire,
}

/// Response from `POST /v1/auth/refresh`.
///
/// The backend accepts a refresh token until it decides to rotate it, in which
/// case the replacement rides along here.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Request body for `POST /v1/auth/signup` / `POST /v1/auth/signin`.
#[derive(Debug, Clone, Serialize)]
pub struct EmailCredentials {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bundle_expiry_margin() {
        let fresh = TokenBundle::from_expires_in("a".into(), "r".into(), 3600);
        assert!(fresh.is_fresh());
        assert!(!fresh.expires_within(ChronoDuration::seconds(60)));

        let stale = TokenBundle::from_expires_in("a".into(), "r".into(), 30);
        assert!(!stale.is_fresh());
        assert!(stale.expires_within(ChronoDuration::seconds(60)));

        let expired = TokenBundle::from_expires_in("a".into(), "r".into(), -10);
        assert!(expired.expires_within(ChronoDuration::zero()));
    }

    #[test]
    fn test_user_wire_display_name_falls_back_to_email() {
        let wire = UserWire {
            id: "u1".into(),
            email: "t@example.com".into(),
            full_name: Some(String::new()),
            avatar_url: None,
            provider: Provider::Email,
            email_verified: false,
            settings: None,
        };
        let session: Session = wire.into();
        assert_eq!(session.display_name, "t@example.com");
        assert_eq!(session.settings, UserSettings::default());
    }

    #[test]
    fn test_provider_serde() {
        let p: Provider = serde_json::from_str("\"wechat\"").unwrap();
        assert_eq!(p, Provider::Wechat);
        assert_eq!(serde_json::to_string(&Provider::Google).unwrap(), "\"google\"");
    }

    #[test]
    fn test_refresh_response_optional_rotation() {
        let r: RefreshResponse =
            serde_json::from_str(r#"{"access_token":"a2","expires_in":900}"#).unwrap();
        assert!(r.refresh_token.is_none());
        let r: RefreshResponse = serde_json::from_str(
            r#"{"access_token":"a2","expires_in":900,"refresh_token":"r2"}"#,
        )
        .unwrap();
        assert_eq!(r.refresh_token.as_deref(), Some("r2"));
    }
}
