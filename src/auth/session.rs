//! Session manager — restore, refresh, login variants, logout.
//!
//! All mutation of the in-memory session goes through this sub-client. The
//! session is an explicit tagged state rather than a pile of booleans, so
//! impossible combinations (loading while logged out while refreshing) cannot
//! be represented.
//!
//! Concurrency: operations are async and serialized per-await-point; the
//! periodic refresh check and an explicit user-triggered refresh can race.
//! That is tolerated rather than deduplicated — the backend accepts a refresh
//! token until rotated, and both calls converge on the same resulting state.

use std::time::{Duration, Instant};

use crate::auth::handshake::{CallbackEvent, OauthHandshake};
use crate::auth::{
    expiry_safety_margin, AuthResponse, EmailCredentials, Provider, Session, TokenBundle,
};
use crate::client::QuantflowClient;
use crate::error::{AuthError, SdkError};

/// How long `just_signed_in()` stays true after a login, for one-time welcome
/// UI.
pub const JUST_SIGNED_IN_WINDOW: Duration = Duration::from_secs(5);

/// The session lifecycle, made explicit.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    /// Startup restore in progress.
    Restoring,
    Authenticated(Session),
    /// A refresh is in flight; the previous session stays visible meanwhile.
    Refreshing(Session),
    LoggingOut,
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(s) | SessionState::Refreshing(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}

/// Result of a completed OAuth handshake.
#[derive(Debug, Clone)]
pub struct OauthOutcome {
    pub session: Session,
    /// Where the host should navigate next, if the flow carried a target.
    pub redirect_target: Option<String>,
}

/// Sub-client owning the session lifecycle.
pub struct SessionClient<'a> {
    pub(crate) client: &'a QuantflowClient,
}

impl<'a> SessionClient<'a> {
    // ── State accessors ──────────────────────────────────────────────────

    pub async fn state(&self) -> SessionState {
        self.client.session_state.read().await.clone()
    }

    pub async fn current(&self) -> Option<Session> {
        self.client.session_state.read().await.session().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.client.session_state.read().await.is_authenticated()
    }

    /// True only within [`JUST_SIGNED_IN_WINDOW`] after a login completes.
    pub async fn just_signed_in(&self) -> bool {
        self.client
            .just_signed_in_at
            .read()
            .await
            .map(|at| at.elapsed() < JUST_SIGNED_IN_WINDOW)
            .unwrap_or(false)
    }

    // ── Startup restore ──────────────────────────────────────────────────

    /// Rebuild the session from the persisted token bundle.
    ///
    /// No stored bundle means an unauthenticated start — no network traffic
    /// at all. A bundle near expiry is refreshed before the profile fetch so
    /// the restored session never begins on a dying token.
    pub async fn restore(&self) -> Result<Option<Session>, SdkError> {
        let Some(bundle) = self.client.token_store.load() else {
            *self.client.session_state.write().await = SessionState::Unauthenticated;
            return Ok(None);
        };

        *self.client.session_state.write().await = SessionState::Restoring;

        if !bundle.is_fresh() {
            tracing::debug!("Stored token near expiry; refreshing before restore");
            let session = self.refresh_inner(bundle).await?;
            return Ok(Some(session));
        }

        self.client
            .http
            .set_access_token(Some(bundle.access_token.clone()))
            .await;

        match self.client.http.get_me().await {
            Ok(user) => {
                let session: Session = user.into();
                *self.client.session_state.write().await =
                    SessionState::Authenticated(session.clone());
                Ok(Some(session))
            }
            Err(e) => {
                // Token rejected despite looking fresh — fall back to a refresh.
                if matches!(e, crate::error::HttpError::Unauthorized) {
                    let session = self.refresh_inner(bundle).await?;
                    return Ok(Some(session));
                }
                // Transient failure: keep the bundle, report unauthenticated.
                *self.client.session_state.write().await = SessionState::Unauthenticated;
                Err(e.into())
            }
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────────

    /// Exchange the refresh token for a new access token and re-fetch the
    /// profile. Any refresh-endpoint failure forces a local logout — a
    /// half-valid session is worse than none.
    pub async fn refresh(&self) -> Result<Session, SdkError> {
        let bundle = self
            .client
            .token_store
            .load()
            .ok_or(SdkError::Auth(AuthError::NotAuthenticated))?;
        self.refresh_inner(bundle).await
    }

    async fn refresh_inner(&self, bundle: TokenBundle) -> Result<Session, SdkError> {
        // Bind before taking the write lock: an `if let` on the read guard
        // would hold it across the body and deadlock against the write.
        let previous = self.client.session_state.read().await.session().cloned();
        if let Some(previous) = previous {
            *self.client.session_state.write().await = SessionState::Refreshing(previous);
        }

        let resp = match self.client.http.refresh_token(&bundle.refresh_token).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed; forcing logout");
                self.clear_local_session().await;
                return Err(e.into());
            }
        };

        let new_bundle = TokenBundle::from_expires_in(
            resp.access_token,
            // The backend rotates the refresh token at its discretion.
            resp.refresh_token.unwrap_or(bundle.refresh_token),
            resp.expires_in,
        );
        self.client.token_store.save(&new_bundle);
        self.client
            .http
            .set_access_token(Some(new_bundle.access_token.clone()))
            .await;

        match self.client.http.get_me().await {
            Ok(user) => {
                let session: Session = user.into();
                *self.client.session_state.write().await =
                    SessionState::Authenticated(session.clone());
                Ok(session)
            }
            Err(e) => {
                // The new tokens are good; only the profile fetch failed.
                *self.client.session_state.write().await = SessionState::Unauthenticated;
                Err(e.into())
            }
        }
    }

    /// Refresh only when the stored expiry is inside the safety margin.
    /// Returns whether a refresh was performed.
    pub async fn refresh_if_needed(&self) -> Result<bool, SdkError> {
        let Some(bundle) = self.client.token_store.load() else {
            return Ok(false);
        };
        if !bundle.expires_within(expiry_safety_margin()) {
            return Ok(false);
        }
        self.refresh_inner(bundle).await?;
        Ok(true)
    }

    /// Periodic proactive refresh. Runs until the caller drops the future.
    ///
    /// Races with explicit refreshes are tolerated; see the module docs.
    pub async fn run_refresh_loop(&self) {
        loop {
            futures_timer::Delay::new(self.client.refresh_check_interval).await;
            if let Err(e) = self.refresh_if_needed().await {
                tracing::warn!(error = %e, "Periodic token refresh failed");
            }
        }
    }

    // ── Email login ──────────────────────────────────────────────────────

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SdkError> {
        let credentials = EmailCredentials {
            email: email.to_string(),
            password: password.to_string(),
            full_name: None,
        };
        let resp = self.client.http.signin(&credentials).await?;
        Ok(self.apply_auth_response(resp).await)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Session, SdkError> {
        let credentials = EmailCredentials {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.map(str::to_string),
        };
        let resp = self.client.http.signup(&credentials).await?;
        Ok(self.apply_auth_response(resp).await)
    }

    // ── OAuth ────────────────────────────────────────────────────────────

    /// Start an OAuth handshake. Returns the provider authorization URL the
    /// host should open (popup or full-page redirect).
    ///
    /// Any handshake already in flight is discarded — the newest initiate
    /// wins, matching what a user clicking twice expects.
    pub async fn begin_oauth(
        &self,
        provider: Provider,
        redirect_target: Option<&str>,
    ) -> Result<String, SdkError> {
        let resp = self
            .client
            .http
            .oauth_initiate(provider.as_str(), &self.client.redirect_uri)
            .await?;

        let handshake = OauthHandshake::new(
            provider,
            resp.state,
            redirect_target.map(str::to_string),
            self.client.app_origin.clone(),
        );
        *self.client.handshake.write().await = Some(handshake);
        Ok(resp.auth_url)
    }

    /// Finish the handshake with whatever the host observed.
    ///
    /// The stored handshake is consumed either way; a second call without a
    /// new `begin_oauth` fails with [`AuthError::NoHandshake`]. The
    /// code-exchange endpoint is only reached after CSRF state validation
    /// passes.
    pub async fn complete_oauth(&self, event: CallbackEvent) -> Result<OauthOutcome, SdkError> {
        let handshake = self
            .client
            .handshake
            .write()
            .await
            .take()
            .ok_or(SdkError::Auth(AuthError::NoHandshake))?;

        let csrf_state = handshake.csrf_state.clone();
        let code = handshake.consume(event)?;

        let resp = self
            .client
            .http
            .oauth_callback(
                code.provider.as_str(),
                &code.code,
                &csrf_state,
                &self.client.redirect_uri,
            )
            .await?;
        Ok(OauthOutcome {
            session: self.apply_auth_response(resp).await,
            redirect_target: code.redirect_target,
        })
    }

    // ── Logout ───────────────────────────────────────────────────────────

    /// Log out. The backend call is best-effort: its failure is logged and
    /// swallowed, because local teardown must always succeed.
    pub async fn logout(&self) {
        *self.client.session_state.write().await = SessionState::LoggingOut;

        if let Err(e) = self.client.http.logout().await {
            tracing::warn!(error = %e, "Backend logout failed; clearing local session anyway");
        }

        self.clear_local_session().await;
    }

    // ── Internals ────────────────────────────────────────────────────────

    async fn apply_auth_response(&self, resp: AuthResponse) -> Session {
        let bundle =
            TokenBundle::from_expires_in(resp.access_token, resp.refresh_token, resp.expires_in);
        self.client.token_store.save(&bundle);
        self.client
            .http
            .set_access_token(Some(bundle.access_token.clone()))
            .await;

        let session: Session = resp.user.into();
        *self.client.session_state.write().await = SessionState::Authenticated(session.clone());
        *self.client.just_signed_in_at.write().await = Some(Instant::now());
        session
    }

    async fn clear_local_session(&self) {
        self.client.token_store.clear();
        self.client.http.clear_access_token().await;
        *self.client.session_state.write().await = SessionState::Unauthenticated;
        *self.client.just_signed_in_at.write().await = None;
    }
}
