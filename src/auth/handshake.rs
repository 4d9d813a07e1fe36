//! OAuth handshake — CSRF state validation between initiate and callback.
//!
//! The handshake is expressed independently of any browser API. The host
//! (popup poller, redirect route, desktop deep-link handler) turns whatever it
//! observes into a [`CallbackEvent`] and feeds it to [`OauthHandshake::consume`].
//! Validation order: delivery failure → origin/kind → provider error → CSRF
//! state → code presence. The handshake is consumed by value, so it is
//! single-use by construction — success or failure, it is gone afterwards.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::auth::Provider;
use crate::error::AuthError;

/// Message kind the callback page posts to its opener.
pub const CALLBACK_KIND: &str = "OAUTH_CALLBACK";

/// Length of a locally generated CSRF state nonce.
const STATE_LEN: usize = 32;

/// Typed payload of the cross-window callback message.
///
/// Mirrors the `postMessage` contract
/// `{type:'OAUTH_CALLBACK', code?, state?, error?, error_description?}` with
/// the sender origin attached by the receiving host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    /// Origin of the window that posted the message. Not part of the JSON
    /// payload — the host reads it from the message event.
    #[serde(skip)]
    pub origin: String,
}

impl CallbackMessage {
    /// A successful callback as the callback route would post it.
    pub fn success(code: &str, state: &str, origin: &str) -> Self {
        Self {
            kind: CALLBACK_KIND.to_string(),
            code: Some(code.to_string()),
            state: Some(state.to_string()),
            error: None,
            error_description: None,
            origin: origin.to_string(),
        }
    }
}

/// What the host observed while waiting for the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    /// The callback page delivered its message.
    Message(CallbackMessage),
    /// The popup closed before any message arrived — user cancellation.
    WindowClosed,
    /// The popup never opened. Terminal, and distinct from cancellation.
    PopupBlocked,
}

/// A validated authorization code, ready for the backend exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationCode {
    pub provider: Provider,
    pub code: String,
    /// Where to navigate after the exchange completes.
    pub redirect_target: Option<String>,
}

/// In-flight handshake state between the initiate and callback steps.
///
/// Ephemeral: one slot per client, overwritten by a new initiate, destroyed on
/// consumption.
#[derive(Debug, Clone)]
pub struct OauthHandshake {
    pub provider: Provider,
    pub csrf_state: String,
    pub redirect_target: Option<String>,
    expected_origin: String,
}

impl OauthHandshake {
    pub fn new(
        provider: Provider,
        csrf_state: String,
        redirect_target: Option<String>,
        expected_origin: String,
    ) -> Self {
        Self {
            provider,
            csrf_state,
            redirect_target,
            expected_origin,
        }
    }

    /// Generate a fresh CSRF state nonce for flows where the client, not the
    /// backend, mints the state.
    pub fn generate_state() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect()
    }

    /// Consume the handshake with the event the host observed.
    ///
    /// On `Ok`, the returned code may be exchanged with the backend. Any `Err`
    /// is terminal for this handshake; the flow must be re-initiated.
    pub fn consume(self, event: CallbackEvent) -> Result<AuthorizationCode, AuthError> {
        let msg = match event {
            CallbackEvent::PopupBlocked => return Err(AuthError::PopupBlocked),
            CallbackEvent::WindowClosed => return Err(AuthError::Cancelled),
            CallbackEvent::Message(msg) => msg,
        };

        if msg.origin != self.expected_origin {
            return Err(AuthError::InvalidCallback(format!(
                "unexpected origin {}",
                msg.origin
            )));
        }
        if msg.kind != CALLBACK_KIND {
            return Err(AuthError::InvalidCallback(format!(
                "unexpected message type {}",
                msg.kind
            )));
        }

        if let Some(error) = msg.error {
            return Err(AuthError::ProviderError {
                error,
                description: msg.error_description,
            });
        }

        // CSRF check: the provider must echo back exactly the state we stored.
        match msg.state {
            Some(ref s) if *s == self.csrf_state => {}
            _ => return Err(AuthError::StateMismatch),
        }

        let code = msg
            .code
            .ok_or_else(|| AuthError::InvalidCallback("callback carried no code".to_string()))?;

        Ok(AuthorizationCode {
            provider: self.provider,
            code,
            redirect_target: self.redirect_target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://app.example.com";

    fn handshake() -> OauthHandshake {
        OauthHandshake::new(
            Provider::Google,
            "state-123".to_string(),
            Some("/dashboard".to_string()),
            ORIGIN.to_string(),
        )
    }

    #[test]
    fn test_successful_consumption() {
        let code = handshake()
            .consume(CallbackEvent::Message(CallbackMessage::success(
                "code-xyz",
                "state-123",
                ORIGIN,
            )))
            .unwrap();
        assert_eq!(code.code, "code-xyz");
        assert_eq!(code.provider, Provider::Google);
        assert_eq!(code.redirect_target.as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_state_mismatch_is_terminal() {
        let err = handshake()
            .consume(CallbackEvent::Message(CallbackMessage::success(
                "code-xyz",
                "state-OTHER",
                ORIGIN,
            )))
            .unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch));
    }

    #[test]
    fn test_missing_state_is_mismatch() {
        let mut msg = CallbackMessage::success("code-xyz", "ignored", ORIGIN);
        msg.state = None;
        let err = handshake().consume(CallbackEvent::Message(msg)).unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch));
    }

    #[test]
    fn test_window_closed_is_cancellation() {
        let err = handshake().consume(CallbackEvent::WindowClosed).unwrap_err();
        assert!(matches!(err, AuthError::Cancelled));
    }

    #[test]
    fn test_popup_blocked_is_distinct_from_cancellation() {
        let err = handshake().consume(CallbackEvent::PopupBlocked).unwrap_err();
        assert!(matches!(err, AuthError::PopupBlocked));
    }

    #[test]
    fn test_provider_error_short_circuits_state_check() {
        let msg = CallbackMessage {
            kind: CALLBACK_KIND.to_string(),
            code: None,
            state: Some("state-OTHER".to_string()),
            error: Some("access_denied".to_string()),
            error_description: Some("User denied consent".to_string()),
            origin: ORIGIN.to_string(),
        };
        let err = handshake().consume(CallbackEvent::Message(msg)).unwrap_err();
        match err {
            AuthError::ProviderError { error, description } => {
                assert_eq!(error, "access_denied");
                assert_eq!(description.as_deref(), Some("User denied consent"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_foreign_origin_rejected() {
        let err = handshake()
            .consume(CallbackEvent::Message(CallbackMessage::success(
                "code-xyz",
                "state-123",
                "https://evil.example.net",
            )))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCallback(_)));
    }

    #[test]
    fn test_wrong_message_kind_rejected() {
        let mut msg = CallbackMessage::success("code-xyz", "state-123", ORIGIN);
        msg.kind = "SOMETHING_ELSE".to_string();
        let err = handshake().consume(CallbackEvent::Message(msg)).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCallback(_)));
    }

    #[test]
    fn test_generated_state_is_unique_enough() {
        let a = OauthHandshake::generate_state();
        let b = OauthHandshake::generate_state();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_callback_message_wire_shape() {
        let msg: CallbackMessage = serde_json::from_str(
            r#"{"type":"OAUTH_CALLBACK","code":"c1","state":"s1"}"#,
        )
        .unwrap();
        assert_eq!(msg.kind, CALLBACK_KIND);
        assert_eq!(msg.code.as_deref(), Some("c1"));
        // origin is host-attached, never part of the payload
        assert_eq!(msg.origin, "");
    }
}
