//! Token persistence — the only durable piece of authentication state.
//!
//! The store is injected into the client at construction, so tests run against
//! an in-memory store and applications pick whatever their platform offers
//! (browser local storage via a wasm shim, a JSON file for CLIs, a keychain).

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::auth::TokenBundle;

/// Origin-scoped persistent storage for the [`TokenBundle`].
///
/// Semantics follow browser local storage: operations are infallible from the
/// caller's perspective; implementations log their own failures. A load that
/// finds partial or corrupt data reports no bundle at all, preserving the
/// all-or-nothing invariant.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<TokenBundle>;
    fn save(&self, bundle: &TokenBundle);
    fn clear(&self);
}

// ─── MemoryTokenStore ────────────────────────────────────────────────────────

/// Volatile store. Default for tests and short-lived processes.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    bundle: Mutex<Option<TokenBundle>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<TokenBundle> {
        self.bundle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, bundle: &TokenBundle) {
        *self.bundle.lock().unwrap_or_else(PoisonError::into_inner) = Some(bundle.clone());
    }

    fn clear(&self) {
        *self.bundle.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// ─── FileTokenStore ──────────────────────────────────────────────────────────

/// JSON-file-backed store for native CLIs and desktop hosts.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<TokenBundle> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable token file");
                None
            }
        }
    }

    fn save(&self, bundle: &TokenBundle) {
        let json = match serde_json::to_string(bundle) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize token bundle");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist token bundle");
        }
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove token file");
            }
        }
    }
}
