//! Network URL constants for the Quantflow SDK.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.quantflow.app";

/// API version prefix appended to the base URL for every endpoint.
pub const API_PREFIX: &str = "/v1";

/// Origin accepted for OAuth callback messages when none is configured.
pub const DEFAULT_APP_ORIGIN: &str = "https://app.quantflow.app";
