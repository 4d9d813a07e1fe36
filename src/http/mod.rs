//! HTTP client layer — `QuantflowHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;
pub mod wire;

pub use client::QuantflowHttp;
pub use retry::{RetryConfig, RetryPolicy};
pub use wire::Envelope;
