//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching backend responses
//! - `convert.rs` — `TryFrom`/`From` conversions with validation (where needed)
//! - `state.rs` — State containers with update methods (for incrementally fetched data)
//! - `client.rs` — Sub-client with HTTP methods

pub mod bot;
pub mod equity;
pub mod exchange_binding;
pub mod trading;
