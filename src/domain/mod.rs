//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains some of:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching backend responses
//! - `convert.rs` — `TryFrom`/`From` conversions with validation
//! - `state.rs` — State containers with update methods
//! - `client.rs` — Sub-client with HTTP / chain methods

pub mod activity;
pub mod agent;
pub mod approval;
pub mod order;
pub mod orderbook;
pub mod vault;

/// `status_code` the orderbook backend returns on success.
pub(crate) const STATUS_OK: i64 = 1;
