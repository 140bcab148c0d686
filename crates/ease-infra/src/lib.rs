//! Infrastructure implementations of the Ease core ports.
//!
//! - `generator`: the canned (randomized) responder and the deterministic
//!   scripted responder behind `ResponseGenerator`.
//! - `history`: in-memory `SessionHistoryRepository`.
//! - `config`: TOML config loader.

pub mod config;
pub mod generator;
pub mod history;
