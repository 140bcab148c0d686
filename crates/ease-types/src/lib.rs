//! Shared domain types for Ease.
//!
//! This crate contains the core domain types used across the Ease
//! conversation engine: messages, sessions, voice turn states, events,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod session;
