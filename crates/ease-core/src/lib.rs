//! Conversation engine and port definitions for Ease.
//!
//! This crate holds the session state machines (text turns and voice
//! turns) plus the "ports" the infrastructure layer implements: the
//! `ResponseGenerator` behind every assistant reply and the
//! `SessionHistoryRepository` behind the sidebar history list. It depends
//! only on `ease-types` -- never on `ease-infra` or any IO crate.

pub mod bus;
pub mod generator;
pub mod history;
pub mod session;
pub mod store;
pub mod voice;
