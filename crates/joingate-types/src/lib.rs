//! Shared domain types for joingate.
//!
//! This crate contains the domain types used across the funnel bot:
//! user sessions, sender profiles, inbound events, outbound replies,
//! lead records, funnel configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod lead;
pub mod membership;
pub mod profile;
pub mod reply;
pub mod session;
