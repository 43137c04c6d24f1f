//! Telegram Bot API integration.
//!
//! This module provides the [`TelegramClient`] which implements the
//! [`Messenger`](joingate_core::service::Messenger) trait, plus the raw wire
//! types and the mapping from raw updates into the funnel's inbound events.

pub mod client;
pub mod mapping;
pub mod types;

pub use client::TelegramClient;
pub use mapping::to_inbound;
pub use types::Update;
