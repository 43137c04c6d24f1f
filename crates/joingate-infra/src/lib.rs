//! Infrastructure layer for joingate.
//!
//! Contains implementations of the ports defined in `joingate-core`:
//! the Telegram Bot API client (messenger), the lead webhook sink, the
//! SQLite session store, plus configuration loading from TOML and the
//! environment.

pub mod config;
pub mod lead;
pub mod sqlite;
pub mod store;
pub mod telegram;
