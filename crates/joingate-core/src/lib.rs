//! Business logic and port trait definitions for joingate.
//!
//! This crate defines the "ports" (session store, messenger, lead sink) that
//! the infrastructure layer implements, the pure funnel state machine, and
//! the service that interprets its effects. It depends only on
//! `joingate-types` -- never on `joingate-infra` or any HTTP/database crate.

pub mod funnel;
pub mod repository;
pub mod service;
