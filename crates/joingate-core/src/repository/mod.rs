//! Session store trait definition (port) and the in-process implementation.
//!
//! The infrastructure layer (joingate-infra) provides durable backends.
//! The core crate never depends on any specific storage technology.

pub mod memory;
pub mod session;

pub use memory::InMemorySessionStore;
pub use session::{SessionFilter, SessionStore};
