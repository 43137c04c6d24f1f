//! Service layer: outbound port traits and the funnel service.
//!
//! - `messenger` -- `Messenger` trait for the messaging platform
//! - `lead` -- `LeadSink` trait for recording leads
//! - `funnel` -- `FunnelService`, which runs the state machine and executes effects

pub mod funnel;
pub mod lead;
pub mod messenger;

pub use funnel::FunnelService;
pub use lead::LeadSink;
pub use messenger::Messenger;
