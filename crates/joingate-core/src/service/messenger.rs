//! Messaging platform trait.
//!
//! Implementations wrap a concrete bot API (e.g., `TelegramClient` in
//! joingate-infra). Uses RPITIT (native async fn in traits, Rust 2024 edition).

use joingate_types::error::MessengerError;
use joingate_types::membership::MemberStatus;
use joingate_types::reply::{ChatRef, OutboundMessage};
use joingate_types::session::UserId;

/// Outbound operations the funnel needs from the messaging platform.
pub trait Messenger: Send + Sync {
    /// Send a text message, optionally with inline buttons.
    fn send_message(
        &self,
        chat: &ChatRef,
        message: &OutboundMessage,
    ) -> impl std::future::Future<Output = Result<(), MessengerError>> + Send;

    /// Look up `user`'s membership status in `group`.
    fn member_status(
        &self,
        group: &ChatRef,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<MemberStatus, MessengerError>> + Send;

    /// Acknowledge a button press so the client stops its spinner.
    fn answer_callback(
        &self,
        query_id: &str,
    ) -> impl std::future::Future<Output = Result<(), MessengerError>> + Send;
}
