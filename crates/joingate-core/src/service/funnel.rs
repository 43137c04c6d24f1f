//! Funnel service: runs the state machine and executes its effects.
//!
//! For each inbound update the service answers the callback (if any), loads
//! the user's session under a per-user lock, runs the pure transition, saves
//! the session, then executes effects in order. A membership lookup feeds its
//! result back into the transition as a follow-up event.
//!
//! Only session storage failures are returned as errors. Platform sends,
//! admin notices, and lead records are logged and swallowed.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use joingate_types::config::FunnelConfig;
use joingate_types::error::FunnelError;
use joingate_types::event::InboundUpdate;
use joingate_types::lead::LeadRecord;
use joingate_types::membership::MemberStatus;
use joingate_types::profile::UserProfile;
use joingate_types::reply::{ChatRef, OutboundMessage};
use joingate_types::session::{UserId, UserSession};

use crate::funnel::{Effect, FunnelContext, FunnelEvent, transition};
use crate::repository::session::SessionStore;
use crate::service::lead::LeadSink;
use crate::service::messenger::Messenger;

/// Service orchestrating the funnel for every user.
///
/// Generic over the session store, messenger, and lead sink so the core
/// crate never depends on joingate-infra.
pub struct FunnelService<S: SessionStore, M: Messenger, L: LeadSink> {
    store: S,
    messenger: M,
    leads: Option<L>,
    config: FunnelConfig,
    /// Serializes handling per user; updates for different users run freely.
    user_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl<S: SessionStore, M: Messenger, L: LeadSink> FunnelService<S, M, L> {
    /// Create a new FunnelService.
    ///
    /// - `store`: session persistence
    /// - `messenger`: outbound platform operations
    /// - `leads`: lead sink, `None` when no lead webhook is configured
    /// - `config`: funnel copy, links, and switches
    pub fn new(store: S, messenger: M, leads: Option<L>, config: FunnelConfig) -> Self {
        Self {
            store,
            messenger,
            leads,
            config,
            user_locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &FunnelConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    fn user_lock(&self, user_id: UserId) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Handle one inbound update and return the user's session afterwards.
    #[tracing::instrument(
        name = "funnel.handle",
        skip_all,
        fields(update_id = update.update_id, user_id = %update.sender.id)
    )]
    pub async fn handle(&self, update: &InboundUpdate) -> Result<UserSession, FunnelError> {
        if let Some(query_id) = update.callback_query_id() {
            if let Err(e) = self.messenger.answer_callback(query_id).await {
                tracing::warn!(error = %e, "failed to answer callback query");
            }
        }

        let lock = self.user_lock(update.sender.id);
        let result = {
            let _guard = lock.lock().await;
            self.run_locked(update).await
        };
        drop(lock);
        self.release_lock(update.sender.id);
        result
    }

    /// Drop the user's lock entry once no other update holds or awaits it.
    fn release_lock(&self, user_id: UserId) {
        self.user_locks
            .remove_if(&user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn run_locked(&self, update: &InboundUpdate) -> Result<UserSession, FunnelError> {
        let mut session = self.store.get_or_create(update.sender.id).await?;
        let chat = ChatRef::Id(update.chat_id);
        let mut next = Some(FunnelEvent::from(&update.event));

        while let Some(event) = next.take() {
            tracing::debug!(status = %session.status, event = ?event, "applying funnel event");
            if let FunnelEvent::UnknownAction(data) = &event {
                tracing::warn!(data = %data, "unknown callback action");
            }

            let ctx = FunnelContext {
                config: &self.config,
                profile: &update.sender,
                now: Utc::now(),
            };
            let from = session.status;
            let result = transition(session, event, &ctx);
            session = result.session;

            if session.status != from {
                tracing::info!(from = %from, to = %session.status, "funnel status changed");
            }
            self.store.save(&session).await?;

            for effect in result.effects {
                if let Some(follow_up) = self.execute(effect, &chat, &update.sender).await {
                    next = Some(follow_up);
                }
            }
        }

        Ok(session)
    }

    /// Execute one effect. Returns a follow-up event for effects that
    /// produce one.
    async fn execute(
        &self,
        effect: Effect,
        chat: &ChatRef,
        profile: &UserProfile,
    ) -> Option<FunnelEvent> {
        tracing::trace!(effect = effect.kind(), "executing effect");
        match effect {
            Effect::Reply(message) => {
                if let Err(e) = self.messenger.send_message(chat, &message).await {
                    tracing::warn!(chat = %chat, error = %e, "failed to send reply");
                }
                None
            }
            Effect::NotifyAdmin(text) => {
                self.notify_admin(text).await;
                None
            }
            Effect::CheckMembership => Some(FunnelEvent::MembershipChecked(
                self.check_membership(profile.id).await,
            )),
            Effect::RecordLead(lead) => {
                self.record_lead(&lead).await;
                None
            }
        }
    }

    async fn notify_admin(&self, text: String) {
        let Some(admin) = &self.config.admin_chat else {
            tracing::debug!("no admin chat configured, skipping notification");
            return;
        };
        if let Err(e) = self
            .messenger
            .send_message(admin, &OutboundMessage::text(text))
            .await
        {
            tracing::warn!(admin_chat = %admin, error = %e, "admin notification failed");
        }
    }

    async fn check_membership(&self, user_id: UserId) -> Result<MemberStatus, String> {
        let Some(group) = &self.config.group_id else {
            return Err("no verification group configured".to_string());
        };
        match self.messenger.member_status(group, user_id).await {
            Ok(status) => {
                tracing::debug!(group = %group, member_status = %status, "membership resolved");
                Ok(status)
            }
            Err(e) => {
                tracing::warn!(group = %group, error = %e, "membership lookup failed");
                Err(e.to_string())
            }
        }
    }

    async fn record_lead(&self, lead: &LeadRecord) {
        let Some(sink) = &self.leads else {
            tracing::debug!("no lead sink configured, skipping lead record");
            return;
        };
        match sink.record_lead(lead).await {
            Ok(()) => tracing::info!(has_email = lead.email.is_some(), "lead recorded"),
            Err(e) => tracing::warn!(error = %e, "failed to record lead"),
        }
    }
}
