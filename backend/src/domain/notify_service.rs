//! Match-and-notify service.
//!
//! Implements the [`LostItemNotifier`] driving port over the item store,
//! identity provider and email provider ports. Each call is independent and
//! stateless: it owns its recipient set and message for its own lifetime,
//! sends at most one email, and never retries.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::domain::ports::{
    EmailDispatchError, EmailDispatcher, IdentityResolver, IdentityResolverError, ItemRepository,
    ItemRepositoryError, LostItemNotifier,
};
use crate::domain::{
    ContactInfo, Error, Item, ItemKind, NotificationMessage, NotificationRequest, NotificationSettings, NotifyOutcome,
    RecipientSet, UserId, exact_lost_matches,
};

fn map_store_error(error: ItemRepositoryError) -> Error {
    error!(%error, "candidate query failed");
    Error::upstream_failure("Query failed")
}

fn map_identity_error(error: IdentityResolverError) -> Error {
    error!(%error, "identity lookup failed");
    Error::upstream_failure("Identity lookup failed")
}

fn map_dispatch_error(error: EmailDispatchError) -> Error {
    let details = match error {
        EmailDispatchError::Rejected { status, body } => {
            error!(status, %body, "email provider rejected dispatch");
            body
        }
        EmailDispatchError::Transport { message } => {
            error!(%message, "email provider unreachable");
            message
        }
    };
    Error::dispatch_failure("Email send failed").with_details(Value::String(details))
}

/// Pipeline notifying owners of active lost items when a found item appears.
#[derive(Clone)]
pub struct MatchNotifyService<S, R, D> {
    items: Arc<S>,
    identities: Arc<R>,
    dispatcher: Arc<D>,
    settings: NotificationSettings,
}

impl<S, R, D> MatchNotifyService<S, R, D> {
    /// Wire the pipeline to its ports.
    pub fn new(
        items: Arc<S>,
        identities: Arc<R>,
        dispatcher: Arc<D>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            items,
            identities,
            dispatcher,
            settings,
        }
    }
}

impl<S, R, D> MatchNotifyService<S, R, D>
where
    S: ItemRepository,
    R: IdentityResolver,
    D: EmailDispatcher,
{
    async fn collect_recipients(
        &self,
        request: &NotificationRequest,
        matches: &[Item],
    ) -> Result<RecipientSet, Error> {
        let poster_email = match &request.found_by_user_id {
            Some(poster) => self
                .identities
                .resolve_email(poster)
                .await
                .map_err(map_identity_error)?,
            None => None,
        };
        let mut recipients = RecipientSet::excluding(poster_email.as_ref());

        recipients.extend(
            matches
                .iter()
                .filter_map(|item| item.contact.as_ref().and_then(ContactInfo::as_email)),
        );

        // One lookup per distinct owner; results merge only after all complete.
        let owners: BTreeSet<&UserId> = matches.iter().map(|item| &item.owner).collect();
        debug!(owners = owners.len(), "resolving owner emails");
        let lookups = owners
            .into_iter()
            .map(|owner| self.identities.resolve_email(owner));
        let resolved = try_join_all(lookups).await.map_err(map_identity_error)?;
        recipients.extend(resolved.into_iter().flatten());

        Ok(recipients)
    }
}

#[async_trait]
impl<S, R, D> LostItemNotifier for MatchNotifyService<S, R, D>
where
    S: ItemRepository,
    R: IdentityResolver,
    D: EmailDispatcher,
{
    async fn notify(&self, request: NotificationRequest) -> Result<NotifyOutcome, Error> {
        let candidates = self
            .items
            .find_active_by_kind_and_category(ItemKind::Lost, &request.category)
            .await
            .map_err(map_store_error)?;
        let fetched = candidates.len();
        let matches = exact_lost_matches(&request.category, candidates);
        if matches.is_empty() {
            info!(category = %request.category, fetched, "no matching lost items");
            return Ok(NotifyOutcome::NoMatchingItems);
        }

        let recipients = self.collect_recipients(&request, &matches).await?;
        if recipients.is_empty() {
            info!(category = %request.category, matches = matches.len(), "no recipients");
            return Ok(NotifyOutcome::NoRecipients);
        }

        let count = recipients.len();
        let message = NotificationMessage::render(&request, recipients, &self.settings);
        let receipt = self
            .dispatcher
            .dispatch(&message)
            .await
            .map_err(map_dispatch_error)?;

        info!(category = %request.category, recipients = count, "notifications sent");
        Ok(NotifyOutcome::Sent {
            recipients: count,
            receipt,
        })
    }
}

/// Notifier installed when deployment configuration is incomplete.
///
/// Requests are still validated by the inbound adapter, so callers see
/// `Missing category` before this configuration error.
#[derive(Debug, Clone)]
pub struct UnconfiguredNotifier {
    message: String,
}

impl UnconfiguredNotifier {
    /// Report `message` (e.g. `Missing RESEND_API_KEY`) on every call.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LostItemNotifier for UnconfiguredNotifier {
    async fn notify(&self, _request: NotificationRequest) -> Result<NotifyOutcome, Error> {
        error!(reason = %self.message, "notification pipeline is not configured");
        Err(Error::configuration_missing(self.message.clone()))
    }
}

#[cfg(test)]
#[path = "notify_service_tests.rs"]
mod tests;
