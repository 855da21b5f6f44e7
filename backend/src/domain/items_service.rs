//! Item reporting and feed use-cases.
//!
//! `ItemsService` implements the [`ItemsCommand`] and [`ItemsQuery`] driving
//! ports over an [`ItemRepository`]. Reporting a found item triggers the
//! match-and-notify pipeline; that notification is best-effort and never
//! fails the report.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ItemRepository, ItemRepositoryError, ItemsCommand, ItemsQuery, LostItemNotifier,
    ReportItemResponse,
};
use crate::domain::{
    Error, Item, ItemDraft, ItemFilter, ItemId, ItemKind, ItemStatus, NotificationRequest, UserId,
};

/// Item use-cases backed by a repository and a notifier.
#[derive(Clone)]
pub struct ItemsService<R> {
    items: Arc<R>,
    notifier: Arc<dyn LostItemNotifier>,
    clock: Arc<dyn Clock>,
}

impl<R> ItemsService<R> {
    /// Create a new service.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use campus_finder::domain::{ItemsService, UnconfiguredNotifier};
    /// use campus_finder::outbound::memory::InMemoryItemRepository;
    ///
    /// let service = ItemsService::new(
    ///     Arc::new(InMemoryItemRepository::default()),
    ///     Arc::new(UnconfiguredNotifier::new("Missing RESEND_API_KEY")),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(items: Arc<R>, notifier: Arc<dyn LostItemNotifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            items,
            notifier,
            clock,
        }
    }
}

fn map_repository_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => {
            warn!(%message, "item store unreachable");
            Error::upstream_failure("Item store unavailable")
        }
        ItemRepositoryError::Query { message } => {
            warn!(%message, "item store query failed");
            Error::upstream_failure("Query failed")
        }
    }
}

fn newest_first(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by_key(|item| Reverse(item.created_at));
    items
}

impl<R> ItemsService<R>
where
    R: ItemRepository,
{
    async fn load(&self, id: &ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("item {id} not found")))
    }

    async fn load_owned(&self, owner: &UserId, id: &ItemId) -> Result<Item, Error> {
        let item = self.load(id).await?;
        if !item.is_owned_by(owner) {
            return Err(Error::forbidden("item belongs to another user"));
        }
        Ok(item)
    }

    async fn notify_matches(&self, item: &Item) -> Option<usize> {
        let request = NotificationRequest {
            category: item.category.clone(),
            found_item_id: Some(item.id.to_string()),
            found_by_user_id: Some(item.owner.clone()),
            found_item_title: Some(item.title.clone()),
        };
        match self.notifier.notify(request).await {
            Ok(outcome) => Some(outcome.recipient_count()),
            Err(error) => {
                warn!(
                    item_id = %item.id,
                    code = ?error.code(),
                    message = error.message(),
                    "found item stored but lost-item notification failed"
                );
                None
            }
        }
    }
}

#[async_trait]
impl<R> ItemsCommand for ItemsService<R>
where
    R: ItemRepository,
{
    async fn report_item(
        &self,
        owner: UserId,
        draft: ItemDraft,
    ) -> Result<ReportItemResponse, Error> {
        let item = Item::from_draft(ItemId::random(), owner, draft, self.clock.utc());
        self.items
            .insert(&item)
            .await
            .map_err(map_repository_error)?;
        info!(item_id = %item.id, kind = %item.kind, category = %item.category, "item reported");

        let notified_recipients = match item.kind {
            ItemKind::Found => self.notify_matches(&item).await,
            ItemKind::Lost => None,
        };
        Ok(ReportItemResponse {
            item,
            notified_recipients,
        })
    }

    async fn resolve_item(&self, owner: &UserId, id: &ItemId) -> Result<Item, Error> {
        let mut item = self.load_owned(owner, id).await?;
        let updated = self
            .items
            .update_status(id, ItemStatus::Resolved)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!("item {id} not found")));
        }
        item.status = ItemStatus::Resolved;
        info!(item_id = %id, "item resolved");
        Ok(item)
    }

    async fn delete_item(&self, owner: &UserId, id: &ItemId) -> Result<(), Error> {
        self.load_owned(owner, id).await?;
        let deleted = self.items.delete(id).await.map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("item {id} not found")));
        }
        info!(item_id = %id, "item deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> ItemsQuery for ItemsService<R>
where
    R: ItemRepository,
{
    async fn list_feed(&self, filter: ItemFilter) -> Result<Vec<Item>, Error> {
        let items = self
            .items
            .list_active(&filter)
            .await
            .map_err(map_repository_error)?;
        Ok(newest_first(
            items
                .into_iter()
                .filter(|item| item.is_active() && filter.matches(item))
                .collect(),
        ))
    }

    async fn get_item(&self, id: &ItemId) -> Result<Item, Error> {
        self.load(id).await
    }

    async fn list_owned(&self, owner: &UserId) -> Result<Vec<Item>, Error> {
        let items = self
            .items
            .list_by_owner(owner)
            .await
            .map_err(map_repository_error)?;
        Ok(newest_first(items))
    }
}

#[cfg(test)]
#[path = "items_service_tests.rs"]
mod tests;
