//! Item repository holding rows in process memory.
//!
//! Category comparisons here are exact, unlike the hosted store.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{Category, Item, ItemFilter, ItemId, ItemKind, ItemStatus, UserId};

/// `RwLock`-guarded item list.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: RwLock<Vec<Item>>,
}

impl InMemoryItemRepository {
    /// Start with `items` already stored.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    async fn collect(&self, keep: impl Fn(&Item) -> bool) -> Vec<Item> {
        let mut found: Vec<Item> = self
            .items
            .read()
            .await
            .iter()
            .filter(|item| keep(item))
            .cloned()
            .collect();
        found.sort_by_key(|item| Reverse(item.created_at));
        found
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find_active_by_kind_and_category(
        &self,
        kind: ItemKind,
        category: &Category,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        Ok(self
            .collect(|item| item.is_active() && item.kind == kind && &item.category == category)
            .await)
    }

    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(ItemRepositoryError::query(format!(
                "duplicate item id {}",
                item.id
            )));
        }
        items.push(item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| item.id == *id)
            .cloned())
    }

    async fn list_active(&self, filter: &ItemFilter) -> Result<Vec<Item>, ItemRepositoryError> {
        Ok(self
            .collect(|item| item.is_active() && filter.matches(item))
            .await)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Item>, ItemRepositoryError> {
        Ok(self.collect(|item| item.is_owned_by(owner)).await)
    }

    async fn update_status(
        &self,
        id: &ItemId,
        status: ItemStatus,
    ) -> Result<bool, ItemRepositoryError> {
        let mut items = self.items.write().await;
        Ok(items
            .iter_mut()
            .find(|item| item.id == *id)
            .map(|item| item.status = status)
            .is_some())
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != *id);
        Ok(items.len() != before)
    }
}
