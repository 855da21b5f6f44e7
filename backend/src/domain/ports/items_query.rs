//! Driving port for reading the item feed.

use async_trait::async_trait;

use crate::domain::{Error, Item, ItemFilter, ItemId, UserId};

/// Use-case port for browsing items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsQuery: Send + Sync {
    /// Active items passing `filter`, newest first.
    async fn list_feed(&self, filter: ItemFilter) -> Result<Vec<Item>, Error>;

    /// One item by id, active or not.
    async fn get_item(&self, id: &ItemId) -> Result<Item, Error>;

    /// Every item posted by `owner`, newest first.
    async fn list_owned(&self, owner: &UserId) -> Result<Vec<Item>, Error>;
}
