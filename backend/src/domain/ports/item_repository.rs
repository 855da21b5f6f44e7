//! Driven port for the item store.
//!
//! The store is an external relational table; adapters translate these
//! operations into its query primitives. Candidate lookups for notification
//! matching are read-only and may be eventually consistent with the write
//! that triggered them.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Category, Item, ItemFilter, ItemId, ItemKind, ItemStatus, UserId};

define_port_error! {
    /// Errors raised by item store adapters.
    pub enum ItemRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "item store connection failed: {message}",
        /// The store rejected or failed the query.
        Query { message: String } =>
            "item store query failed: {message}",
    }
}

/// Port for reading and mutating stored items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Return active items of `kind` in `category`.
    ///
    /// Implementations apply the filter server-side; callers must not rely on
    /// the comparison being case-sensitive.
    async fn find_active_by_kind_and_category(
        &self,
        kind: ItemKind,
        category: &Category,
    ) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Persist a new item.
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// Load one item.
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError>;

    /// Active items passing `filter`, newest first.
    ///
    /// As with candidate lookups, the category comparison may be
    /// case-insensitive.
    async fn list_active(&self, filter: &ItemFilter) -> Result<Vec<Item>, ItemRepositoryError>;

    /// All items posted by `owner` regardless of status, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Set the status of an item. Returns `false` when the item is absent.
    async fn update_status(
        &self,
        id: &ItemId,
        status: ItemStatus,
    ) -> Result<bool, ItemRepositoryError>;

    /// Remove an item. Returns `false` when the item is absent.
    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError>;
}
