//! Driving port for item mutations.

use async_trait::async_trait;

use crate::domain::{Error, Item, ItemDraft, ItemId, UserId};

/// Response returned after reporting an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItemResponse {
    /// The stored item.
    pub item: Item,
    /// Recipients emailed about a found item. `None` when no notification was
    /// attempted or the attempt failed.
    pub notified_recipients: Option<usize>,
}

/// Use-case port for reporting, resolving and deleting items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsCommand: Send + Sync {
    /// Store a new active item owned by `owner`.
    async fn report_item(&self, owner: UserId, draft: ItemDraft)
    -> Result<ReportItemResponse, Error>;

    /// Mark the caller's item as resolved.
    async fn resolve_item(&self, owner: &UserId, id: &ItemId) -> Result<Item, Error>;

    /// Delete the caller's item.
    async fn delete_item(&self, owner: &UserId, id: &ItemId) -> Result<(), Error>;
}
