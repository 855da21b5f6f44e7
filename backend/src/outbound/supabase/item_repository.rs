//! PostgREST-backed item store adapter.
//!
//! Filters are pushed to the server as `column=eq.value` query parameters.
//! The server may compare text with a case-insensitive collation, so callers
//! re-check categories themselves.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::{SupabaseClient, status_message};
use super::dto::{ItemRowDto, NewItemRowDto, StatusPatchDto};
use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{Category, Item, ItemFilter, ItemId, ItemKind, ItemStatus, UserId};

const ITEMS_PATH: [&str; 3] = ["rest", "v1", "items"];
const NEWEST_FIRST: (&str, &str) = ("order", "created_at.desc");

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

/// Item repository backed by the `items` table.
#[derive(Clone)]
pub struct SupabaseItemRepository {
    client: SupabaseClient,
}

impl SupabaseItemRepository {
    /// Create an adapter using a shared client.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn items_url(&self) -> Result<Url, ItemRepositoryError> {
        self.client
            .endpoint(&ITEMS_PATH)
            .map_err(ItemRepositoryError::query)
    }

    async fn select(&self, filters: &[(&str, String)]) -> Result<Vec<Item>, ItemRepositoryError> {
        let request = self
            .client
            .get(self.items_url()?)
            .query(&[("select", "*")])
            .query(filters)
            .query(&[NEWEST_FIRST]);
        let rows: Vec<ItemRowDto> = decode(send(request).await?).await?;
        debug!(rows = rows.len(), "item rows fetched");
        rows.into_iter()
            .map(|row| row.into_domain().map_err(ItemRepositoryError::query))
            .collect()
    }

    /// Run a mutation returning the affected rows and report whether any were.
    async fn mutate(&self, request: RequestBuilder) -> Result<bool, ItemRepositoryError> {
        let request = request.header("Prefer", "return=representation");
        let affected: Vec<serde_json::Value> = decode(send(request).await?).await?;
        Ok(!affected.is_empty())
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ItemRepositoryError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.map_err(map_transport_error)?;
    Err(ItemRepositoryError::query(status_message(status, &body)))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ItemRepositoryError> {
    let body = response.bytes().await.map_err(map_transport_error)?;
    serde_json::from_slice(&body).map_err(|error| {
        ItemRepositoryError::query(format!("invalid item store payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> ItemRepositoryError {
    ItemRepositoryError::connection(error.to_string())
}

#[async_trait]
impl ItemRepository for SupabaseItemRepository {
    async fn find_active_by_kind_and_category(
        &self,
        kind: ItemKind,
        category: &Category,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        self.select(&[
            ("type", eq(kind)),
            ("category", eq(category)),
            ("status", eq(ItemStatus::Active)),
        ])
        .await
    }

    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let request = self
            .client
            .post(self.items_url()?)
            .header("Prefer", "return=minimal")
            .json(&NewItemRowDto::from(item));
        send(request).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        Ok(self.select(&[("id", eq(id))]).await?.into_iter().next())
    }

    async fn list_active(&self, filter: &ItemFilter) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut filters = vec![("status", eq(ItemStatus::Active))];
        if let Some(kind) = filter.kind {
            filters.push(("type", eq(kind)));
        }
        if let Some(category) = &filter.category {
            filters.push(("category", eq(category)));
        }
        self.select(&filters).await
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Item>, ItemRepositoryError> {
        self.select(&[("user_id", eq(owner))]).await
    }

    async fn update_status(
        &self,
        id: &ItemId,
        status: ItemStatus,
    ) -> Result<bool, ItemRepositoryError> {
        let request = self
            .client
            .patch(self.items_url()?)
            .query(&[("id", eq(id))])
            .json(&StatusPatchDto {
                status: status.as_str(),
            });
        self.mutate(request).await
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError> {
        let request = self.client.delete(self.items_url()?).query(&[("id", eq(id))]);
        self.mutate(request).await
    }
}

#[cfg(test)]
#[path = "item_repository_tests.rs"]
mod tests;
