//! Lost-and-found feed and listing handlers.
//!
//! ```text
//! GET    /api/v1/items?type=&category=
//! GET    /api/v1/items/{id}
//! POST   /api/v1/items
//! GET    /api/v1/me/items
//! POST   /api/v1/items/{id}/resolve
//! DELETE /api/v1/items/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ReportItemResponse;
use crate::domain::{Category, Error, Item, ItemDraft, ItemFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::payload::parse_json_body;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_contact, parse_item_id, parse_kind, parse_known_category, required_text,
};

/// Feed filter as sent by the board's dropdowns. `all` disables a filter.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
}

fn selected(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty() && raw != "all")
}

impl TryFrom<FeedQuery> for ItemFilter {
    type Error = Error;

    fn try_from(query: FeedQuery) -> Result<Self, Self::Error> {
        let kind = selected(query.kind)
            .map(|raw| parse_kind(&raw, FieldName::new("type")))
            .transpose()?;
        let category = selected(query.category)
            .map(Category::new)
            .transpose()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(Self { kind, category })
    }
}

/// Payload for reporting an item.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportItemRequest {
    /// `lost` or `found`.
    #[serde(rename = "type")]
    #[schema(example = "found")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "Electronics")]
    pub category: Option<String>,
    pub location: Option<String>,
    /// Email address or any other way to reach the reporter.
    pub contact_info: Option<String>,
    pub image_url: Option<String>,
}

impl TryFrom<ReportItemRequest> for ItemDraft {
    type Error = Error;

    fn try_from(body: ReportItemRequest) -> Result<Self, Self::Error> {
        let kind_field = FieldName::new("type");
        let kind = parse_kind(&required_text(body.kind, kind_field)?, kind_field)?;
        let title = required_text(body.title, FieldName::new("title"))?;
        let category_field = FieldName::new("category");
        let category = parse_known_category(
            required_text(body.category, category_field)?,
            category_field,
        )?;
        let contact_field = FieldName::new("contactInfo");
        let contact = parse_contact(required_text(body.contact_info, contact_field)?, contact_field)?;

        let draft = ItemDraft::new(kind, title, category, contact)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(draft
            .with_description(body.description)
            .with_location(body.location)
            .with_image_url(body.image_url))
    }
}

/// Item as presented to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    #[schema(example = "7b0c3f3e-5a53-4c8e-9d3d-0f4a1f6f2c11")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    #[schema(example = "lost")]
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub image_url: Option<String>,
    #[schema(example = "active")]
    pub status: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.to_string(),
            user_id: item.owner.to_string(),
            kind: item.kind.to_string(),
            title: item.title,
            description: item.description,
            category: item.category.into(),
            location: item.location,
            contact_info: item.contact.map(Into::into),
            image_url: item.image_url,
            status: item.status.to_string(),
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

/// Response for a newly reported item.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportItemResponseBody {
    pub item: ItemResponse,
    /// Owners emailed about a found item; absent when nobody was notified.
    pub notified_recipients: Option<usize>,
}

impl From<ReportItemResponse> for ReportItemResponseBody {
    fn from(value: ReportItemResponse) -> Self {
        Self {
            item: value.item.into(),
            notified_recipients: value.notified_recipients,
        }
    }
}

fn item_list(items: Vec<Item>) -> Vec<ItemResponse> {
    items.into_iter().map(ItemResponse::from).collect()
}

/// Browse active items.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(
        ("type" = Option<String>, Query, description = "lost, found or all"),
        ("category" = Option<String>, Query, description = "Exact category, or all")
    ),
    responses(
        (status = 200, description = "Active items, newest first", body = [ItemResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 500, description = "Item store failure", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "listItems"
)]
#[get("/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    query: web::Query<FeedQuery>,
) -> ApiResult<HttpResponse> {
    let filter = ItemFilter::try_from(query.into_inner())?;
    let items = state.items_query.list_feed(filter).await?;
    Ok(HttpResponse::Ok().json(item_list(items)))
}

/// Fetch one item.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item", body = ItemResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No such item", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "getItem"
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_item_id(&path.into_inner())?;
    let item = state.items_query.get_item(&id).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// Report a lost or found item.
///
/// Reporting a found item emails owners of matching lost items. That step is
/// best-effort and never fails the report.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = ReportItemRequest,
    params(("X-User-Id" = String, Header, description = "Authenticated account id")),
    responses(
        (status = 201, description = "Item stored", body = ReportItemResponseBody),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Caller not identified", body = ErrorSchema),
        (status = 500, description = "Item store failure", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "reportItem"
)]
#[post("/items")]
pub async fn report_item(
    state: web::Data<HttpState>,
    caller: Caller,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let payload: ReportItemRequest = parse_json_body(&body)?;
    let draft = ItemDraft::try_from(payload)?;
    let Caller(owner) = caller;
    let response = state.items.report_item(owner, draft).await?;
    Ok(HttpResponse::Created().json(ReportItemResponseBody::from(response)))
}

/// List the caller's own items, including resolved ones.
#[utoipa::path(
    get,
    path = "/api/v1/me/items",
    params(("X-User-Id" = String, Header, description = "Authenticated account id")),
    responses(
        (status = 200, description = "Caller's items, newest first", body = [ItemResponse]),
        (status = 401, description = "Caller not identified", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "listMyItems"
)]
#[get("/me/items")]
pub async fn list_my_items(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<HttpResponse> {
    let items = state.items_query.list_owned(caller.user_id()).await?;
    Ok(HttpResponse::Ok().json(item_list(items)))
}

/// Mark the caller's item as resolved.
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/resolve",
    params(
        ("id" = String, Path, description = "Item identifier"),
        ("X-User-Id" = String, Header, description = "Authenticated account id")
    ),
    responses(
        (status = 200, description = "Resolved item", body = ItemResponse),
        (status = 401, description = "Caller not identified", body = ErrorSchema),
        (status = 403, description = "Item belongs to another user", body = ErrorSchema),
        (status = 404, description = "No such item", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "resolveItem"
)]
#[post("/items/{id}/resolve")]
pub async fn resolve_item(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_item_id(&path.into_inner())?;
    let item = state.items.resolve_item(caller.user_id(), &id).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// Delete the caller's item.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(
        ("id" = String, Path, description = "Item identifier"),
        ("X-User-Id" = String, Header, description = "Authenticated account id")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Caller not identified", body = ErrorSchema),
        (status = 403, description = "Item belongs to another user", body = ErrorSchema),
        (status = 404, description = "No such item", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "deleteItem"
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_item_id(&path.into_inner())?;
    state.items.delete_item(caller.user_id(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the item handlers on an `/api/v1` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_items)
        .service(get_item)
        .service(report_item)
        .service(list_my_items)
        .service(resolve_item)
        .service(delete_item);
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
