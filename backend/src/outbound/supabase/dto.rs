//! Row and payload shapes exchanged with Supabase.
//!
//! Rows decode into these DTOs first and map into domain items in one pass;
//! a malformed row fails the whole response. `contact_info` is nullable and
//! free text, so a null or blank value maps to no contact instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Category, ContactInfo, EmailAddress, Item, ItemId, ItemKind, ItemStatus, UserId,
};

/// One row of the `items` table.
#[derive(Debug, Deserialize)]
pub(super) struct ItemRowDto {
    id: Uuid,
    user_id: String,
    #[serde(rename = "type")]
    kind: String,
    title: String,
    description: Option<String>,
    category: String,
    location: Option<String>,
    contact_info: Option<String>,
    image_url: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl ItemRowDto {
    pub(super) fn into_domain(self) -> Result<Item, String> {
        let id = self.id;
        let context = |error: String| format!("item {id}: {error}");
        Ok(Item {
            id: ItemId::from_uuid(id),
            owner: UserId::new(&self.user_id).map_err(|e| context(e.to_string()))?,
            kind: self
                .kind
                .parse::<ItemKind>()
                .map_err(|e| context(e.to_string()))?,
            title: self.title,
            description: self.description,
            category: Category::new(self.category).map_err(|e| context(e.to_string()))?,
            location: self.location,
            contact: self
                .contact_info
                .and_then(|raw| ContactInfo::new(raw).ok()),
            image_url: self.image_url,
            status: self
                .status
                .parse::<ItemStatus>()
                .map_err(|e| context(e.to_string()))?,
            created_at: self.created_at,
        })
    }
}

/// Insert payload for the `items` table.
#[derive(Debug, Serialize)]
pub(super) struct NewItemRowDto<'a> {
    id: Uuid,
    user_id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    description: Option<&'a str>,
    category: &'a str,
    location: Option<&'a str>,
    contact_info: Option<&'a str>,
    image_url: Option<&'a str>,
    status: &'static str,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a Item> for NewItemRowDto<'a> {
    fn from(item: &'a Item) -> Self {
        Self {
            id: *item.id.as_uuid(),
            user_id: item.owner.as_ref(),
            kind: item.kind.as_str(),
            title: &item.title,
            description: item.description.as_deref(),
            category: item.category.as_ref(),
            location: item.location.as_deref(),
            contact_info: item.contact.as_ref().map(AsRef::as_ref),
            image_url: item.image_url.as_deref(),
            status: item.status.as_str(),
            created_at: item.created_at,
        }
    }
}

/// Status update payload.
#[derive(Debug, Serialize)]
pub(super) struct StatusPatchDto {
    pub(super) status: &'static str,
}

/// Subset of the Auth admin user object.
#[derive(Debug, Deserialize)]
pub(super) struct AdminUserDto {
    #[serde(default)]
    email: Option<String>,
}

impl AdminUserDto {
    /// Account email, when present and well formed.
    pub(super) fn into_email(self) -> Option<EmailAddress> {
        self.email.and_then(|raw| EmailAddress::new(raw).ok())
    }
}
