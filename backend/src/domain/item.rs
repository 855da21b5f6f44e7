//! Lost-and-found item model.
//!
//! Items are reported by users as either lost or found, listed in the shared
//! feed while active, and resolved or deleted by their owner. Only active
//! lost items take part in notification matching.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EmailAddress, UserId};

/// Validation errors raised while building item components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Category was blank.
    #[error("category must not be empty")]
    EmptyCategory,
    /// Category carried leading or trailing whitespace.
    #[error("category must not have surrounding whitespace")]
    PaddedCategory,
    /// Contact information was blank.
    #[error("contact info must not be empty")]
    EmptyContact,
    /// Kind was neither `lost` nor `found`.
    #[error("item type must be lost or found, got {value}")]
    UnknownKind { value: String },
    /// Status was neither `active` nor `resolved`.
    #[error("item status must be active or resolved, got {value}")]
    UnknownStatus { value: String },
}

/// Stable item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Whether the reporter lost or found the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// The reporter is looking for this item.
    Lost,
    /// The reporter is holding this item.
    Found,
}

impl ItemKind {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ItemValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            other => Err(ItemValidationError::UnknownKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// Lifecycle state of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Listed in the feed and eligible for matching.
    Active,
    /// Closed by its owner.
    Resolved,
}

impl ItemStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ItemValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            other => Err(ItemValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Item category.
///
/// Categories are matched byte-for-byte: `Keys` and `keys` are different
/// categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Categories offered by the reporting form.
    pub const KNOWN: [&'static str; 8] = [
        "Electronics",
        "Books & Stationery",
        "Clothing & Accessories",
        "ID Cards & Documents",
        "Keys",
        "Bags & Backpacks",
        "Sports Equipment",
        "Other",
    ];

    /// Validate a category. Surrounding whitespace is rejected rather than
    /// trimmed so the stored value is exactly what matching compares.
    ///
    /// # Examples
    /// ```
    /// use campus_finder::domain::Category;
    ///
    /// let keys = Category::new("Keys").expect("valid category");
    /// assert_ne!(keys, Category::new("keys").expect("valid category"));
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, ItemValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ItemValidationError::EmptyCategory);
        }
        if raw.trim().len() != raw.len() {
            return Err(ItemValidationError::PaddedCategory);
        }
        Ok(Self(raw))
    }

    /// Whether the category is one of [`Category::KNOWN`].
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl TryFrom<String> for Category {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text contact details: an email address, a phone number, or anything
/// else the reporter typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactInfo(String);

impl ContactInfo {
    /// Validate contact details.
    pub fn new(raw: impl Into<String>) -> Result<Self, ItemValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ItemValidationError::EmptyContact);
        }
        Ok(Self(raw))
    }

    /// Interpret the contact as an email address when it contains `@`.
    ///
    /// # Examples
    /// ```
    /// use campus_finder::domain::ContactInfo;
    ///
    /// let email = ContactInfo::new(" a@x.com ").expect("valid contact");
    /// assert_eq!(email.as_email().map(|e| e.to_string()), Some("a@x.com".to_owned()));
    /// let phone = ContactInfo::new("phone:555-1234").expect("valid contact");
    /// assert!(phone.as_email().is_none());
    /// ```
    pub fn as_email(&self) -> Option<EmailAddress> {
        EmailAddress::new(&self.0).ok()
    }
}

impl AsRef<str> for ContactInfo {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ContactInfo> for String {
    fn from(value: ContactInfo) -> Self {
        value.0
    }
}

impl TryFrom<String> for ContactInfo {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated payload for reporting a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub kind: ItemKind,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub location: Option<String>,
    pub contact: ContactInfo,
    pub image_url: Option<String>,
}

impl ItemDraft {
    /// Build a draft, requiring a non-blank title. Blank optional text is
    /// dropped.
    pub fn new(
        kind: ItemKind,
        title: impl Into<String>,
        category: Category,
        contact: ContactInfo,
    ) -> Result<Self, ItemValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ItemValidationError::EmptyTitle);
        }
        Ok(Self {
            kind,
            title: title.trim().to_owned(),
            description: None,
            category,
            location: None,
            contact,
            image_url: None,
        })
    }

    /// Attach a free-text description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_blank(description);
        self
    }

    /// Attach where the item was lost or found.
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = non_blank(location);
        self
    }

    /// Attach a public photo URL.
    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = non_blank(image_url);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// A stored posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub owner: UserId,
    pub kind: ItemKind,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub location: Option<String>,
    /// Absent for rows stored without usable contact details.
    pub contact: Option<ContactInfo>,
    pub image_url: Option<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Materialise a freshly reported, active item.
    pub fn from_draft(id: ItemId, owner: UserId, draft: ItemDraft, created_at: DateTime<Utc>) -> Self {
        let ItemDraft {
            kind,
            title,
            description,
            category,
            location,
            contact,
            image_url,
        } = draft;
        Self {
            id,
            owner,
            kind,
            title,
            description,
            category,
            location,
            contact: Some(contact),
            image_url,
            status: ItemStatus::Active,
            created_at,
        }
    }

    /// Whether the item is listed and eligible for matching.
    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    /// Whether `user` owns this posting.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }
}

/// Feed filter. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub kind: Option<ItemKind>,
    pub category: Option<Category>,
}

impl ItemFilter {
    /// Whether `item` passes the filter. Category comparison is exact.
    pub fn matches(&self, item: &Item) -> bool {
        self.kind.is_none_or(|kind| item.kind == kind)
            && self
                .category
                .as_ref()
                .is_none_or(|category| &item.category == category)
    }
}
