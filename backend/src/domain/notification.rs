//! Match-and-notify primitives.
//!
//! When a found item is posted, owners of active lost items in the same
//! category are emailed once. This module holds the pure pieces of that
//! pipeline: request validation, the exact-match candidate filter, the
//! deduplicated recipient set and message rendering. Orchestration against
//! the ports lives in [`crate::domain::MatchNotifyService`].

use std::collections::HashSet;

use serde_json::Value;

use super::{
    Category, EmailAddress, Error, Item, ItemKind, ItemStatus, ItemValidationError, UserId,
};

/// Sender used when no override is configured.
pub const DEFAULT_EMAIL_FROM: &str = "Campus Finder <onboarding@resend.dev>";
/// Site link used when no site URL is configured.
pub const DEFAULT_SITE_URL: &str = "https://";

/// Validated notification trigger emitted after a found item is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub category: Category,
    pub found_item_id: Option<String>,
    pub found_by_user_id: Option<UserId>,
    pub found_item_title: Option<String>,
}

impl NotificationRequest {
    /// Validate raw trigger fields. A blank or absent category is rejected
    /// with `Missing category`; blank optional fields are treated as absent.
    ///
    /// # Examples
    /// ```
    /// use campus_finder::domain::{ErrorCode, NotificationRequest};
    ///
    /// let err = NotificationRequest::new(None, None, None, None).expect_err("no category");
    /// assert_eq!(err.code(), ErrorCode::InvalidRequest);
    ///
    /// let request = NotificationRequest::new(
    ///     Some("Keys".to_owned()),
    ///     Some("".to_owned()),
    ///     None,
    ///     Some("Red lanyard".to_owned()),
    /// )
    /// .expect("valid request");
    /// assert!(request.found_item_id.is_none());
    /// ```
    pub fn new(
        category: Option<String>,
        found_item_id: Option<String>,
        found_by_user_id: Option<String>,
        found_item_title: Option<String>,
    ) -> Result<Self, Error> {
        let category = match category.map(Category::new) {
            None | Some(Err(ItemValidationError::EmptyCategory)) => {
                return Err(Error::invalid_request("Missing category"));
            }
            Some(Err(err)) => {
                return Err(Error::invalid_request(format!("Invalid category: {err}")));
            }
            Some(Ok(category)) => category,
        };
        let found_by_user_id = present(found_by_user_id)
            .map(UserId::new)
            .transpose()
            .map_err(|err| Error::invalid_request(format!("Invalid foundByUserId: {err}")))?;
        Ok(Self {
            category,
            found_item_id: present(found_item_id),
            found_by_user_id,
            found_item_title: present(found_item_title),
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Keep only active lost items whose category equals `category` byte-for-byte.
///
/// The store query already filters on these columns, but its string
/// comparison may follow a case-insensitive collation; this re-check is the
/// authoritative match.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use campus_finder::domain::{
///     exact_lost_matches, Category, ContactInfo, Item, ItemDraft, ItemId, ItemKind, UserId,
/// };
///
/// let item = |category: &str| {
///     let draft = ItemDraft::new(
///         ItemKind::Lost,
///         "Keyring",
///         Category::new(category).expect("category"),
///         ContactInfo::new("a@x.com").expect("contact"),
///     )
///     .expect("draft");
///     Item::from_draft(ItemId::random(), UserId::new("u1").expect("id"), draft, Utc::now())
/// };
/// let keys = Category::new("Keys").expect("category");
/// let matches = exact_lost_matches(&keys, vec![item("Keys"), item("keys")]);
/// assert_eq!(matches.len(), 1);
/// ```
pub fn exact_lost_matches(category: &Category, candidates: Vec<Item>) -> Vec<Item> {
    candidates
        .into_iter()
        .filter(|item| {
            item.kind == ItemKind::Lost
                && item.status == ItemStatus::Active
                && item.category.as_ref() == category.as_ref()
        })
        .collect()
}

/// Insertion-ordered set of unique recipients, keyed case-insensitively.
///
/// ## Invariants
/// - No two members share the same lower-cased address.
/// - The excluded address (the found-item poster) is never a member.
#[derive(Debug, Clone, Default)]
pub struct RecipientSet {
    members: Vec<EmailAddress>,
    keys: HashSet<String>,
    excluded: Option<String>,
}

impl RecipientSet {
    /// Create an empty set that will refuse `excluded`.
    pub fn excluding(excluded: Option<&EmailAddress>) -> Self {
        Self {
            excluded: excluded.map(EmailAddress::normalized),
            ..Self::default()
        }
    }

    /// Add an address. Returns `false` when it was excluded or already present.
    ///
    /// # Examples
    /// ```
    /// use campus_finder::domain::{EmailAddress, RecipientSet};
    ///
    /// let poster = EmailAddress::new("b@x.com").expect("email");
    /// let mut set = RecipientSet::excluding(Some(&poster));
    /// assert!(!set.insert(EmailAddress::new("B@X.com").expect("email")));
    /// assert!(set.insert(EmailAddress::new("a@x.com").expect("email")));
    /// assert!(!set.insert(EmailAddress::new("A@x.com").expect("email")));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, email: EmailAddress) -> bool {
        let key = email.normalized();
        if self.excluded.as_deref() == Some(key.as_str()) {
            return false;
        }
        if !self.keys.insert(key) {
            return false;
        }
        self.members.push(email);
        true
    }

    /// Number of unique recipients.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nobody is left to notify.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate recipients in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EmailAddress> {
        self.members.iter()
    }

    /// Consume the set into the ordered `to` list.
    pub fn into_addresses(self) -> Vec<EmailAddress> {
        self.members
    }
}

impl Extend<EmailAddress> for RecipientSet {
    fn extend<T: IntoIterator<Item = EmailAddress>>(&mut self, iter: T) {
        for email in iter {
            self.insert(email);
        }
    }
}

/// Sender and link settings used when rendering notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    /// `From` header, e.g. `Campus Finder <noreply@campus.example>`.
    pub from: String,
    /// Site linked from the email body.
    pub site_url: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            from: DEFAULT_EMAIL_FROM.to_owned(),
            site_url: DEFAULT_SITE_URL.to_owned(),
        }
    }
}

/// Rendered email ready for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub from: String,
    pub to: Vec<EmailAddress>,
    pub subject: String,
    pub html: String,
}

impl NotificationMessage {
    /// Render the fixed notification template for `request`.
    pub fn render(
        request: &NotificationRequest,
        recipients: RecipientSet,
        settings: &NotificationSettings,
    ) -> Self {
        let category = escape_html(request.category.as_ref());
        let title_line = request
            .found_item_title
            .as_deref()
            .map(|title| format!("<p>Item: <strong>{}</strong></p>", escape_html(title)))
            .unwrap_or_default();
        let reference_line = request
            .found_item_id
            .as_deref()
            .map(|id| format!("<p>Reference ID: {}</p>", escape_html(id)))
            .unwrap_or_default();
        let site_url = escape_html(&settings.site_url);

        let html = format!(
            "<div>\n\
             <p>Hello,</p>\n\
             <p>Someone just reported a <strong>found</strong> item in the category <strong>{category}</strong>.</p>\n\
             {title_line}\n\
             <p>Visit Campus Finder to view details and reach out:</p>\n\
             <p><a href=\"{site_url}\" target=\"_blank\" rel=\"noopener noreferrer\">Open Campus Finder</a></p>\n\
             {reference_line}\n\
             </div>"
        );

        Self {
            from: settings.from.clone(),
            to: recipients.into_addresses(),
            subject: format!("A found item was posted in {}", request.category),
            html,
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Raw provider response returned by a successful dispatch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchReceipt(pub Value);

/// Result of one notification run.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    /// No active lost item matched the category.
    NoMatchingItems,
    /// Candidates existed but every address was excluded or unresolvable.
    NoRecipients,
    /// The dispatcher accepted the message.
    Sent {
        recipients: usize,
        receipt: DispatchReceipt,
    },
}

impl NotifyOutcome {
    /// Number of recipients notified.
    pub fn recipient_count(&self) -> usize {
        match self {
            Self::Sent { recipients, .. } => *recipients,
            Self::NoMatchingItems | Self::NoRecipients => 0,
        }
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
