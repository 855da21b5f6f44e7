//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::{TimeZone, Utc};

use crate::domain::ports::{MockItemsCommand, MockItemsQuery, MockLostItemNotifier};
use crate::domain::{Category, ContactInfo, Item, ItemDraft, ItemId, ItemKind, UserId};
use crate::inbound::http::state::HttpState;

/// Build handler state from mocked driving ports.
pub fn http_state(
    notifier: MockLostItemNotifier,
    items: MockItemsCommand,
    items_query: MockItemsQuery,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(notifier),
        Arc::new(items),
        Arc::new(items_query),
    ))
}

/// State for notify handler tests; item ports panic if called.
pub fn notifier_state(notifier: MockLostItemNotifier) -> web::Data<HttpState> {
    http_state(notifier, MockItemsCommand::new(), MockItemsQuery::new())
}

/// State for item handler tests; the notifier panics if called.
pub fn items_state(items: MockItemsCommand, items_query: MockItemsQuery) -> web::Data<HttpState> {
    http_state(MockLostItemNotifier::new(), items, items_query)
}

/// A stored item with fixed id and timestamp.
pub fn sample_item(kind: ItemKind, owner: &str, category: &str) -> Item {
    let draft = ItemDraft::new(
        kind,
        "Blue water bottle",
        Category::new(category).expect("category"),
        ContactInfo::new("owner@campus.edu").expect("contact"),
    )
    .expect("draft");
    let created_at = Utc
        .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("timestamp");
    Item::from_draft(
        ItemId::random(),
        UserId::new(owner).expect("user id"),
        draft,
        created_at,
    )
}
