//! Tests for the match-and-notify service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    EmailDispatchError, IdentityResolverError, ItemRepositoryError, MockEmailDispatcher,
    MockIdentityResolver, MockItemRepository,
};
use crate::domain::{
    Category, ContactInfo, DispatchReceipt, EmailAddress, ErrorCode, ItemDraft, ItemId, ItemStatus,
};

fn lost_item(owner: &str, category: &str, contact: &str) -> Item {
    let draft = ItemDraft::new(
        ItemKind::Lost,
        "Lost thing",
        Category::new(category).expect("category"),
        ContactInfo::new(contact).expect("contact"),
    )
    .expect("draft");
    Item::from_draft(
        ItemId::random(),
        UserId::new(owner).expect("user id"),
        draft,
        Utc::now(),
    )
}

fn request(category: &str, found_by: Option<&str>) -> NotificationRequest {
    NotificationRequest::new(
        Some(category.to_owned()),
        Some("found-1".to_owned()),
        found_by.map(str::to_owned),
        Some("Black phone".to_owned()),
    )
    .expect("valid request")
}

fn store_returning(items: Vec<Item>) -> MockItemRepository {
    let mut store = MockItemRepository::new();
    store
        .expect_find_active_by_kind_and_category()
        .withf(|kind, _| *kind == ItemKind::Lost)
        .times(1)
        .return_once(move |_, _| Ok(items));
    store
}

/// Resolver answering from a fixed directory; unknown users have no email.
fn directory(entries: &[(&str, &str)]) -> MockIdentityResolver {
    let directory: HashMap<String, String> = entries
        .iter()
        .map(|(user, email)| ((*user).to_owned(), (*email).to_owned()))
        .collect();
    let mut resolver = MockIdentityResolver::new();
    resolver.expect_resolve_email().returning(move |user| {
        Ok(directory
            .get(&user.to_string())
            .map(|email| EmailAddress::new(email).expect("directory email")))
    });
    resolver
}

fn never_dispatched() -> MockEmailDispatcher {
    let mut dispatcher = MockEmailDispatcher::new();
    dispatcher.expect_dispatch().times(0);
    dispatcher
}

fn service(
    store: MockItemRepository,
    resolver: MockIdentityResolver,
    dispatcher: MockEmailDispatcher,
) -> MatchNotifyService<MockItemRepository, MockIdentityResolver, MockEmailDispatcher> {
    MatchNotifyService::new(
        Arc::new(store),
        Arc::new(resolver),
        Arc::new(dispatcher),
        NotificationSettings::default(),
    )
}

fn addresses(message: &NotificationMessage) -> Vec<String> {
    message.to.iter().map(ToString::to_string).collect()
}

#[fixture]
fn accepted_receipt() -> DispatchReceipt {
    DispatchReceipt(json!({ "id": "email_123" }))
}

#[rstest]
#[tokio::test]
async fn no_candidates_short_circuits_without_dispatch() {
    let mut resolver = MockIdentityResolver::new();
    resolver.expect_resolve_email().times(0);
    let service = service(store_returning(vec![]), resolver, never_dispatched());

    let outcome = service
        .notify(request("Electronics", Some("finder")))
        .await
        .expect("empty result is success");

    assert_eq!(outcome, NotifyOutcome::NoMatchingItems);
}

#[rstest]
#[tokio::test]
async fn case_variant_categories_are_not_candidates() {
    let store = store_returning(vec![lost_item("owner-1", "keys", "a@x.com")]);
    let service = service(store, directory(&[]), never_dispatched());

    let outcome = service
        .notify(request("Keys", None))
        .await
        .expect("success");

    assert_eq!(outcome, NotifyOutcome::NoMatchingItems);
}

#[rstest]
#[tokio::test]
async fn merges_contact_emails_with_owner_accounts(accepted_receipt: DispatchReceipt) {
    let store = store_returning(vec![
        lost_item("owner-1", "Electronics", "a@x.com"),
        lost_item("owner-2", "Electronics", "phone:555-1234"),
    ]);
    let resolver = directory(&[("owner-1", "owner1@campus.edu"), ("owner-2", "owner2@campus.edu")]);
    let receipt = accepted_receipt.clone();
    let mut dispatcher = MockEmailDispatcher::new();
    dispatcher
        .expect_dispatch()
        .withf(|message| {
            addresses(message) == ["a@x.com", "owner1@campus.edu", "owner2@campus.edu"]
                && message.subject == "A found item was posted in Electronics"
        })
        .times(1)
        .return_once(move |_| Ok(receipt));
    let service = service(store, resolver, dispatcher);

    let outcome = service
        .notify(request("Electronics", None))
        .await
        .expect("dispatch succeeds");

    assert_eq!(
        outcome,
        NotifyOutcome::Sent {
            recipients: 3,
            receipt: accepted_receipt,
        }
    );
}

#[rstest]
#[tokio::test]
async fn owners_without_contact_details_are_reached_through_their_account(
    accepted_receipt: DispatchReceipt,
) {
    let mut bare = lost_item("owner-2", "Keys", "unused");
    bare.contact = None;
    let store = store_returning(vec![lost_item("owner-1", "Keys", "a@x.com"), bare]);
    let resolver = directory(&[("owner-2", "owner2@campus.edu")]);
    let mut dispatcher = MockEmailDispatcher::new();
    dispatcher
        .expect_dispatch()
        .withf(|message| addresses(message) == ["a@x.com", "owner2@campus.edu"])
        .times(1)
        .return_once(move |_| Ok(accepted_receipt));
    let service = service(store, resolver, dispatcher);

    let outcome = service
        .notify(request("Keys", None))
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.recipient_count(), 2);
}

#[rstest]
#[tokio::test]
async fn contact_and_account_email_count_once(accepted_receipt: DispatchReceipt) {
    let store = store_returning(vec![lost_item("owner-1", "Electronics", "A@X.com")]);
    let resolver = directory(&[("owner-1", "a@x.com")]);
    let mut dispatcher = MockEmailDispatcher::new();
    dispatcher
        .expect_dispatch()
        .withf(|message| addresses(message) == ["A@X.com"])
        .times(1)
        .return_once(move |_| Ok(accepted_receipt));
    let service = service(store, resolver, dispatcher);

    let outcome = service
        .notify(request("Electronics", None))
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.recipient_count(), 1);
}

#[rstest]
#[tokio::test]
async fn poster_is_excluded_even_when_listed_as_contact() {
    let store = store_returning(vec![lost_item("owner-1", "Keys", "B@X.com")]);
    let resolver = directory(&[("finder", "b@x.com")]);
    let service = service(store, resolver, never_dispatched());

    let outcome = service
        .notify(request("Keys", Some("finder")))
        .await
        .expect("success");

    assert_eq!(outcome, NotifyOutcome::NoRecipients);
}

#[rstest]
#[tokio::test]
async fn poster_owning_the_lost_item_is_not_notified() {
    let store = store_returning(vec![
        lost_item("finder", "Keys", "555-0000"),
        lost_item("owner-2", "Keys", "c@x.com"),
    ]);
    let resolver = directory(&[("finder", "b@x.com"), ("owner-2", "c@x.com")]);
    let mut dispatcher = MockEmailDispatcher::new();
    dispatcher
        .expect_dispatch()
        .withf(|message| addresses(message) == ["c@x.com"])
        .times(1)
        .return_once(|_| Ok(DispatchReceipt::default()));
    let service = service(store, resolver, dispatcher);

    let outcome = service
        .notify(request("Keys", Some("finder")))
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.recipient_count(), 1);
}

#[rstest]
#[tokio::test]
async fn resolves_each_owner_once() {
    let store = store_returning(vec![
        lost_item("owner-1", "Bags & Backpacks", "555-1111"),
        lost_item("owner-1", "Bags & Backpacks", "555-2222"),
    ]);
    let mut resolver = MockIdentityResolver::new();
    resolver
        .expect_resolve_email()
        .withf(|user| user.to_string() == "owner-1")
        .times(1)
        .returning(|_| Ok(Some(EmailAddress::new("owner1@campus.edu").expect("email"))));
    let mut dispatcher = MockEmailDispatcher::new();
    dispatcher
        .expect_dispatch()
        .times(1)
        .return_once(|_| Ok(DispatchReceipt::default()));
    let service = service(store, resolver, dispatcher);

    let outcome = service
        .notify(request("Bags & Backpacks", None))
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.recipient_count(), 1);
}

#[rstest]
#[tokio::test]
async fn owners_without_email_and_no_contact_email_yield_no_recipients() {
    let store = store_returning(vec![lost_item("owner-1", "Other", "call 555-1234")]);
    let service = service(store, directory(&[]), never_dispatched());

    let outcome = service
        .notify(request("Other", None))
        .await
        .expect("success");

    assert_eq!(outcome, NotifyOutcome::NoRecipients);
}

#[rstest]
#[tokio::test]
async fn store_failure_maps_to_upstream_failure() {
    let mut store = MockItemRepository::new();
    store
        .expect_find_active_by_kind_and_category()
        .times(1)
        .return_once(|_, _| Err(ItemRepositoryError::query("relation does not exist")));
    let service = service(store, directory(&[]), never_dispatched());

    let error = service
        .notify(request("Keys", None))
        .await
        .expect_err("query failure");

    assert_eq!(error.code(), ErrorCode::UpstreamFailure);
    assert_eq!(error.message(), "Query failed");
}

#[rstest]
#[tokio::test]
async fn identity_failure_maps_to_upstream_failure() {
    let store = store_returning(vec![lost_item("owner-1", "Keys", "a@x.com")]);
    let mut resolver = MockIdentityResolver::new();
    resolver
        .expect_resolve_email()
        .returning(|_| Err(IdentityResolverError::connection("timeout")));
    let service = service(store, resolver, never_dispatched());

    let error = service
        .notify(request("Keys", None))
        .await
        .expect_err("identity failure");

    assert_eq!(error.code(), ErrorCode::UpstreamFailure);
}

#[rstest]
#[tokio::test]
async fn rejected_dispatch_surfaces_provider_text() {
    let store = store_returning(vec![lost_item("owner-1", "Keys", "a@x.com")]);
    let mut dispatcher = MockEmailDispatcher::new();
    dispatcher.expect_dispatch().times(1).return_once(|_| {
        Err(EmailDispatchError::rejected(
            422_u16,
            r#"{"message":"domain is not verified"}"#,
        ))
    });
    let service = service(store, directory(&[]), dispatcher);

    let error = service
        .notify(request("Keys", None))
        .await
        .expect_err("dispatch failure");

    assert_eq!(error.code(), ErrorCode::DispatchFailure);
    assert_eq!(error.message(), "Email send failed");
    assert_eq!(
        error.details(),
        Some(&json!(r#"{"message":"domain is not verified"}"#))
    );
}

#[rstest]
#[tokio::test]
async fn resolved_items_returned_by_store_are_ignored() {
    let mut resolved = lost_item("owner-1", "Keys", "a@x.com");
    resolved.status = ItemStatus::Resolved;
    let service = service(store_returning(vec![resolved]), directory(&[]), never_dispatched());

    let outcome = service
        .notify(request("Keys", None))
        .await
        .expect("success");

    assert_eq!(outcome, NotifyOutcome::NoMatchingItems);
}

#[rstest]
#[tokio::test]
async fn unconfigured_notifier_reports_configuration_missing() {
    let notifier = UnconfiguredNotifier::new("Missing RESEND_API_KEY");

    let error = notifier
        .notify(request("Keys", None))
        .await
        .expect_err("not configured");

    assert_eq!(error.code(), ErrorCode::ConfigurationMissing);
    assert_eq!(error.message(), "Missing RESEND_API_KEY");
}
