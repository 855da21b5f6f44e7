//! HTTP-level tests for the PostgREST item adapter.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use mockito::{Matcher, Server, ServerGuard};
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::*;
use crate::config::SupabaseCredentials;
use crate::domain::{ContactInfo, ItemDraft, ItemFilter};

const ITEM_ID: &str = "7b0c3f3e-5a53-4c8e-9d3d-0f4a1f6f2c11";

fn repository(server: &ServerGuard) -> SupabaseItemRepository {
    repository_at(&server.url())
}

fn repository_at(base: &str) -> SupabaseItemRepository {
    let credentials = SupabaseCredentials {
        url: Url::parse(base).expect("base url"),
        service_role_key: Zeroizing::new("srk".to_owned()),
    };
    let client = SupabaseClient::new(&credentials, Duration::from_secs(2)).expect("client");
    SupabaseItemRepository::new(client)
}

fn row(category: &str) -> serde_json::Value {
    json!({
        "id": ITEM_ID,
        "user_id": "owner-1",
        "type": "lost",
        "title": "Blue keyring",
        "description": null,
        "category": category,
        "location": null,
        "contact_info": "a@x.com",
        "image_url": null,
        "status": "active",
        "created_at": "2025-03-14T09:30:00Z"
    })
}

fn item_id() -> ItemId {
    ItemId::from_uuid(Uuid::parse_str(ITEM_ID).expect("uuid"))
}

#[tokio::test]
async fn candidate_query_filters_server_side_with_service_credentials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/items")
        .match_header("apikey", "srk")
        .match_header("authorization", "Bearer srk")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("type".into(), "eq.lost".into()),
            Matcher::UrlEncoded("category".into(), "eq.Bags & Backpacks".into()),
            Matcher::UrlEncoded("status".into(), "eq.active".into()),
            Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([row("Bags & Backpacks")]).to_string())
        .create_async()
        .await;

    let category = Category::new("Bags & Backpacks").expect("category");
    let items = repository(&server)
        .find_active_by_kind_and_category(ItemKind::Lost, &category)
        .await
        .expect("query succeeds");

    mock.assert_async().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].owner.to_string(), "owner-1");
}

#[tokio::test]
async fn feed_filters_are_pushed_to_the_store() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/items")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("status".into(), "eq.active".into()),
            Matcher::UrlEncoded("type".into(), "eq.found".into()),
            Matcher::UrlEncoded("category".into(), "eq.Keys".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let filter = ItemFilter {
        kind: Some(ItemKind::Found),
        category: Some(Category::new("Keys").expect("category")),
    };

    let items = repository(&server)
        .list_active(&filter)
        .await
        .expect("query succeeds");

    mock.assert_async().await;
    assert!(items.is_empty());
}

#[rstest]
#[case::server_error(500, r#"{"message":"boom"}"#)]
#[case::bad_filter(400, r#"{"code":"PGRST100"}"#)]
#[tokio::test]
async fn error_statuses_become_query_errors(#[case] status: usize, #[case] body: &str) {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(status)
        .with_body(body)
        .create_async()
        .await;

    let error = repository(&server)
        .list_active(&ItemFilter::default())
        .await
        .expect_err("query fails");

    let ItemRepositoryError::Query { message } = &error else {
        panic!("expected a query error, got {error:?}");
    };
    assert!(message.starts_with(&format!("status {status}")));
}

#[tokio::test]
async fn malformed_rows_fail_the_query() {
    let mut server = Server::new_async().await;
    let mut broken = row("Keys");
    broken["status"] = json!("archived");
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_body(json!([broken]).to_string())
        .create_async()
        .await;

    let error = repository(&server)
        .list_active(&ItemFilter::default())
        .await
        .expect_err("bad row");

    assert!(matches!(error, ItemRepositoryError::Query { .. }));
}

#[tokio::test]
async fn rows_without_contact_info_do_not_fail_the_candidate_query() {
    let mut server = Server::new_async().await;
    let mut null_contact = row("Keys");
    null_contact["id"] = json!("2222aaaa-5a53-4c8e-9d3d-0f4a1f6f2c11");
    null_contact["user_id"] = json!("owner-2");
    null_contact["contact_info"] = json!(null);
    let mut blank_contact = row("Keys");
    blank_contact["id"] = json!("3333aaaa-5a53-4c8e-9d3d-0f4a1f6f2c11");
    blank_contact["contact_info"] = json!("");
    let _mock = server
        .mock("GET", "/rest/v1/items")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([row("Keys"), null_contact, blank_contact]).to_string())
        .create_async()
        .await;

    let category = Category::new("Keys").expect("category");
    let items = repository(&server)
        .find_active_by_kind_and_category(ItemKind::Lost, &category)
        .await
        .expect("query succeeds");

    assert_eq!(items.len(), 3);
    assert!(items[0].contact.is_some());
    assert!(items[1].contact.is_none());
    assert!(items[2].contact.is_none());
}

#[tokio::test]
async fn unreachable_store_is_a_connection_error() {
    // Nothing listens on the discard port.
    let error = repository_at("http://127.0.0.1:9")
        .list_active(&ItemFilter::default())
        .await
        .expect_err("no server");

    assert!(matches!(error, ItemRepositoryError::Connection { .. }));
}

#[tokio::test]
async fn insert_posts_the_row() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/items")
        .match_header("prefer", "return=minimal")
        .match_body(Matcher::PartialJson(json!({
            "type": "found",
            "category": "Keys",
            "user_id": "finder",
            "status": "active"
        })))
        .with_status(201)
        .create_async()
        .await;
    let draft = ItemDraft::new(
        ItemKind::Found,
        "Keyring",
        Category::new("Keys").expect("category"),
        ContactInfo::new("f@x.com").expect("contact"),
    )
    .expect("draft");
    let created_at = Utc
        .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("timestamp");
    let item = Item::from_draft(
        ItemId::random(),
        UserId::new("finder").expect("user"),
        draft,
        created_at,
    );

    repository(&server).insert(&item).await.expect("insert succeeds");

    mock.assert_async().await;
}

#[tokio::test]
async fn find_by_id_returns_none_for_empty_results() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/items")
        .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{ITEM_ID}")))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let found = repository(&server)
        .find_by_id(&item_id())
        .await
        .expect("query succeeds");

    assert!(found.is_none());
}

#[rstest]
#[case::affected(json!([row("Keys")]), true)]
#[case::absent(json!([]), false)]
#[tokio::test]
async fn status_updates_report_whether_a_row_changed(
    #[case] response: serde_json::Value,
    #[case] expected: bool,
) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/rest/v1/items")
        .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{ITEM_ID}")))
        .match_header("prefer", "return=representation")
        .match_body(Matcher::Json(json!({ "status": "resolved" })))
        .with_status(200)
        .with_body(response.to_string())
        .create_async()
        .await;

    let updated = repository(&server)
        .update_status(&item_id(), ItemStatus::Resolved)
        .await
        .expect("update succeeds");

    mock.assert_async().await;
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn delete_targets_one_row() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/rest/v1/items")
        .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{ITEM_ID}")))
        .with_status(200)
        .with_body(json!([row("Keys")]).to_string())
        .create_async()
        .await;

    let deleted = repository(&server)
        .delete(&item_id())
        .await
        .expect("delete succeeds");

    mock.assert_async().await;
    assert!(deleted);
}
