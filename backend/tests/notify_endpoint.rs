//! End-to-end tests for the notify trigger against stand-in Supabase and
//! Resend servers.

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use campus_finder::config::SupabaseCredentials;
use campus_finder::domain::ports::LostItemNotifier;
use campus_finder::domain::{
    ItemsService, MatchNotifyService, NotificationSettings, TRACE_ID_HEADER,
};
use campus_finder::inbound::http::notify;
use campus_finder::inbound::http::state::HttpState;
use campus_finder::outbound::memory::InMemoryItemRepository;
use campus_finder::outbound::resend::ResendEmailDispatcher;
use campus_finder::outbound::supabase::{
    SupabaseClient, SupabaseIdentityResolver, SupabaseItemRepository,
};
use campus_finder::{Cors, Trace};
use mockable::DefaultClock;
use mockito::{Matcher, Server, ServerGuard};
use rstest::rstest;
use serde_json::{Value, json};
use url::Url;
use zeroize::Zeroizing;

const NOTIFY_URI: &str = "/functions/v1/notify-lost-users";

struct Upstreams {
    supabase: ServerGuard,
    resend: ServerGuard,
}

impl Upstreams {
    async fn start() -> Self {
        Self {
            supabase: Server::new_async().await,
            resend: Server::new_async().await,
        }
    }

    fn notifier(&self) -> Arc<dyn LostItemNotifier> {
        let credentials = SupabaseCredentials {
            url: Url::parse(&self.supabase.url()).expect("supabase url"),
            service_role_key: Zeroizing::new("service-role".to_owned()),
        };
        let client =
            SupabaseClient::new(&credentials, Duration::from_secs(2)).expect("supabase client");
        let dispatcher = ResendEmailDispatcher::new(
            &Url::parse(&self.resend.url()).expect("resend url"),
            Zeroizing::new("re_test".to_owned()),
            Duration::from_secs(2),
        )
        .expect("dispatcher");
        Arc::new(MatchNotifyService::new(
            Arc::new(SupabaseItemRepository::new(client.clone())),
            Arc::new(SupabaseIdentityResolver::new(client)),
            Arc::new(dispatcher),
            NotificationSettings {
                from: "Campus Finder <notify@campus.edu>".to_owned(),
                site_url: "https://finder.campus.edu".to_owned(),
            },
        ))
    }

    async fn candidates(&mut self, rows: Value) -> mockito::Mock {
        self.supabase
            .mock("GET", "/rest/v1/items")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("type".into(), "eq.lost".into()),
                Matcher::UrlEncoded("status".into(), "eq.active".into()),
            ]))
            .match_header("apikey", "service-role")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(rows.to_string())
            .create_async()
            .await
    }

    async fn account(&mut self, user: &str, email: Value) -> mockito::Mock {
        self.supabase
            .mock("GET", format!("/auth/v1/admin/users/{user}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": user, "email": email }).to_string())
            .create_async()
            .await
    }
}

fn row(owner: &str, category: &str, contact: &str) -> Value {
    json!({
        "id": uuid::Uuid::new_v4(),
        "user_id": owner,
        "type": "lost",
        "title": "Lost thing",
        "description": null,
        "category": category,
        "location": null,
        "contact_info": contact,
        "image_url": null,
        "status": "active",
        "created_at": "2025-03-14T09:30:00Z"
    })
}

async fn init_app(
    notifier: Arc<dyn LostItemNotifier>,
) -> impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>
{
    let items = Arc::new(ItemsService::new(
        Arc::new(InMemoryItemRepository::default()),
        notifier.clone(),
        Arc::new(DefaultClock),
    ));
    let state = HttpState::new(notifier, items.clone(), items);
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .wrap(Cors)
            .configure(notify::configure),
    )
    .await
}

async fn post_json(
    app: &impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
    body: Value,
) -> (StatusCode, Value) {
    let res = test::call_service(
        app,
        TestRequest::post().uri(NOTIFY_URI).set_json(body).to_request(),
    )
    .await;
    let status = res.status();
    assert_eq!(
        res.headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|value| value.as_bytes()),
        Some(&b"*"[..])
    );
    let bytes = test::read_body(res).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[actix_web::test]
async fn emails_contacts_and_owners_once_each() {
    let mut upstreams = Upstreams::start().await;
    let candidates = upstreams
        .candidates(json!([
            row("owner-1", "Electronics", "a@x.com"),
            row("owner-2", "Electronics", "phone:555-1234"),
            row("owner-3", "electronics", "c@x.com"),
        ]))
        .await;
    let owner_one = upstreams.account("owner-1", json!("A@X.com")).await;
    let owner_two = upstreams.account("owner-2", json!("owner2@campus.edu")).await;
    let owner_three = upstreams
        .supabase
        .mock("GET", "/auth/v1/admin/users/owner-3")
        .expect(0)
        .create_async()
        .await;
    let email = upstreams
        .resend
        .mock("POST", "/emails")
        .match_header("authorization", "Bearer re_test")
        .match_body(Matcher::PartialJson(json!({
            "from": "Campus Finder <notify@campus.edu>",
            "to": ["a@x.com", "owner2@campus.edu"],
            "subject": "A found item was posted in Electronics"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"email-1"}"#)
        .expect(1)
        .create_async()
        .await;
    let app = init_app(upstreams.notifier()).await;

    let (status, body) = post_json(
        &app,
        json!({ "category": "Electronics", "foundItemTitle": "Laptop charger" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Notifications sent",
            "recipients": 2,
            "resend": { "id": "email-1" }
        })
    );
    candidates.assert_async().await;
    owner_one.assert_async().await;
    owner_two.assert_async().await;
    owner_three.assert_async().await;
    email.assert_async().await;
}

#[actix_web::test]
async fn null_contact_rows_still_reach_the_owner_account() {
    let mut upstreams = Upstreams::start().await;
    let mut bare = row("owner-1", "Keys", "");
    bare["contact_info"] = Value::Null;
    let _candidates = upstreams.candidates(json!([bare])).await;
    let _owner = upstreams.account("owner-1", json!("owner1@campus.edu")).await;
    let email = upstreams
        .resend
        .mock("POST", "/emails")
        .match_body(Matcher::PartialJson(json!({ "to": ["owner1@campus.edu"] })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"email-2"}"#)
        .expect(1)
        .create_async()
        .await;
    let app = init_app(upstreams.notifier()).await;

    let (status, body) = post_json(&app, json!({ "category": "Keys" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipients"], 1);
    email.assert_async().await;
}

#[actix_web::test]
async fn the_finder_is_never_notified_about_their_own_post() {
    let mut upstreams = Upstreams::start().await;
    let _candidates = upstreams
        .candidates(json!([row("owner-9", "Keys", "B@X.com")]))
        .await;
    let _finder = upstreams.account("finder-1", json!("b@x.com")).await;
    let _owner = upstreams.account("owner-9", Value::Null).await;
    let email = upstreams
        .resend
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let app = init_app(upstreams.notifier()).await;

    let (status, body) = post_json(
        &app,
        json!({ "category": "Keys", "foundByUserId": "finder-1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "No recipients" }));
    email.assert_async().await;
}

#[actix_web::test]
async fn provider_rejections_are_bad_gateway_with_raw_details() {
    let mut upstreams = Upstreams::start().await;
    let _candidates = upstreams
        .candidates(json!([row("owner-1", "Keys", "a@x.com")]))
        .await;
    let _owner = upstreams.account("owner-1", Value::Null).await;
    let _email = upstreams
        .resend
        .mock("POST", "/emails")
        .with_status(422)
        .with_body(r#"{"name":"validation_error","message":"Invalid `from` field"}"#)
        .create_async()
        .await;
    let app = init_app(upstreams.notifier()).await;

    let (status, body) = post_json(&app, json!({ "category": "Keys" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Email send failed");
    assert_eq!(
        body["details"],
        r#"{"name":"validation_error","message":"Invalid `from` field"}"#
    );
}

#[actix_web::test]
async fn empty_categories_short_circuit_without_email() {
    let mut upstreams = Upstreams::start().await;
    let _candidates = upstreams.candidates(json!([])).await;
    let email = upstreams
        .resend
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let app = init_app(upstreams.notifier()).await;

    let (status, body) = post_json(&app, json!({ "category": "Sports Equipment" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "No matching lost items" }));
    email.assert_async().await;
}

#[actix_web::test]
async fn store_failures_report_query_failed() {
    let mut upstreams = Upstreams::start().await;
    let _candidates = upstreams
        .supabase
        .mock("GET", "/rest/v1/items")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"message":"connection reset"}"#)
        .create_async()
        .await;
    let app = init_app(upstreams.notifier()).await;

    let (status, body) = post_json(&app, json!({ "category": "Keys" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Query failed");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[case::missing(json!({}))]
#[case::null(json!({ "category": null }))]
#[actix_web::test]
async fn missing_category_never_reaches_upstreams(#[case] payload: Value) {
    let mut upstreams = Upstreams::start().await;
    let store = upstreams
        .supabase
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let app = init_app(upstreams.notifier()).await;

    let (status, body) = post_json(&app, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing category");
    store.assert_async().await;
}

#[actix_web::test]
async fn responses_carry_a_trace_id() {
    let upstreams = Upstreams::start().await;
    let app = init_app(upstreams.notifier()).await;

    let res = test::call_service(
        &app,
        TestRequest::get().uri(NOTIFY_URI).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
}
