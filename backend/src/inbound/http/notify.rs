//! Match-and-notify trigger endpoint.
//!
//! ```text
//! POST /functions/v1/notify-lost-users
//! POST /notify-lost-users
//! ```
//!
//! The item reporting client calls this after posting a found item. Any
//! non-200 answer means no email went out.

use actix_web::http::Method;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, NotificationRequest, NotifyOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::payload::parse_json_body;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Paths the trigger is mounted at.
pub const NOTIFY_PATHS: [&str; 2] = ["/functions/v1/notify-lost-users", "/notify-lost-users"];

/// Trigger payload describing the found item.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequestBody {
    /// Category of the found item. Required.
    #[schema(example = "Electronics")]
    pub category: Option<String>,
    /// Reference id of the found item, echoed in the email.
    pub found_item_id: Option<String>,
    /// Account that posted the found item; never notified.
    pub found_by_user_id: Option<String>,
    /// Title of the found item, echoed in the email.
    pub found_item_title: Option<String>,
}

impl TryFrom<NotifyRequestBody> for NotificationRequest {
    type Error = Error;

    fn try_from(body: NotifyRequestBody) -> Result<Self, Self::Error> {
        NotificationRequest::new(
            body.category,
            body.found_item_id,
            body.found_by_user_id,
            body.found_item_title,
        )
    }
}

/// Outcome reported to the trigger caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotifyResponse {
    #[schema(value_type = String, example = "Notifications sent")]
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<usize>,
    /// Raw email provider response.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub resend: Option<Value>,
}

impl From<NotifyOutcome> for NotifyResponse {
    fn from(outcome: NotifyOutcome) -> Self {
        match outcome {
            NotifyOutcome::NoMatchingItems => Self {
                message: "No matching lost items",
                recipients: None,
                resend: None,
            },
            NotifyOutcome::NoRecipients => Self {
                message: "No recipients",
                recipients: None,
                resend: None,
            },
            NotifyOutcome::Sent {
                recipients,
                receipt,
            } => Self {
                message: "Notifications sent",
                recipients: Some(recipients),
                resend: Some(receipt.0),
            },
        }
    }
}

/// Email owners of active lost items matching a found item's category.
#[utoipa::path(
    post,
    path = "/functions/v1/notify-lost-users",
    request_body = NotifyRequestBody,
    responses(
        (status = 200, description = "Notifications sent or nobody to notify", body = NotifyResponse),
        (status = 400, description = "Missing category or malformed body", body = ErrorSchema),
        (status = 405, description = "Only POST is accepted", body = ErrorSchema),
        (status = 500, description = "Configuration or item store failure", body = ErrorSchema),
        (status = 502, description = "Email provider rejected the dispatch", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "notifyLostUsers"
)]
pub async fn notify_lost_users(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let payload: NotifyRequestBody = parse_json_body(&body)?;
    let request = NotificationRequest::try_from(payload)?;
    let outcome = state.notifier.notify(request).await?;
    info!(recipients = outcome.recipient_count(), "notify trigger handled");
    Ok(HttpResponse::Ok().json(NotifyResponse::from(outcome)))
}

async fn preflight() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn method_not_allowed() -> ApiResult<HttpResponse> {
    Err(Error::method_not_allowed("Method not allowed"))
}

/// Mount the trigger at both of its paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(NOTIFY_PATHS)
            .route(web::post().to(notify_lost_users))
            .route(web::method(Method::OPTIONS).to(preflight))
            .default_service(web::to(method_not_allowed)),
    );
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
