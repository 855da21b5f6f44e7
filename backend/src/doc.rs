//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`], which
//! describe domain types without coupling them to utoipa. Owner-scoped item
//! endpoints declare the gateway-supplied `X-User-Id` header as their
//! security scheme.
//!
//! The document backs Swagger UI in debug builds and is printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::items::{
    ItemResponse, ReportItemRequest, ReportItemResponseBody,
};
use crate::inbound::http::notify::{NotifyRequestBody, NotifyResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Register the gateway identity header as a security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "GatewayUser",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-User-Id",
                "Account id forwarded by the authenticating gateway.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus Finder API",
        description = "Lost-and-found item feed and found-item notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::notify::notify_lost_users,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::report_item,
        crate::inbound::http::items::list_my_items,
        crate::inbound::http::items::resolve_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        NotifyRequestBody,
        NotifyResponse,
        ItemResponse,
        ReportItemRequest,
        ReportItemResponseBody
    )),
    tags(
        (name = "notifications", description = "Found-item notification trigger"),
        (name = "items", description = "Lost-and-found postings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
