//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape and are registered with utoipa
//! under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The caller did not identify itself.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller may not act on the target resource.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The endpoint does not accept the request method.
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    /// Deployment secrets are absent.
    #[schema(rename = "configuration_missing")]
    ConfigurationMissing,
    /// The item store or identity provider failed.
    #[schema(rename = "upstream_failure")]
    UpstreamFailure,
    /// The email provider rejected the dispatch.
    #[schema(rename = "dispatch_failure")]
    DispatchFailure,
    /// An unexpected error occurred on the server.
    #[schema(rename = "unexpected_error")]
    UnexpectedError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Human-readable message returned to clients.
    #[schema(example = "Missing category")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Correlation identifier for tracing this error across systems.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the email provider's response.
    details: Option<serde_json::Value>,
}
