//! Maps domain errors onto HTTP responses.
//!
//! Bodies follow the `{error, code, traceId?, details?}` envelope. Server-side
//! failures are logged with the trace id of the request before responding.

use std::borrow::Cow;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for handlers returning domain errors.
pub type ApiResult<T> = Result<T, Error>;

/// Message clients see for unexpected failures.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error";

impl ErrorCode {
    /// HTTP status for this code.
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::DispatchFailure => StatusCode::BAD_GATEWAY,
            Self::ConfigurationMissing | Self::UpstreamFailure | Self::UnexpectedError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// The error as clients may see it. Unexpected failures lose their message
/// and details but keep the trace id.
fn client_view(error: &Error) -> Cow<'_, Error> {
    if error.code() != ErrorCode::UnexpectedError {
        return Cow::Borrowed(error);
    }
    let redacted = Error::unexpected(UNEXPECTED_ERROR_MESSAGE);
    Cow::Owned(match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    })
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.code().http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let trace_id = self.trace_id().unwrap_or("-");
        if status == StatusCode::BAD_GATEWAY {
            warn!(%trace_id, message = self.message(), "email provider rejected dispatch");
        } else if status.is_server_error() {
            error!(code = ?self.code(), %trace_id, message = self.message(), "request failed");
        }

        let mut response = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(&*client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced to a handler");
        Error::unexpected(UNEXPECTED_ERROR_MESSAGE)
    }
}
