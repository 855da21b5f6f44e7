//! Caller identity supplied by the authenticating gateway.
//!
//! Requests reach this service through a gateway that verifies the session
//! and forwards the account id in `X-User-Id`. Owner-scoped handlers take a
//! [`Caller`] to require it.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, UserId};

/// Header carrying the authenticated account id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller of an owner-scoped endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl Caller {
    /// The caller's account id.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    fn from_headers(req: &HttpRequest) -> Result<Self, Error> {
        let raw = req
            .headers()
            .get(USER_ID_HEADER)
            .ok_or_else(|| Error::unauthorized("Missing X-User-Id header"))?;
        let raw = raw
            .to_str()
            .map_err(|_| Error::unauthorized("Invalid X-User-Id header"))?;
        UserId::new(raw).map(Self).map_err(|error| {
            warn!(%error, "rejected caller identity");
            Error::unauthorized("Invalid X-User-Id header")
        })
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}
