//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities of the lost-and-found board
//! and the match-and-notify pipeline that runs when a found item is posted.
//! Types validate on construction and document their serde contracts in
//! their own Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifier.
//! - UserId / EmailAddress: account identity primitives.
//! - Item and friends: the lost-and-found posting aggregate.
//! - NotificationRequest, RecipientSet, NotificationMessage: pipeline values.
//! - MatchNotifyService / ItemsService: driving port implementations.

pub mod error;
pub mod item;
pub mod items_service;
pub mod notification;
pub mod notify_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::item::{
    Category, ContactInfo, Item, ItemDraft, ItemFilter, ItemId, ItemKind, ItemStatus,
    ItemValidationError,
};
pub use self::items_service::ItemsService;
pub use self::notification::{
    DEFAULT_EMAIL_FROM, DEFAULT_SITE_URL, DispatchReceipt, NotificationMessage,
    NotificationRequest, NotificationSettings, NotifyOutcome, RecipientSet, exact_lost_matches,
};
pub use self::notify_service::{MatchNotifyService, UnconfiguredNotifier};
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use campus_finder::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
