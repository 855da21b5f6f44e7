//! Campus lost-and-found backend.
//!
//! Hosts the item feed and the match-and-notify pipeline that emails owners
//! of lost items when a matching found item is posted.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{Cors, Trace};
