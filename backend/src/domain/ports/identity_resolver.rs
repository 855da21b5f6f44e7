//! Driven port mapping user identifiers to account emails.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{EmailAddress, UserId};

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityResolverError {
        /// The provider could not be reached.
        Connection { message: String } =>
            "identity provider connection failed: {message}",
        /// The provider failed the lookup.
        Lookup { message: String } =>
            "identity lookup failed: {message}",
    }
}

/// Port for resolving a user's account email.
///
/// Lookups are side-effect free, so callers may issue several concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve `user` to its account email. Unknown users and accounts
    /// without an email resolve to `None`.
    async fn resolve_email(
        &self,
        user: &UserId,
    ) -> Result<Option<EmailAddress>, IdentityResolverError>;
}
