//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use campus_finder::config::{
    AppSettings, ConfigError, NotifierConfig, SupabaseCredentials, supabase_credentials,
};
use url::Url;

/// Resolved startup configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upstream_timeout: Duration,
    pub(crate) resend_base_url: Url,
    pub(crate) memory_store: bool,
    /// Secrets for the notification pipeline, or why they are unusable.
    pub(crate) notifier: Result<NotifierConfig, ConfigError>,
    /// Credentials for the hosted item store.
    pub(crate) supabase: Result<SupabaseCredentials, ConfigError>,
}

impl ServerConfig {
    /// Resolve settings against an environment lookup.
    ///
    /// Missing secrets are kept as errors rather than failing startup so the
    /// notify endpoint can report them per request.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a server setting is malformed.
    pub fn from_settings(
        settings: &AppSettings,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            upstream_timeout: settings.upstream_timeout(),
            resend_base_url: settings.resend_base_url()?,
            memory_store: settings.memory_store,
            supabase: supabase_credentials(&lookup),
            notifier: NotifierConfig::from_lookup(lookup),
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
