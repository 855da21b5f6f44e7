//! Runtime configuration.
//!
//! Server settings load through OrthoConfig under the `CAMPUS_FINDER_`
//! prefix. Deployment secrets for the notification pipeline keep their
//! platform names (`SUPABASE_URL`, `RESEND_API_KEY`, ...) and are read once
//! into [`NotifierConfig`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{DEFAULT_EMAIL_FROM, DEFAULT_SITE_URL, NotificationSettings};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;
/// Email provider endpoint used when no override is configured.
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";

/// Server settings controlling binding and outbound calls.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAMPUS_FINDER")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Timeout applied to every upstream HTTP call, in milliseconds.
    pub upstream_timeout_ms: Option<u64>,
    /// Email provider base URL override.
    pub resend_base_url: Option<String>,
    /// Keep items in process memory instead of the hosted store.
    #[ortho_config(default = false)]
    pub memory_store: bool,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| ConfigError::Invalid {
            name: "CAMPUS_FINDER_BIND_ADDR",
            value: raw.to_owned(),
        })
    }

    /// Upstream request timeout.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(
            self.upstream_timeout_ms
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_MS),
        )
    }

    /// Email provider base URL.
    pub fn resend_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .resend_base_url
            .as_deref()
            .unwrap_or(DEFAULT_RESEND_BASE_URL);
        Url::parse(raw).map_err(|_| ConfigError::Invalid {
            name: "CAMPUS_FINDER_RESEND_BASE_URL",
            value: raw.to_owned(),
        })
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Supabase URL or service role key absent.
    #[error("Missing Supabase service credentials")]
    MissingSupabaseCredentials,
    /// Email provider key absent.
    #[error("Missing RESEND_API_KEY")]
    MissingResendKey,
    /// A value was present but malformed.
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Hosted store and identity provider credentials.
#[derive(Clone)]
pub struct SupabaseCredentials {
    pub url: Url,
    pub service_role_key: Zeroizing<String>,
}

impl std::fmt::Debug for SupabaseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseCredentials")
            .field("url", &self.url.as_str())
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

/// Everything the notification pipeline needs from the deployment.
#[derive(Clone)]
pub struct NotifierConfig {
    pub supabase: SupabaseCredentials,
    pub resend_api_key: Zeroizing<String>,
    pub email_from: String,
    pub site_url: String,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("supabase", &self.supabase)
            .field("resend_api_key", &"<redacted>")
            .field("email_from", &self.email_from)
            .field("site_url", &self.site_url)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Read Supabase credentials through `lookup`.
pub fn supabase_credentials(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<SupabaseCredentials, ConfigError> {
    let (Some(url), Some(key)) = (
        non_empty(lookup("SUPABASE_URL")),
        non_empty(lookup("SUPABASE_SERVICE_ROLE_KEY")),
    ) else {
        return Err(ConfigError::MissingSupabaseCredentials);
    };
    let parsed = Url::parse(url.trim()).map_err(|_| ConfigError::Invalid {
        name: "SUPABASE_URL",
        value: url.clone(),
    })?;
    Ok(SupabaseCredentials {
        url: parsed,
        service_role_key: Zeroizing::new(key),
    })
}

impl NotifierConfig {
    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Supabase credentials are checked before the email provider key, so a
    /// deployment missing both reports the Supabase error.
    ///
    /// # Examples
    /// ```
    /// use campus_finder::config::{ConfigError, NotifierConfig};
    ///
    /// let err = NotifierConfig::from_lookup(|_| None).expect_err("nothing configured");
    /// assert_eq!(err, ConfigError::MissingSupabaseCredentials);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let supabase = supabase_credentials(&lookup)?;
        let resend_api_key =
            non_empty(lookup("RESEND_API_KEY")).ok_or(ConfigError::MissingResendKey)?;
        Ok(Self {
            supabase,
            resend_api_key: Zeroizing::new(resend_api_key),
            email_from: non_empty(lookup("EMAIL_FROM"))
                .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_owned()),
            site_url: non_empty(lookup("SITE_URL")).unwrap_or_else(|| DEFAULT_SITE_URL.to_owned()),
        })
    }

    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Rendering settings derived from this configuration.
    pub fn notification_settings(&self) -> NotificationSettings {
        NotificationSettings {
            from: self.email_from.clone(),
            site_url: self.site_url.clone(),
        }
    }
}
