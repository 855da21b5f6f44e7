//! Shared HTTP plumbing for the Supabase adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use zeroize::Zeroizing;

use crate::config::SupabaseCredentials;

/// Authenticated client bound to one Supabase project.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base: Url,
    service_role_key: Zeroizing<String>,
}

impl SupabaseClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(credentials: &SupabaseCredentials, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base: credentials.url.clone(),
            service_role_key: credentials.service_role_key.clone(),
        })
    }

    /// Absolute URL for `segments` below the project root.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url, String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| format!("base URL {} cannot carry a path", self.base))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(None);
        Ok(url)
    }

    pub(super) fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.get(url))
    }

    pub(super) fn post(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.post(url))
    }

    pub(super) fn patch(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.patch(url))
    }

    pub(super) fn delete(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.delete(url))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.service_role_key.as_str())
            .bearer_auth(self.service_role_key.as_str())
    }
}

/// Human-readable failure for a non-success response.
pub(super) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
