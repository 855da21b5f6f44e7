//! Reqwest-backed Resend dispatcher.
//!
//! One `POST /emails` per message carrying every recipient. The request is
//! never retried; a non-success answer is returned with the provider's raw
//! body so callers can surface it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{EmailDispatchError, EmailDispatcher};
use crate::domain::{DispatchReceipt, NotificationMessage};

#[derive(Debug, Serialize)]
struct SendEmailDto<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

impl<'a> From<&'a NotificationMessage> for SendEmailDto<'a> {
    fn from(message: &'a NotificationMessage) -> Self {
        Self {
            from: &message.from,
            to: message.to.iter().map(AsRef::as_ref).collect(),
            subject: &message.subject,
            html: &message.html,
        }
    }
}

/// Dispatcher posting to the Resend HTTP API.
pub struct ResendEmailDispatcher {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl ResendEmailDispatcher {
    /// Build a dispatcher against `base_url` with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot carry a path.
    pub fn new(
        base_url: &Url,
        api_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, EmailDispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| EmailDispatchError::transport(error.to_string()))?;
        let mut endpoint = base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| EmailDispatchError::transport(format!("invalid base URL {base_url}")))?
            .pop_if_empty()
            .push("emails");
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl EmailDispatcher for ResendEmailDispatcher {
    async fn dispatch(
        &self,
        message: &NotificationMessage,
    ) -> Result<DispatchReceipt, EmailDispatchError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&SendEmailDto::from(message))
            .send()
            .await
            .map_err(|error| EmailDispatchError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| EmailDispatchError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(EmailDispatchError::rejected(status.as_u16(), body));
        }

        debug!(recipients = message.to.len(), "email accepted by provider");
        let receipt = serde_json::from_str(&body).unwrap_or(Value::String(body));
        Ok(DispatchReceipt(receipt))
    }
}
