//! Driving port for the match-and-notify pipeline.
//!
//! Inbound adapters and the item reporting use-case call this port when a
//! found item appears. Implementations send at most one email per call and
//! never retry.

use async_trait::async_trait;

use crate::domain::{Error, NotificationRequest, NotifyOutcome};

/// Use-case port notifying owners of matching lost items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LostItemNotifier: Send + Sync {
    /// Run the pipeline for one found-item trigger.
    async fn notify(&self, request: NotificationRequest) -> Result<NotifyOutcome, Error>;
}
