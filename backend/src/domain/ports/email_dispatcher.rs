//! Driven port for the outbound email provider.
//!
//! Dispatch is at-most-once: callers invoke it a single time per
//! notification and never retry, so a failure means the notification was not
//! sent.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{DispatchReceipt, NotificationMessage};

define_port_error! {
    /// Errors raised by email provider adapters.
    pub enum EmailDispatchError {
        /// The provider answered with a non-success status.
        Rejected { status: u16, body: String } =>
            "email provider rejected dispatch with status {status}: {body}",
        /// The request never completed.
        Transport { message: String } =>
            "email provider transport failed: {message}",
    }
}

/// Port for delivering one rendered message to all of its recipients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    /// Attempt delivery and return the provider's response payload.
    async fn dispatch(
        &self,
        message: &NotificationMessage,
    ) -> Result<DispatchReceipt, EmailDispatchError>;
}
