//! Resend email provider adapter.

mod dispatcher;

pub use dispatcher::ResendEmailDispatcher;
