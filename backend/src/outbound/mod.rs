//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **supabase**: PostgREST item store and Auth admin identity lookups
//! - **resend**: transactional email delivery
//! - **memory**: in-process item store for local runs and tests
//!
//! Adapters are thin translators between domain types and wire formats. They
//! contain no business logic.

pub mod memory;
pub mod resend;
pub mod supabase;
