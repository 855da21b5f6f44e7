//! Reqwest adapters for the hosted Supabase project.
//!
//! The item store is reached through PostgREST (`/rest/v1`) and account
//! emails through the Auth admin API (`/auth/v1/admin`). Both authenticate
//! with the service role key, sent as `apikey` and as a bearer token.

mod client;
mod dto;
mod identity_resolver;
mod item_repository;

pub use client::SupabaseClient;
pub use identity_resolver::SupabaseIdentityResolver;
pub use item_repository::SupabaseItemRepository;
