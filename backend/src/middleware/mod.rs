//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, namely trace
//! correlation and the permissive CORS policy browser clients rely on.

pub mod cors;
pub mod trace;

pub use cors::Cors;
pub use trace::Trace;
