//! Data models for the gateway.
//!
//! Request/response envelopes, the authentication context and audit types.

pub mod api;
pub mod audit;
pub mod auth;

pub use api::*;
pub use audit::*;
pub use auth::*;
