//! Custom middleware implementations.
//!
//! Authentication is not a middleware here; protected handlers call the auth
//! gate explicitly.

pub mod request_tracking;

pub use request_tracking::*;
