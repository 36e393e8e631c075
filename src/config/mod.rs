//! Configuration structures and loading utilities.
//!
//! Everything here is read from the environment once at startup and never
//! mutated afterwards.

pub mod logging;
pub mod service;

pub use logging::*;
pub use service::*;
