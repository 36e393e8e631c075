//! Service layer: the backend client, the auth gate, record transforms and
//! metrics.

pub mod auth;
pub mod metrics;
pub mod roble;
pub mod transform;

pub use auth::*;
pub use metrics::*;
pub use roble::*;
pub use transform::*;
