//! HTTP request handlers.
//!
//! Protected handlers start with the auth gate, then parse their body
//! (empty body means an empty request), then dispatch.

pub mod auth;
pub mod crud;
pub mod data;
pub mod health;
pub mod metrics;
pub mod openapi;
pub mod process;

pub use auth::*;
pub use crud::*;
pub use data::*;
pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use process::*;

use crate::{config::ServiceConfig, error::ApiError};
use actix_web::{HttpRequest, web};

/// Service configuration registered on the app
pub(crate) fn service_config(req: &HttpRequest) -> Result<web::Data<ServiceConfig>, ApiError> {
    req.app_data::<web::Data<ServiceConfig>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("No service configuration registered on the application");
            ApiError::internal()
        })
}
