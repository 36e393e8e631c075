//! HTTP error taxonomy.
//!
//! Every error leaving a handler is rendered as `{"error": "<message>"}`.
//! Internal detail (upstream status, network errors) is logged where it
//! happens and never placed in the message.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};

pub const MSG_TOKEN_REQUIRED: &str = "authorization token required";
pub const MSG_TOKEN_INVALID: &str = "invalid or expired token";
pub const MSG_INVALID_BODY: &str = "invalid JSON body";
pub const MSG_INVALID_OPERATION: &str = "invalid operation";
pub const MSG_BACKEND_QUERY: &str = "error querying backend";
pub const MSG_BACKEND_OPERATION: &str = "error executing backend operation";
pub const MSG_INTERNAL: &str = "internal server error";

/// Errors returned to API callers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Missing, malformed, invalid or expired bearer token
    #[error("{0}")]
    Unauthorized(String),

    /// Bad request body or unsupported discriminator
    #[error("{0}")]
    Validation(String),

    /// Backend call failed
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn token_required() -> Self {
        Self::Unauthorized(MSG_TOKEN_REQUIRED.to_string())
    }

    pub fn token_invalid() -> Self {
        Self::Unauthorized(MSG_TOKEN_INVALID.to_string())
    }

    pub fn invalid_body() -> Self {
        Self::Validation(MSG_INVALID_BODY.to_string())
    }

    pub fn internal() -> Self {
        Self::Internal(MSG_INTERNAL.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
