//! HTTP utility functions for extracting request information.

use actix_web::{HttpMessage, HttpRequest, web};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::middleware::RequestId;

/// Extract client IP address from request headers
///
/// Attempts to extract the real client IP from common proxy headers,
/// falling back to the connection remote address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let ip_headers = ["X-Forwarded-For", "X-Real-IP", "CF-Connecting-IP"];

    for header_name in &ip_headers {
        if let Some(header_value) = req.headers().get(*header_name) {
            if let Ok(header_str) = header_value.to_str() {
                // X-Forwarded-For can contain multiple IPs, take the first one
                let ip = header_str.split(',').next().unwrap_or(header_str).trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Request ID assigned by the request-id middleware, if it ran
pub fn extract_request_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(|id| id.0.clone())
}

/// Parse a JSON request body.
///
/// An empty body or a literal `null` yields `T::default()`. Text that is not
/// JSON, or JSON that `T` cannot be built from at all (a bare string for a
/// request object), is a validation error. Request models take their
/// defaults for null or mistyped optional fields, so that case stays narrow.
pub fn parse_json_body<T>(body: &web::Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting malformed JSON body");
        ApiError::invalid_body()
    })?;

    if value.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting JSON body with unexpected shape");
        ApiError::invalid_body()
    })
}
