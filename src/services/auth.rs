//! Bearer-token authentication gate.
//!
//! Protected handlers call [`authenticate_request`] first; it either yields an
//! [`AuthContext`] for the rest of the handler or the 401 to return.
//! Verification results are never cached.

use actix_web::{HttpMessage, HttpRequest, web};

use crate::{
    error::ApiError,
    models::{AuthAuditEvent, AuthContext, AuthEventOutcome, AuthEventType},
    services::roble::RobleBackend,
    utils::http::{extract_client_ip, extract_request_id, extract_user_agent},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// `None` means the header is not a bearer header at all. Otherwise the token
/// is the text after the prefix up to the next space, which may be empty
/// (`"Bearer "`, `"Bearer  abc"`).
pub fn parse_bearer_token(header: &str) -> Option<&str> {
    let rest = header.strip_prefix(BEARER_PREFIX)?;
    Some(rest.split(' ').next().unwrap_or_default())
}

/// Look up the backend handle registered on the app
pub fn backend(req: &HttpRequest) -> Result<web::Data<dyn RobleBackend>, ApiError> {
    req.app_data::<web::Data<dyn RobleBackend>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("No ROBLE backend registered on the application");
            ApiError::internal()
        })
}

/// Verify the request's bearer token against the backend.
///
/// On success the context is also stored in the request extensions.
pub async fn authenticate_request(req: &HttpRequest) -> Result<AuthContext, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(parse_bearer_token)
        .map(str::to_string);

    let Some(token) = token else {
        audit(req, AuthEventType::MissingToken, AuthEventOutcome::Failure, None);
        return Err(ApiError::token_required());
    };

    // An empty token can never verify; skip the round trip
    if token.is_empty() {
        audit(
            req,
            AuthEventType::TokenVerificationFailure,
            AuthEventOutcome::Failure,
            None,
        );
        return Err(ApiError::token_invalid());
    }

    let backend = backend(req)?;
    let identity = match backend.verify_token(&token).await {
        Ok(identity) if !identity.is_empty() => identity,
        Ok(_) | Err(_) => {
            audit(
                req,
                AuthEventType::TokenVerificationFailure,
                AuthEventOutcome::Failure,
                None,
            );
            return Err(ApiError::token_invalid());
        }
    };

    audit(
        req,
        AuthEventType::TokenVerificationSuccess,
        AuthEventOutcome::Success,
        identity.email().map(str::to_string),
    );

    let context = AuthContext { identity, token };
    req.extensions_mut().insert(context.clone());
    Ok(context)
}

/// Emit an audit event describing `req`
pub fn audit(
    req: &HttpRequest,
    event_type: AuthEventType,
    outcome: AuthEventOutcome,
    user_id: Option<String>,
) {
    AuthAuditEvent::new(
        event_type,
        outcome,
        extract_client_ip(req),
        req.method().to_string(),
        req.uri().path().to_string(),
    )
    .with_user_agent(extract_user_agent(req))
    .with_user_id(user_id)
    .with_request_id(extract_request_id(req))
    .log();
}
