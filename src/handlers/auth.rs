//! Login and token refresh, proxied to the backend's auth API.

use crate::{
    error::{ApiError, MSG_BACKEND_OPERATION},
    models::{
        AuthEventOutcome, AuthEventType, LoginRequest, MessageResponse, RefreshTokenRequest,
        SignupRequest,
    },
    services::{
        auth::{audit, authenticate_request, backend},
        roble::BackendError,
    },
    utils::http::parse_json_body,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

/// User login endpoint
///
/// Forwards the credentials to the backend and returns its token payload
/// unchanged. Backend failures surface as 401 without upstream detail.
#[api_v2_operation(
    summary = "User Login",
    description = "Exchange email and password for backend access and refresh tokens.",
    tags("Authentication"),
    responses(
        (status = 200, description = "Backend token payload"),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Login rejected by the backend")
    )
)]
pub async fn login(req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, Error> {
    let payload: LoginRequest = parse_json_body(&body)?;
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("email and password are required".to_string()).into());
    }

    let backend = backend(&req)?;
    match backend.login(&payload.email, &payload.password).await {
        Ok(tokens) => {
            audit(
                &req,
                AuthEventType::LoginSuccess,
                AuthEventOutcome::Success,
                Some(payload.email),
            );
            Ok(HttpResponse::Ok().json(tokens))
        }
        Err(_) => {
            audit(
                &req,
                AuthEventType::LoginFailure,
                AuthEventOutcome::Failure,
                Some(payload.email),
            );
            Err(ApiError::Unauthorized("invalid credentials".to_string()).into())
        }
    }
}

/// Token refresh endpoint
#[api_v2_operation(
    summary = "Refresh Access Token",
    description = "Exchange a refresh token for a new access token via the backend.",
    tags("Authentication"),
    responses(
        (status = 200, description = "Backend token payload"),
        (status = 400, description = "Missing refreshToken"),
        (status = 401, description = "Refresh rejected by the backend")
    )
)]
pub async fn refresh_token(req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, Error> {
    let payload: RefreshTokenRequest = parse_json_body(&body)?;
    if payload.refresh_token.is_empty() {
        return Err(ApiError::Validation("refreshToken is required".to_string()).into());
    }

    let backend = backend(&req)?;
    match backend.refresh_token(&payload.refresh_token).await {
        Ok(tokens) => {
            audit(&req, AuthEventType::TokenRefreshSuccess, AuthEventOutcome::Success, None);
            Ok(HttpResponse::Ok().json(tokens))
        }
        Err(_) => {
            audit(&req, AuthEventType::TokenRefreshFailure, AuthEventOutcome::Failure, None);
            Err(ApiError::token_invalid().into())
        }
    }
}

/// Direct signup endpoint
///
/// Creates the user without email verification. A 4xx from the backend
/// (duplicate email, weak password) is a 400 here; anything else is a 500.
#[api_v2_operation(
    summary = "User Signup",
    description = "Create a backend user directly, without email verification.",
    tags("Authentication"),
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Missing email or password, or signup rejected by the backend"),
        (status = 500, description = "Backend unavailable")
    )
)]
pub async fn signup(req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, Error> {
    let payload: SignupRequest = parse_json_body(&body)?;
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("email and password are required".to_string()).into());
    }

    let backend = backend(&req)?;
    match backend
        .signup(&payload.email, &payload.password, &payload.name)
        .await
    {
        Ok(_) => {
            audit(
                &req,
                AuthEventType::SignupSuccess,
                AuthEventOutcome::Success,
                Some(payload.email),
            );
            Ok(HttpResponse::Created().json(MessageResponse {
                message: "user created".to_string(),
            }))
        }
        Err(e) => {
            audit(
                &req,
                AuthEventType::SignupFailure,
                AuthEventOutcome::Failure,
                Some(payload.email),
            );
            Err(match e {
                BackendError::Status(status) if status < 500 => {
                    ApiError::Validation("signup rejected".to_string())
                }
                _ => ApiError::Upstream(MSG_BACKEND_OPERATION.to_string()),
            }
            .into())
        }
    }
}

/// Logout endpoint
///
/// Requires the bearer token being logged out.
#[api_v2_operation(
    summary = "User Logout",
    description = "Invalidate the caller's access token on the backend.",
    tags("Authentication"),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired bearer token"),
        (status = 500, description = "Backend logout failed")
    )
)]
pub async fn logout(req: HttpRequest) -> Result<web::Json<MessageResponse>, Error> {
    let auth = authenticate_request(&req).await?;
    let user = auth.identity.email().map(str::to_string);
    let backend = backend(&req)?;

    match backend.logout(&auth.token).await {
        Ok(_) => {
            audit(&req, AuthEventType::LogoutSuccess, AuthEventOutcome::Success, user);
            Ok(web::Json(MessageResponse {
                message: "logged out".to_string(),
            }))
        }
        Err(_) => {
            audit(&req, AuthEventType::LogoutFailure, AuthEventOutcome::Failure, user);
            Err(ApiError::Upstream(MSG_BACKEND_OPERATION.to_string()).into())
        }
    }
}
