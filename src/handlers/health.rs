//! Health check and service information handlers.

use crate::{
    config::{DEFAULT_SERVICE_NAME, ServiceConfig},
    handlers::service_config,
    models::{HealthResponse, InfoResponse},
    services::auth::authenticate_request,
};
use actix_web::{Error, HttpRequest, Result, web};
use chrono::Utc;
use paperclip::actix::api_v2_operation;

pub const SERVICE_VERSION: &str = "1.0.0";
pub const SERVICE_DESCRIPTION: &str = "Microservice template with ROBLE integration";

/// Routes advertised by the info endpoint
pub const ADVERTISED_ENDPOINTS: [&str; 6] = [
    "/health",
    "/api/info",
    "/api/process",
    "/api/data-filter",
    "/api/data-aggregation",
    "/api/crud",
];

/// Health check endpoint
///
/// Static liveness report. `roble_connection` is always "ok"; the backend is
/// not contacted.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the service name and a static healthy status. Does not probe the backend.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health(req: HttpRequest) -> Result<web::Json<HealthResponse>, Error> {
    let service = req
        .app_data::<web::Data<ServiceConfig>>()
        .map(|c| c.service_name.clone())
        .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

    Ok(web::Json(HealthResponse {
        service,
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        roble_connection: "ok".to_string(),
    }))
}

/// Service information endpoint
#[api_v2_operation(
    summary = "Service Information",
    description = "Static service metadata plus the caller's email and the configured backend contract.",
    tags("Info"),
    responses(
        (status = 200, description = "Successful response", body = InfoResponse),
        (status = 401, description = "Missing, invalid or expired bearer token")
    )
)]
pub async fn info(req: HttpRequest) -> Result<web::Json<InfoResponse>, Error> {
    let auth = authenticate_request(&req).await?;
    let config = service_config(&req)?;

    Ok(web::Json(InfoResponse {
        service_name: config.service_name.clone(),
        version: SERVICE_VERSION.to_string(),
        description: SERVICE_DESCRIPTION.to_string(),
        endpoints: ADVERTISED_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        user: auth.identity.email().unwrap_or("unknown").to_string(),
        roble_database: config.roble_contract.clone(),
    }))
}
