//! CRUD passthrough to backend table storage.

use crate::{
    error::{ApiError, MSG_BACKEND_OPERATION, MSG_INVALID_OPERATION},
    handlers::service_config,
    models::{CrudOperation, CrudRequest, CrudResponse},
    services::auth::{authenticate_request, backend},
    utils::http::parse_json_body,
};
use actix_web::{Error, HttpRequest, Result, web};
use chrono::Utc;
use paperclip::actix::api_v2_operation;
use serde_json::Value;
use tracing::{info, warn};

/// CRUD endpoint
///
/// Each operation maps to exactly one backend call. `idValue` is forwarded
/// as given, including `null` when absent.
#[api_v2_operation(
    summary = "CRUD Operations",
    description = "`operation` is one of create, read, update, delete and maps 1:1 to a backend call on `table`.",
    tags("Data"),
    responses(
        (status = 200, description = "Backend acknowledgement", body = CrudResponse),
        (status = 400, description = "Unknown operation or malformed JSON body"),
        (status = 401, description = "Missing, invalid or expired bearer token"),
        (status = 500, description = "Backend operation failed")
    )
)]
pub async fn crud(req: HttpRequest, body: web::Bytes) -> Result<web::Json<CrudResponse>, Error> {
    let auth = authenticate_request(&req).await?;
    let config = service_config(&req)?;
    let payload: CrudRequest = parse_json_body(&body)?;

    let Some(operation) = payload.operation.as_deref().and_then(CrudOperation::parse) else {
        warn!(operation = ?payload.operation, "Rejecting unknown CRUD operation");
        return Err(ApiError::Validation(MSG_INVALID_OPERATION.to_string()).into());
    };

    let backend = backend(&req)?;
    let token = auth.token.as_str();
    let table = payload.table.as_str();

    info!(operation = operation.as_str(), table = %table, "Executing CRUD operation");

    let result = match operation {
        CrudOperation::Create => backend.insert_rows(token, table, &payload.records).await,
        CrudOperation::Read => backend
            .read_rows(token, table, Some(&payload.filters))
            .await
            .map(Value::Array),
        CrudOperation::Update => {
            backend
                .update_row(token, table, &payload.id_column, &payload.id_value, &payload.updates)
                .await
        }
        CrudOperation::Delete => {
            backend
                .delete_row(token, table, &payload.id_column, &payload.id_value)
                .await
        }
    }
    .map_err(|_| ApiError::Upstream(MSG_BACKEND_OPERATION.to_string()))?;

    Ok(web::Json(CrudResponse {
        success: true,
        service: config.service_name.clone(),
        operation: operation.as_str().to_string(),
        table: payload.table.clone(),
        result,
        timestamp: Utc::now().to_rfc3339(),
    }))
}
