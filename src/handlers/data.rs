//! Filter and aggregation over backend tables.

use crate::{
    error::{ApiError, MSG_BACKEND_QUERY},
    handlers::service_config,
    models::{
        AggregationType, DataAggregationRequest, DataAggregationResponse, DataFilterRequest,
        DataFilterResponse,
    },
    services::{
        auth::{authenticate_request, backend},
        transform::{apply_custom_filters, group_by_count, summarize},
    },
    utils::http::parse_json_body,
};
use actix_web::{Error, HttpRequest, Result, web};
use chrono::Utc;
use paperclip::actix::api_v2_operation;
use serde_json::{Value, json};
use tracing::info;

/// Backend table filter endpoint
///
/// Reads `table` with `filters` as equality query parameters.
/// `custom_filters` is accepted but not applied.
#[api_v2_operation(
    summary = "Filter Backend Data",
    description = "Reads a backend table narrowed by equality filters. `custom_filters` is accepted and ignored.",
    tags("Data"),
    responses(
        (status = 200, description = "Matching records", body = DataFilterResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 401, description = "Missing, invalid or expired bearer token"),
        (status = 500, description = "Backend query failed")
    )
)]
pub async fn data_filter(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<web::Json<DataFilterResponse>, Error> {
    let auth = authenticate_request(&req).await?;
    let config = service_config(&req)?;
    let payload: DataFilterRequest = parse_json_body(&body)?;
    let backend = backend(&req)?;

    info!(table = %payload.table, filters = payload.filters.len(), "Filtering backend data");

    let rows = backend
        .read_rows(&auth.token, &payload.table, Some(&payload.filters))
        .await
        .map_err(|_| ApiError::Upstream(MSG_BACKEND_QUERY.to_string()))?;

    let rows = apply_custom_filters(rows, &payload.custom_filters);

    Ok(web::Json(DataFilterResponse {
        success: true,
        service: config.service_name.clone(),
        table: payload.table,
        total_records: rows.len() as u64,
        data: rows,
        filters_applied: Value::Object(payload.filters),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Backend table aggregation endpoint
///
/// Reads the whole table, then `aggregation` selects count, group_by
/// (on `group_field`) or summary.
#[api_v2_operation(
    summary = "Aggregate Backend Data",
    description = "Reads an entire backend table and aggregates it. `aggregation` is one of count, group_by, summary.",
    tags("Data"),
    responses(
        (status = 200, description = "Aggregation result", body = DataAggregationResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 401, description = "Missing, invalid or expired bearer token"),
        (status = 500, description = "Backend query failed")
    )
)]
pub async fn data_aggregation(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<web::Json<DataAggregationResponse>, Error> {
    let auth = authenticate_request(&req).await?;
    let config = service_config(&req)?;
    let payload: DataAggregationRequest = parse_json_body(&body)?;
    let backend = backend(&req)?;

    info!(table = %payload.table, aggregation = %payload.aggregation, "Aggregating backend data");

    let rows = backend
        .read_rows(&auth.token, &payload.table, None)
        .await
        .map_err(|_| ApiError::Upstream(MSG_BACKEND_QUERY.to_string()))?;

    let result = match AggregationType::parse(&payload.aggregation) {
        AggregationType::Count => json!({ "total_count": rows.len() }),
        AggregationType::GroupBy => group_by_count(&rows, &payload.group_field),
        AggregationType::Summary => summarize(&rows),
        AggregationType::Unsupported => json!({ "message": "unsupported aggregation type" }),
    };

    Ok(web::Json(DataAggregationResponse {
        success: true,
        service: config.service_name.clone(),
        table: payload.table,
        aggregation_type: payload.aggregation,
        result,
        timestamp: Utc::now().to_rfc3339(),
    }))
}
