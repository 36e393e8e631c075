//! Processing of caller-supplied record arrays.

use crate::{
    handlers::service_config,
    models::{ProcessRequest, ProcessResponse, ProcessingType},
    services::{
        auth::authenticate_request,
        transform::{aggregate_basic, analyze_basic, filter_by_equality},
    },
    utils::http::parse_json_body,
};
use actix_web::{Error, HttpRequest, Result, web};
use chrono::Utc;
use paperclip::actix::api_v2_operation;
use serde_json::{Value, json};
use tracing::info;

/// Records echoed back by the basic processing type
const SAMPLE_SIZE: usize = 3;

/// Generic data processing endpoint
///
/// `type` selects the transform: `filter` (equality on `criteria`),
/// `aggregate`, `analyze`; anything else returns a count and a sample.
#[api_v2_operation(
    summary = "Process Data",
    description = "Applies a transform to the `data` array in the request body. `type` is one of filter, aggregate, analyze; other values echo a count and sample.",
    tags("Processing"),
    responses(
        (status = 200, description = "Processing result", body = ProcessResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 401, description = "Missing, invalid or expired bearer token")
    )
)]
pub async fn process(req: HttpRequest, body: web::Bytes) -> Result<web::Json<ProcessResponse>, Error> {
    let auth = authenticate_request(&req).await?;
    let config = service_config(&req)?;
    let payload: ProcessRequest = parse_json_body(&body)?;

    info!(
        processing_type = %payload.processing_type,
        records = payload.data.len(),
        "Processing data"
    );

    let result = match ProcessingType::parse(&payload.processing_type) {
        ProcessingType::Filter => Value::Array(filter_by_equality(&payload.data, &payload.criteria)),
        ProcessingType::Aggregate => aggregate_basic(&payload.data),
        ProcessingType::Analyze => analyze_basic(&payload.data),
        ProcessingType::Basic => json!({
            "processed_count": payload.data.len(),
            "processing_type": &payload.processing_type,
            "timestamp": Utc::now().to_rfc3339(),
            "sample": payload.data.iter().take(SAMPLE_SIZE).collect::<Vec<_>>(),
        }),
    };

    Ok(web::Json(ProcessResponse {
        success: true,
        service: config.service_name.clone(),
        processing_type: payload.processing_type,
        user: auth.identity.email().map(str::to_string),
        result,
    }))
}
