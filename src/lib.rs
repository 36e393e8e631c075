//! ROBLE Gateway - an authenticated HTTP front for a ROBLE backend
//!
//! The service verifies bearer tokens against the backend's auth API and
//! proxies table storage operations to it. It also runs a few elementary
//! transforms (equality filter, group-by count, summaries) over
//! caller-supplied or backend-read record arrays.
//!
//! ## Architecture
//!
//! - `config/` - environment-loaded configuration and tracing setup
//! - `models/` - request/response envelopes, auth context, audit events
//! - `services/` - backend client, auth gate, transforms, metrics
//! - `handlers/` - one handler per endpoint and the app factory
//! - `middleware/` - request tracking (request ID, access log, metrics)
//! - `utils/` - request header helpers and body parsing
//! - `error` - HTTP error taxonomy
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use actix_web::HttpServer;
//! use roble_gateway::{create_base_app, AppMetrics, RobleClient, ServiceConfig};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServiceConfig::from_env();
//!     let metrics = AppMetrics::new().expect("metrics");
//!     let client = RobleClient::new(&config, None).expect("client");
//!     let backend: Arc<dyn roble_gateway::RobleBackend> = Arc::new(client);
//!     let bind = (config.host.clone(), config.port);
//!
//!     HttpServer::new(move || create_base_app(config.clone(), backend.clone(), metrics.clone()))
//!         .bind(bind)?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{LoggingConfig, ServiceConfig, init_tracing};
pub use error::{ApiError, ErrorBody};
pub use handlers::{
    create_base_app, create_openapi_spec, crud, data_aggregation, data_filter, get_metrics,
    health, info, login, logout, process, refresh_token, signup,
};
pub use middleware::{RequestId, RequestTracking};
pub use models::{
    AuthAuditEvent, AuthContext, AuthEventOutcome, AuthEventType, CrudRequest, CrudResponse,
    DataAggregationRequest, DataAggregationResponse, DataFilterRequest, DataFilterResponse,
    HealthResponse, Identity, InfoResponse, LoginRequest, MessageResponse, ProcessRequest,
    ProcessResponse, Record, RefreshTokenRequest, SignupRequest,
};
pub use services::{
    AppMetrics, BackendError, BackendMetrics, RobleBackend, RobleClient, aggregate_basic,
    analyze_basic, authenticate_request, filter_by_equality, group_by_count, summarize,
};
