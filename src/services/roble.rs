//! Client for the ROBLE backend: token verification, auth proxying and
//! table storage.
//!
//! Each operation is exactly one outbound HTTP request carrying the caller's
//! bearer token. Failures are logged here with the operation name and returned
//! to the caller; nothing is retried and 4xx/5xx are not distinguished.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};
use url::Url;

use crate::{
    config::ServiceConfig,
    models::{Identity, Record},
};

/// Errors produced by backend calls
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned status {0}")]
    Status(u16),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The backend collaborator. Injected into the app as `web::Data<dyn RobleBackend>`.
#[async_trait]
pub trait RobleBackend: Send + Sync {
    /// Resolve a bearer token to the identity it belongs to
    async fn verify_token(&self, token: &str) -> Result<Identity, BackendError>;

    /// Read rows of `table`, optionally narrowed by equality query parameters
    async fn read_rows(
        &self,
        token: &str,
        table: &str,
        filters: Option<&Record>,
    ) -> Result<Vec<Value>, BackendError>;

    async fn insert_rows(
        &self,
        token: &str,
        table: &str,
        records: &[Value],
    ) -> Result<Value, BackendError>;

    async fn update_row(
        &self,
        token: &str,
        table: &str,
        id_column: &str,
        id_value: &Value,
        updates: &Value,
    ) -> Result<Value, BackendError>;

    async fn delete_row(
        &self,
        token: &str,
        table: &str,
        id_column: &str,
        id_value: &Value,
    ) -> Result<Value, BackendError>;

    /// Exchange credentials for access and refresh tokens
    async fn login(&self, email: &str, password: &str) -> Result<Value, BackendError>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<Value, BackendError>;

    /// Create a user without email verification
    async fn signup(&self, email: &str, password: &str, name: &str) -> Result<Value, BackendError>;

    /// Invalidate `token` on the backend
    async fn logout(&self, token: &str) -> Result<Value, BackendError>;
}

/// Prometheus metrics for backend calls
#[derive(Clone)]
pub struct BackendMetrics {
    /// Backend requests by operation and outcome
    pub requests_total: CounterVec,
    pub request_duration_seconds: HistogramVec,
}

impl BackendMetrics {
    /// Create the collectors and register them on `registry`
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = CounterVec::new(
            Opts::new("roble_requests_total", "Total ROBLE backend requests by operation and outcome"),
            &["operation", "outcome"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "roble_request_duration_seconds",
                "Duration of ROBLE backend requests",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["operation"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
        })
    }

    fn record(&self, operation: &str, outcome: &str, duration: Duration) {
        self.requests_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.request_duration_seconds
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }
}

/// HTTP implementation of [`RobleBackend`]
#[derive(Clone)]
pub struct RobleClient {
    client: Client,
    auth_url: String,
    db_url: String,
    metrics: Option<BackendMetrics>,
}

impl RobleClient {
    /// Build a client for the configured backend. Uses the HTTP client's default timeouts.
    pub fn new(config: &ServiceConfig, metrics: Option<BackendMetrics>) -> Result<Self, BackendError> {
        let client = Client::builder().build()?;

        // Fail at startup rather than on the first request
        Url::parse(&config.auth_url())?;
        Url::parse(&config.db_url())?;

        Ok(Self {
            client,
            auth_url: config.auth_url(),
            db_url: config.db_url(),
            metrics,
        })
    }

    fn auth_endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(Url::parse(&format!("{}/{}", self.auth_url, path))?)
    }

    fn db_endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(Url::parse(&format!("{}/{}", self.db_url, path))?)
    }

    /// URL of the read endpoint with `tableName` and filter query parameters
    fn read_url(&self, table: &str, filters: Option<&Record>) -> Result<Url, BackendError> {
        let mut url = self.db_endpoint("read")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("tableName", table);
            for (key, value) in filters.into_iter().flatten() {
                query.append_pair(key, &query_value(value));
            }
        }
        Ok(url)
    }

    /// Send one request and decode the JSON response. Logs and records every outcome.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, BackendError> {
        let start = Instant::now();
        let result = self.execute(method.clone(), url.clone(), token, body).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                debug!(
                    operation,
                    method = %method,
                    url = %redacted(&url),
                    duration_ms = duration.as_millis(),
                    "ROBLE request completed"
                );
            }
            Err(e) => {
                error!(
                    operation,
                    method = %method,
                    url = %redacted(&url),
                    error = %e,
                    duration_ms = duration.as_millis(),
                    "ROBLE request failed"
                );
            }
        }

        if let Some(metrics) = &self.metrics {
            let outcome = match &result {
                Ok(_) => "success",
                Err(BackendError::Status(_)) => "http_error",
                Err(BackendError::Network(_)) => "network_error",
                Err(_) => "error",
            };
            metrics.record(operation, outcome, duration);
        }

        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, BackendError> {
        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        // Some auth endpoints answer with an empty body
        let body = response.bytes().await?;
        let value: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))?
        };
        serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RobleBackend for RobleClient {
    async fn verify_token(&self, token: &str) -> Result<Identity, BackendError> {
        let url = self.auth_endpoint("verify-token")?;
        self.send("verify_token", Method::GET, url, Some(token), None)
            .await
    }

    async fn read_rows(
        &self,
        token: &str,
        table: &str,
        filters: Option<&Record>,
    ) -> Result<Vec<Value>, BackendError> {
        let url = self.read_url(table, filters)?;
        self.send("read_rows", Method::GET, url, Some(token), None)
            .await
    }

    async fn insert_rows(
        &self,
        token: &str,
        table: &str,
        records: &[Value],
    ) -> Result<Value, BackendError> {
        let url = self.db_endpoint("insert")?;
        let body = json!({ "tableName": table, "records": records });
        self.send("insert_rows", Method::POST, url, Some(token), Some(body))
            .await
    }

    async fn update_row(
        &self,
        token: &str,
        table: &str,
        id_column: &str,
        id_value: &Value,
        updates: &Value,
    ) -> Result<Value, BackendError> {
        let url = self.db_endpoint("update")?;
        let body = json!({
            "tableName": table,
            "idColumn": id_column,
            "idValue": id_value,
            "updates": updates,
        });
        self.send("update_row", Method::PUT, url, Some(token), Some(body))
            .await
    }

    async fn delete_row(
        &self,
        token: &str,
        table: &str,
        id_column: &str,
        id_value: &Value,
    ) -> Result<Value, BackendError> {
        let url = self.db_endpoint("delete")?;
        let body = json!({
            "tableName": table,
            "idColumn": id_column,
            "idValue": id_value,
        });
        self.send("delete_row", Method::DELETE, url, Some(token), Some(body))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Value, BackendError> {
        let url = self.auth_endpoint("login")?;
        let body = json!({ "email": email, "password": password });
        self.send("login", Method::POST, url, None, Some(body)).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Value, BackendError> {
        let url = self.auth_endpoint("refresh-token")?;
        let body = json!({ "refreshToken": refresh_token });
        self.send("refresh_token", Method::POST, url, None, Some(body))
            .await
    }

    async fn signup(&self, email: &str, password: &str, name: &str) -> Result<Value, BackendError> {
        let url = self.auth_endpoint("signup-direct")?;
        let body = json!({ "email": email, "password": password, "name": name });
        self.send("signup", Method::POST, url, None, Some(body)).await
    }

    async fn logout(&self, token: &str) -> Result<Value, BackendError> {
        let url = self.auth_endpoint("logout")?;
        self.send("logout", Method::POST, url, Some(token), None)
            .await
    }
}

/// Render a filter value as a query parameter. Strings are sent bare.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// URL without its query string, for logs
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
