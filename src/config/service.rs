//! Service configuration loaded from the environment.

use std::env;

pub const DEFAULT_ROBLE_BASE_HOST: &str = "https://roble-api.openlab.uninorte.edu.co";
pub const DEFAULT_ROBLE_CONTRACT: &str = "microservices_roble_e65ac352d7";
pub const DEFAULT_SERVICE_NAME: &str = "template-service";

/// Static configuration read once at startup and shared read-only by all requests
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base host of the ROBLE backend, without trailing slash
    pub roble_base_host: String,
    /// Backend contract (database namespace) identifier
    pub roble_contract: String,
    pub service_name: String,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// Serve `/api/metrics`; off answers 503
    pub metrics_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            roble_base_host: DEFAULT_ROBLE_BASE_HOST.to_string(),
            roble_contract: DEFAULT_ROBLE_CONTRACT.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
            metrics_enabled: true,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let roble_base_host = env::var("ROBLE_BASE_HOST")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.roble_base_host);

        let roble_contract = env::var("ROBLE_CONTRACT").unwrap_or(defaults.roble_contract);

        let service_name = env::var("SERVICE_NAME").unwrap_or(defaults.service_name);

        let host = env::var("SERVICE_HOST").unwrap_or(defaults.host);

        let port = env::var("SERVICE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let debug = env::var("DEBUG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let metrics_enabled = env::var("METRICS_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(defaults.metrics_enabled);

        Self {
            roble_base_host,
            roble_contract,
            service_name,
            host,
            port,
            debug,
            metrics_enabled,
        }
    }

    /// Base URL of the backend authentication API
    pub fn auth_url(&self) -> String {
        format!("{}/auth/{}", self.roble_base_host, self.roble_contract)
    }

    /// Base URL of the backend table storage API
    pub fn db_url(&self) -> String {
        format!("{}/database/{}", self.roble_base_host, self.roble_contract)
    }
}
