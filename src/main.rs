use std::sync::Arc;

use actix_web::HttpServer;
use roble_gateway::{
    AppMetrics, LoggingConfig, RobleBackend, RobleClient, ServiceConfig, create_base_app,
    init_tracing,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Optional .env file; real environment variables take precedence
    let _ = dotenvy::dotenv();

    let config = ServiceConfig::from_env();
    init_tracing(&LoggingConfig::from_env(config.debug));

    let metrics = AppMetrics::new().map_err(std::io::Error::other)?;
    let backend_metrics = metrics.backend_metrics().map_err(std::io::Error::other)?;
    let client = RobleClient::new(&config, Some(backend_metrics)).map_err(std::io::Error::other)?;
    let backend: Arc<dyn RobleBackend> = Arc::new(client);

    tracing::info!(
        service = %config.service_name,
        host = %config.host,
        port = config.port,
        "Starting service"
    );
    tracing::info!(auth_url = %config.auth_url(), db_url = %config.db_url(), "ROBLE backend");

    let bind = (config.host.clone(), config.port);
    HttpServer::new(move || create_base_app(config.clone(), backend.clone(), metrics.clone()))
        .bind(bind)?
        .run()
        .await
}
