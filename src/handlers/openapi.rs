//! OpenAPI specification generation and app factory.

use std::sync::Arc;

use crate::{
    config::ServiceConfig,
    handlers::{
        crud, data_aggregation, data_filter, get_metrics, health, info, login, logout, process,
        refresh_token, signup,
    },
    middleware::RequestTracking,
    services::{AppMetrics, roble::RobleBackend},
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the OpenAPI specification for the gateway
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "ROBLE Gateway".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Microservice that authenticates callers against a ROBLE backend and proxies \
                table reads, writes, filters and aggregations to it.\n\n\
                ## Authentication\n\
                Every `/api/*` route except `/api/metrics` and `/api/spec/v2`, and \
                `POST /auth/logout`, require `Authorization: Bearer <token>`. The token is verified against the backend's \
                `verify-token` endpoint on every request and forwarded on backend calls.\n\
                \n\
                ## Errors\n\
                Errors are returned as `{\"error\": \"<message>\"}`. Backend failures produce \
                a generic 500; details are only logged."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the complete application
///
/// The backend handle is constructed once by the caller and shared by every
/// worker; tests pass a fake here.
pub fn create_base_app(
    config: ServiceConfig,
    backend: Arc<dyn RobleBackend>,
    metrics: AppMetrics,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let backend: web::Data<dyn RobleBackend> = web::Data::from(backend);

    App::new()
        .wrap(RequestTracking)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(config))
        .app_data(backend)
        .app_data(web::Data::new(metrics))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/api/info").route(web::get().to(info)))
        .service(web::resource("/api/process").route(web::post().to(process)))
        .service(web::resource("/api/data-filter").route(web::post().to(data_filter)))
        .service(web::resource("/api/data-aggregation").route(web::post().to(data_aggregation)))
        .service(web::resource("/api/crud").route(web::post().to(crud)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/auth/login").route(web::post().to(login)))
        .service(web::resource("/auth/refresh-token").route(web::post().to(refresh_token)))
        .service(web::resource("/auth/signup").route(web::post().to(signup)))
        .service(web::resource("/auth/logout").route(web::post().to(logout)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
