pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use axum::{body::Body, middleware::from_fn, routing::get, Router};
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Environment, TemplateConfig};
use crate::services::{CacheStore, Database};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Template Service API",
        description = "HTTP API service template backed by Postgres and Redis"
    ),
    paths(handlers::ping::ping, handlers::health::health_check),
    components(schemas(
        dtos::PingData,
        dtos::PingResponse,
        dtos::MessageData,
        dtos::ErrorResponse,
        dtos::HealthChecks,
        dtos::HealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Example", description = "Example endpoints"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // Value is `Bearer <token>`.
            components.add_security_scheme(
                "AdminAuthToken",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "Bearer token, e.g. `Bearer <token>`",
                ))),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: TemplateConfig,
    pub db: Database,
    pub cache: Arc<dyn CacheStore>,
}

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics::metrics));

    // Docs are a development aid and stay off in production.
    if state.config.server.environment != Environment::Prod {
        app = app.merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_PATH, ApiDoc::openapi()));
    }

    app.with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
}
