//! Main application router.

use crate::{
    controllers::{health_controller, user_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, Router};
use roster_config::ServerConfig;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Path of the Swagger UI.
pub const DOCS_PATH: &str = "/api/documentation";
/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = Router::new().merge(user_controller::router());

    let router = Router::new()
        // Health endpoints
        .merge(health_controller::router())
        .nest("/api", api_router)
        .with_state(state)
        // Swagger UI and OpenAPI spec
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at {}", DOCS_PATH);
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
