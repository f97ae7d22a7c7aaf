pub mod config;
pub mod errors;
pub mod matcher;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::store::TemplateStore;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<TemplateStore>,
    pub config: config::AppConfig,
}

/// Raw provider responses are SMS-sized; request bodies never need more.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the full API router. Shared by the binary and the integration tests
/// so both serve exactly the same surface.
pub fn app(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(
                frontend_url = %state.config.frontend_url,
                "FRONTEND_URL is not a valid origin, allowing any"
            );
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let response_routes = Router::new()
        .route(
            "/responses",
            get(routes::response_groups::list).post(routes::response_groups::create),
        )
        .route("/responses/check", post(routes::check::check))
        .route("/responses/classify", post(routes::check::classify))
        .route(
            "/responses/import",
            post(routes::response_groups::import_bulk),
        )
        .route(
            "/responses/{id}",
            get(routes::response_groups::get_by_id)
                .put(routes::response_groups::update)
                .delete(routes::response_groups::delete),
        );

    Router::new()
        .route("/health/live", get(routes::health::live))
        .route("/health/ready", get(routes::health::ready))
        .nest("/api/v1", response_routes)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}
