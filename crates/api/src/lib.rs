//! HTTP front of the social-feed read view.
//!
//! Serves the query facade as REST endpoints, accepts events onto the
//! in-memory channel, and exposes health and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use event_channel::EventPublisher;
use metrics_exporter_prometheus::PrometheusHandle;
use read_view::{MaterializedStore, QueryFacade};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub queries: QueryFacade,
    pub publisher: EventPublisher,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/events", post(routes::events::publish))
        .route("/users/by-username/{username}", get(routes::users::get_by_username))
        .route("/users/{id}", get(routes::users::get))
        .route("/users/{id}/tweets", get(routes::users::tweets))
        .route("/users/{id}/timeline", get(routes::users::timeline))
        .route("/users/{id}/followers", get(routes::users::followers))
        .route("/users/{id}/followees", get(routes::users::followees))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over an already bootstrapped store.
pub fn create_state(store: MaterializedStore, publisher: EventPublisher) -> Arc<AppState> {
    Arc::new(AppState {
        queries: QueryFacade::new(store),
        publisher,
    })
}
