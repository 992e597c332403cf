//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::domains::harvesting::models::{
    BacklinksRequest, BulkNewLostRequest, BulkRanksRequest, BulkReferringRequest, OnPageRequest,
    SerpRequest,
};
use crate::kernel::ServerDeps;
use crate::server::routes::{accept_workflow, health_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub server_deps: Arc<ServerDeps>,
    /// Only used by the health check; absent in tests
    pub db_pool: Option<PgPool>,
}

/// Build the Axum application router
///
/// Every harvest route accepts its request body, starts the workflow detached
/// from the request and answers `202 Accepted` immediately.
pub fn build_app(server_deps: Arc<ServerDeps>, db_pool: Option<PgPool>) -> Router {
    let app_state = AppState {
        server_deps,
        db_pool,
    };

    Router::new()
        .route("/api/dataforseo/serp", post(accept_workflow::<SerpRequest>))
        .route(
            "/api/dataforseo/backlinks",
            post(accept_workflow::<BacklinksRequest>),
        )
        .route(
            "/api/dataforseo/bulk-ranks",
            post(accept_workflow::<BulkRanksRequest>),
        )
        .route(
            "/api/dataforseo/bulk-referring-domains",
            post(accept_workflow::<BulkReferringRequest>),
        )
        .route(
            "/api/dataforseo/bulk-new-lost",
            post(accept_workflow::<BulkNewLostRequest>),
        )
        .route(
            "/api/dataforseo/on-page",
            post(accept_workflow::<OnPageRequest>),
        )
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
}
