//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /{code}`                     - Short link redirect
//! - `GET    /healthz`                    - Health check: DB, click queue, cache
//! - `POST   /api/shorten`                - Create a link
//! - `GET    /api/links`                  - List links, newest first
//! - `GET    /api/links/{code}`           - Fetch one link
//! - `PATCH  /api/links/{code}`           - Toggle redirect eligibility
//! - `DELETE /api/links/{code}`           - Soft delete (reversible)
//! - `DELETE /api/links/{code}/permanent` - Hard delete, retires the code
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api::handlers::{
    delete_link_handler, get_link_handler, health_handler, list_links_handler,
    permanent_delete_link_handler, redirect_handler, shorten_handler, update_link_handler,
};
use crate::api::middleware;
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_routes = Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/links", get(list_links_handler))
        .route(
            "/links/{code}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route(
            "/links/{code}/permanent",
            delete(permanent_delete_link_handler),
        );

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/healthz", get(health_handler))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(middleware::tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
