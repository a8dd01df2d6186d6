//! Axum router construction.

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::routes;

/// Build the complete Axum router.
///
/// Playlist paths carry their `.m3u8` suffix inside the path parameters;
/// the handlers strip and validate it, so a bad suffix surfaces as a
/// malformed-request playlist body instead of a bare 404.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/{tenant}/{channel}", get(routes::manifest::master))
        .route(
            "/{tenant}/{channel}/{rendition}",
            get(routes::manifest::child),
        )
        .fallback(routes::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
