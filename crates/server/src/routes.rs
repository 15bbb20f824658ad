use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use crate::auth::{self, ServerState};

pub mod assets;

/// Build the full application router: public, viewer, editor and admin groups.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    // Public: liveness, browse page, downloads. Packages stay fetchable
    // without a key so render nodes can pull them directly.
    let public = Router::new()
        .route("/health", get(assets::health))
        .route("/api/stats", get(assets::stats))
        .route("/ui", get(assets::ui))
        .route("/api/assets/:id/download", get(assets::download_file))
        .route("/api/assets/:id/package", get(assets::download_package));

    let viewer = Router::new()
        .route("/", get(assets::home))
        .route("/api/assets", get(assets::list_assets))
        .route("/api/assets/:id", get(assets::asset_detail))
        .route("/api/assets/:id/comment", post(assets::add_comment))
        .route("/api/changes", get(assets::list_changes))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_viewer));

    let editor = Router::new()
        .route("/api/assets", post(assets::publish_asset))
        .route("/api/upload", post(assets::upload_file))
        .route("/api/assets/:id", patch(assets::update_asset))
        .route("/api/assets/:id/status", post(assets::set_status))
        // exported scene files can be large; the axum default of 2 MiB is too small
        .layer(DefaultBodyLimit::max(512 * 1024 * 1024))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_editor));

    let admin = Router::new()
        .route("/api/assets/:id", delete(assets::delete_asset))
        .route("/api/assets/:id/versions/:version", delete(assets::delete_version))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    public
        .merge(viewer)
        .merge(editor)
        .merge(admin)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
