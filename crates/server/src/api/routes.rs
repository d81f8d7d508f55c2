use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use vidshelf_core::MEDIA_ROUTE;

use super::{handlers, middleware::metrics_middleware, videos};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let media_root = state.library().media_root().to_path_buf();
    let client_dir = state.config().server.client_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health, config and stats
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/stats", get(handlers::get_stats))
        // Videos
        .route("/videos", get(videos::list_videos))
        .route("/videos/search", get(videos::search_videos))
        .route("/videos/rescan", get(videos::rescan))
        .route("/videos/{id}", get(videos::get_video))
        .route("/videos/{id}/tags", post(videos::add_tag))
        .route("/videos/{id}/tags/{tag}", delete(videos::remove_tag));

    let router = Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::metrics))
        // Media files are served as-is from the media root
        .nest_service(MEDIA_ROUTE, ServeDir::new(media_root))
        .with_state(state);

    // Serve the web client with SPA fallback
    let router = match client_dir {
        Some(dir) => {
            let index_path = dir.join("index.html");
            router.fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(index_path)))
        }
        None => router,
    };

    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
