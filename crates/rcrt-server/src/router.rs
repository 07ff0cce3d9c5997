use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router, mounted under the configured prefix.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let routes = Router::new()
        .route("/", get(handler::index_handler))
        .route(
            "/edit/*path",
            get(handler::edit_page_handler).post(handler::edit_handler),
        )
        .route("/new", post(handler::create_handler))
        .nest_service("/app", ServeDir::new(&config.app_dir))
        .nest_service("/db", ServeDir::new(state.store.root()))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state);

    let app = if config.prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&config.prefix, routes)
    };
    app.layer(TraceLayer::new_for_http())
}
