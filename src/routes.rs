use crate::{handlers, startup::AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/feed", get(handlers::get_feed))
        .route("/feed/next", post(handlers::fetch_next_page))
        .route("/feed/pages/{page_index}", get(handlers::get_page))
        .route(
            "/feed/pages/{page_index}/memes/{meme_id}/comments",
            post(handlers::submit_comment),
        )
        .route(
            "/feed/pages/{page_index}/memes/{meme_id}/draft",
            post(handlers::submit_draft),
        )
        .route(
            "/feed/memes/{meme_id}/comment-section",
            post(handlers::toggle_comment_section),
        )
        .route("/feed/memes/{meme_id}/draft", put(handlers::set_draft))
        .route("/me", get(handlers::current_user))
        // Middleware Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
