use super::handlers::{admin, catalog, comments, posts, votes};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    let admin = Router::new()
        .route("/overview", get(admin::overview))
        .route("/posts/:id/tags", post(admin::set_post_tags))
        .route("/posts/:id/:action", post(admin::moderate_post))
        .route("/comments/:id/:action", post(admin::moderate_comment))
        .route("/sections", post(admin::upsert_section))
        .route("/tags", post(admin::upsert_tag));

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/:id", get(posts::get_post))
        .route("/api/posts/:id/vote", post(votes::vote_post))
        .route("/api/comments", post(comments::post_comment))
        .route("/api/comments/:id/vote", post(votes::vote_comment))
        .route("/api/sections", get(catalog::list_sections))
        .route("/api/sections/:slug", get(catalog::get_section))
        .route("/api/tags", get(catalog::list_tags))
        .nest("/api/admin", admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
