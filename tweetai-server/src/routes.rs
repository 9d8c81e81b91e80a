use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::rate_limit::{self, RateLimiter};
use crate::realtime;
use crate::state::AppState;

/// Build the application router
///
/// Only the read endpoints are rate limited; the count broadcast, the docs,
/// the WebSocket and the health check are not.
pub fn build_router(state: AppState, rate_limiter: RateLimiter) -> Router {
    let throttled = Router::new()
        .route("/api/autobots", get(api::autobots::list_autobots))
        .route("/api/autobots/:id/posts", get(api::autobots::get_autobot_posts))
        .route("/api/posts/:id/comments", get(api::posts::get_post_comments))
        .route_layer(middleware::from_fn(rate_limit::rate_limit_middleware))
        .route_layer(Extension(rate_limiter));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(throttled)
        .route("/health", get(health_check))
        .route("/api/update-autobot-count", post(api::autobots::update_autobot_count))
        .route("/api-docs", get(api::docs::swagger_ui))
        .route(api::docs::OPENAPI_PATH, get(api::docs::openapi_json))
        .route("/ws", get(realtime::ws_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

async fn health_check() -> &'static str {
    "OK"
}
