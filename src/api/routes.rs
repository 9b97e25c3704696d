use crate::api::{handlers, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::health_check))
        .route("/health/ready", get(handlers::health_check))
        // Search
        .route(
            "/v1/tech-messages/search",
            post(handlers::search_tech_messages),
        )
        // Catalog administration
        .route("/v1/tech-messages", post(handlers::create_tech_message))
        .route("/v1/tech-messages", get(handlers::list_tech_messages))
        .route(
            "/v1/tech-messages/categories",
            get(handlers::list_categories),
        )
        .route("/v1/tech-messages/:id", get(handlers::get_tech_message))
        .route("/v1/tech-messages/:id", put(handlers::update_tech_message))
        .route(
            "/v1/tech-messages/:id",
            delete(handlers::delete_tech_message),
        )
        .route(
            "/v1/tech-messages/:id/tiers",
            post(handlers::add_action_tier),
        )
        .route(
            "/v1/tech-messages/:id/tiers/:tier_id",
            put(handlers::update_action_tier),
        )
        .route(
            "/v1/tech-messages/:id/tiers/:tier_id",
            delete(handlers::delete_action_tier),
        )
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
