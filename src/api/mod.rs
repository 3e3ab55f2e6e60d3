pub mod error;
mod extract;
mod interests;
mod users;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/interests", get(users::list_user_interests))
        .route(
            "/users/:id/interests/:interest_id",
            post(users::add_user_interest).delete(users::remove_user_interest),
        )
        // Interests
        .route(
            "/interests",
            get(interests::list_interests).post(interests::create_interest),
        );

    let prefix = state.config.server.api_prefix.trim_end_matches('/');
    let router = Router::new().route("/health", get(health_check));

    // axum refuses to nest at the root
    let router = if prefix.is_empty() {
        router.merge(api_routes)
    } else {
        router.nest(prefix, api_routes)
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
