pub mod auth;
pub mod error;
pub mod middleware;
pub mod posts;
pub mod token;
pub mod users;
pub mod votes;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AppState;
use crate::middleware::require_auth;

/// Build the full application router. The binary serves this; integration
/// tests drive it directly.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/login", post(auth::login))
        .route("/users/", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/posts/", get(posts::list_posts))
        .route("/posts/", post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/votes/", post(votes::cast_vote))
        .layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello World" }))
}

/// SQLite hands timestamps back as "YYYY-MM-DD HH:MM:SS" without a
/// timezone. Parse as naive UTC and convert; corrupt data degrades to the
/// epoch rather than failing the whole response.
pub(crate) fn parse_db_time(raw: &str, entity: &str, id: i64) -> chrono::DateTime<chrono::Utc> {
    raw.parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::warn!("Corrupt created_at '{}' on {} {}: {}", raw, entity, id, e);
            chrono::DateTime::default()
        })
}
