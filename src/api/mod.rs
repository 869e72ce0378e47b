use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::state::SharedState;

mod error;
mod favorites;
mod movies;
mod stats;
mod system;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

/// Resolves `skip`/`limit` against the configured page-size bounds.
pub(crate) async fn page_bounds(
    state: &AppState,
    page: &PageQuery,
) -> Result<(u64, u64), ApiError> {
    let (default_limit, max_limit) = {
        let config = state.config().read().await;
        (
            config.server.default_page_size,
            config.server.max_page_size,
        )
    };
    let limit = validation::validate_limit(page.limit.unwrap_or(default_limit), max_limit)?;
    Ok((page.skip, limit))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().read().await.server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_routes())
        .route("/", get(system::service_info))
        .route("/health", get(system::health))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}", put(users::update_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/users/{id}/favorites", get(users::list_favorite_movies))
        .route(
            "/users/{id}/favorites/{movie_id}",
            post(users::mark_favorite),
        )
        .route(
            "/users/{id}/favorites/{movie_id}",
            delete(users::unmark_favorite),
        )
        .route("/users/{id}/stats", get(users::user_stats))
        .route("/movies", get(movies::list_movies))
        .route("/movies", post(movies::create_movie))
        .route("/movies/search", get(movies::search_movies))
        .route("/movies/popular", get(movies::popular_movies))
        .route("/movies/recent", get(movies::recent_movies))
        .route("/movies/rating/{rating}", get(movies::movies_by_rating))
        .route("/movies/{id}", get(movies::get_movie))
        .route("/movies/{id}", put(movies::update_movie))
        .route("/movies/{id}", delete(movies::delete_movie))
        .route("/favorites", get(favorites::list_favorites))
        .route("/favorites", post(favorites::create_favorite))
        .route("/favorites/stats", get(favorites::favorites_stats))
        .route("/favorites/{id}", get(favorites::get_favorite))
        .route("/favorites/{id}", delete(favorites::delete_favorite))
        .route("/favorites/user/{user_id}", get(favorites::favorites_by_user))
        .route(
            "/favorites/user/{user_id}/all",
            delete(favorites::delete_all_for_user),
        )
        .route(
            "/favorites/movie/{movie_id}",
            get(favorites::favorites_by_movie),
        )
        .route(
            "/favorites/check/{user_id}/{movie_id}",
            get(favorites::check_favorite),
        )
        .route("/stats", get(stats::platform_stats))
}
