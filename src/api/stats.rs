use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, PlatformStatsDto};

/// Platform-wide totals plus the most popular movie and most active user.
pub async fn platform_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PlatformStatsDto>>, ApiError> {
    let total_users = state.store().count_users().await?;
    let total_movies = state.store().count_movies().await?;
    let favorite_stats = state.store().favorite_stats().await?;

    let dto = PlatformStatsDto {
        total_users,
        total_movies,
        total_favorites: favorite_stats.total,
        most_popular_movie: favorite_stats.top_movie.map(|(movie, _)| movie.title),
        most_active_user: favorite_stats.top_user.map(|(user, _)| user.name),
    };
    Ok(Json(ApiResponse::success(dto)))
}
