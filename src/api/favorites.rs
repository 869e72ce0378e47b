use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, FavoriteCheckDto, FavoriteDetailDto, FavoriteDto,
    FavoriteStatsDto, MovieDto, PageQuery, TopMovieDto, TopUserDto, UserDto,
};
use crate::api::validation::validate_id;

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub user_id: i32,
    pub movie_id: i32,
}

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<FavoriteDto>>>, ApiError> {
    let (skip, limit) = super::page_bounds(&state, &page).await?;
    let favorites = state.store().list_favorites(skip, limit).await?;
    let dtos: Vec<FavoriteDto> = favorites.into_iter().map(FavoriteDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_favorite(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFavoriteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FavoriteDto>>), ApiError> {
    validate_id(payload.user_id, "user")?;
    validate_id(payload.movie_id, "movie")?;

    // Existence checks first so a missing parent answers 404, not a
    // foreign-key error. Duplicates are caught by the unique pair index.
    if state.store().get_user(payload.user_id).await?.is_none() {
        return Err(ApiError::user_not_found(payload.user_id));
    }
    if state.store().get_movie(payload.movie_id).await?.is_none() {
        return Err(ApiError::movie_not_found(payload.movie_id));
    }

    let favorite = state
        .store()
        .link_favorite(payload.user_id, payload.movie_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(FavoriteDto::from(favorite))),
    ))
}

pub async fn get_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FavoriteDetailDto>>, ApiError> {
    let (favorite, user, movie) = state
        .store()
        .get_favorite_with_parents(id)
        .await?
        .ok_or_else(|| ApiError::favorite_not_found(id))?;

    let dto = FavoriteDetailDto {
        id: favorite.id,
        user_id: favorite.user_id,
        movie_id: favorite.movie_id,
        created_at: favorite.created_at,
        user: UserDto::from(user),
        movie: MovieDto::from(movie),
    };
    Ok(Json(ApiResponse::success(dto)))
}

pub async fn delete_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let removed = state.store().remove_favorite(id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::favorite_not_found(id))
    }
}

pub async fn favorites_by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<FavoriteDto>>>, ApiError> {
    if state.store().get_user(user_id).await?.is_none() {
        return Err(ApiError::user_not_found(user_id));
    }

    let favorites = state.store().favorites_for_user(user_id).await?;
    let dtos: Vec<FavoriteDto> = favorites.into_iter().map(FavoriteDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn favorites_by_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<FavoriteDto>>>, ApiError> {
    if state.store().get_movie(movie_id).await?.is_none() {
        return Err(ApiError::movie_not_found(movie_id));
    }

    let favorites = state.store().favorites_for_movie(movie_id).await?;
    let dtos: Vec<FavoriteDto> = favorites.into_iter().map(FavoriteDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// Pure read; an absent pair answers `is_favorite: false`, never an error.
pub async fn check_favorite(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<FavoriteCheckDto>>, ApiError> {
    let favorite = state.store().get_favorite_pair(user_id, movie_id).await?;

    let dto = match favorite {
        Some(favorite) => FavoriteCheckDto {
            is_favorite: true,
            favorite_id: Some(favorite.id),
            marked_at: Some(favorite.created_at),
        },
        None => FavoriteCheckDto {
            is_favorite: false,
            favorite_id: None,
            marked_at: None,
        },
    };
    Ok(Json(ApiResponse::success(dto)))
}

pub async fn favorites_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<FavoriteStatsDto>>, ApiError> {
    let stats = state.store().favorite_stats().await?;

    let (top_user_name, top_user_count) = stats
        .top_user
        .map_or((None, 0), |(user, count)| (Some(user.name), count));
    let (top_movie_title, top_movie_count) = stats
        .top_movie
        .map_or((None, 0), |(movie, count)| (Some(movie.title), count));

    let dto = FavoriteStatsDto {
        total_favorites: stats.total,
        top_user: TopUserDto {
            name: top_user_name,
            favorite_count: top_user_count,
        },
        top_movie: TopMovieDto {
            title: top_movie_title,
            favorite_count: top_movie_count,
        },
    };
    Ok(Json(ApiResponse::success(dto)))
}

/// Irreversibly clears every favorite of one user in a single statement.
pub async fn delete_all_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if state.store().get_user(user_id).await?.is_none() {
        return Err(ApiError::user_not_found(user_id));
    }

    state.store().remove_all_favorites_for_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
