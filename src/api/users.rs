use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, FavoriteDto, MovieDto, PageQuery, UserDto, UserStatsDto,
};
use crate::api::validation::{validate_email, validate_id, validate_name};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let (skip, limit) = super::page_bounds(&state, &page).await?;
    let users = state.store().list_users(skip, limit).await?;
    let dtos: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let name = validate_name(&payload.name)?;
    let email = validate_email(&payload.email)?;

    if state.store().get_user_by_email(email).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "A user with the email '{}' already exists",
            email
        )));
    }

    let user = state.store().create_user(name, email).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .store()
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::user_not_found(id))?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let existing = state
        .store()
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::user_not_found(id))?;

    let name = payload.name.as_deref().map(validate_name).transpose()?;
    let email = payload.email.as_deref().map(validate_email).transpose()?;

    if let Some(new_email) = email {
        if new_email != existing.email
            && state.store().get_user_by_email(new_email).await?.is_some()
        {
            return Err(ApiError::conflict(format!(
                "A user with the email '{}' already exists",
                new_email
            )));
        }
    }

    let updated = state
        .store()
        .update_user(id, name, email)
        .await?
        .ok_or_else(|| ApiError::user_not_found(id))?;
    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    // Favorites go with the user via FK cascade.
    let removed = state.store().remove_user(id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::user_not_found(id))
    }
}

/// The movies a user has marked as favorites.
pub async fn list_favorite_movies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    if state.store().get_user(id).await?.is_none() {
        return Err(ApiError::user_not_found(id));
    }

    let movies = state.store().favorite_movies_for_user(id).await?;
    let dtos: Vec<MovieDto> = movies.into_iter().map(MovieDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn mark_favorite(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> Result<(StatusCode, Json<ApiResponse<FavoriteDto>>), ApiError> {
    validate_id(user_id, "user")?;
    validate_id(movie_id, "movie")?;

    if state.store().get_user(user_id).await?.is_none() {
        return Err(ApiError::user_not_found(user_id));
    }
    if state.store().get_movie(movie_id).await?.is_none() {
        return Err(ApiError::movie_not_found(movie_id));
    }

    let favorite = state.store().link_favorite(user_id, movie_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(FavoriteDto::from(favorite))),
    ))
}

pub async fn unmark_favorite(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let removed = state.store().unlink_favorite_pair(user_id, movie_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "Movie {} is not a favorite of user {}",
            movie_id, user_id
        )))
    }
}

/// Per-user viewing stats derived from the favorited movies.
pub async fn user_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserStatsDto>>, ApiError> {
    let user = state
        .store()
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::user_not_found(id))?;

    let total_favorites = state.store().count_favorites_for_user(id).await?;
    let movies = state.store().favorite_movies_for_user(id).await?;

    let mut genre_distribution: BTreeMap<String, u32> = BTreeMap::new();
    let mut total_runtime_minutes: i64 = 0;
    for movie in &movies {
        total_runtime_minutes += i64::from(movie.runtime_minutes);
        for genre in movie.genre.split(',') {
            let genre = genre.trim();
            if !genre.is_empty() {
                *genre_distribution.entry(genre.to_string()).or_insert(0) += 1;
            }
        }
    }

    let favorite_genre = genre_distribution
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(genre, _)| genre.clone());

    #[allow(clippy::cast_precision_loss)]
    let total_runtime_hours = (total_runtime_minutes as f64 / 60.0 * 100.0).round() / 100.0;

    Ok(Json(ApiResponse::success(UserStatsDto {
        user: user.name,
        total_favorites,
        total_runtime_minutes,
        total_runtime_hours,
        favorite_genre,
        genre_distribution,
    })))
}
