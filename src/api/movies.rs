use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MovieDto, PageQuery};
use crate::api::validation::{
    validate_director, validate_genre, validate_limit, validate_rating, validate_rating_class,
    validate_runtime, validate_synopsis, validate_title, validate_year,
};
use crate::db::{MovieInput, MovieSearch, MovieUpdate};

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub director: String,
    pub genre: String,
    pub runtime_minutes: i32,
    pub year: i32,
    pub rating: String,
    pub synopsis: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub synopsis: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMoviesQuery {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<u64>,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let (skip, limit) = super::page_bounds(&state, &page).await?;
    let movies = state.store().list_movies(skip, limit).await?;
    let dtos: Vec<MovieDto> = movies.into_iter().map(MovieDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MovieDto>>), ApiError> {
    let title = validate_title(&payload.title)?;
    let director = validate_director(&payload.director)?;
    let genre = validate_genre(&payload.genre)?;
    let runtime_minutes = validate_runtime(payload.runtime_minutes)?;
    let year = validate_year(payload.year)?;
    let rating = validate_rating(&payload.rating)?;
    let synopsis = payload
        .synopsis
        .as_deref()
        .map(validate_synopsis)
        .transpose()?;

    if state
        .store()
        .get_movie_by_title_and_year(title, year)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(format!(
            "A movie titled '{}' from {} already exists",
            title, year
        )));
    }

    let input = MovieInput {
        title: title.to_string(),
        director: director.to_string(),
        genre: genre.to_string(),
        runtime_minutes,
        year,
        rating: rating.to_string(),
        synopsis: synopsis.map(String::from),
    };

    let movie = state.store().create_movie(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MovieDto::from(movie))),
    ))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let movie = state
        .store()
        .get_movie(id)
        .await?
        .ok_or_else(|| ApiError::movie_not_found(id))?;
    Ok(Json(ApiResponse::success(MovieDto::from(movie))))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMovieRequest>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    if state.store().get_movie(id).await?.is_none() {
        return Err(ApiError::movie_not_found(id));
    }

    let update = MovieUpdate {
        title: payload
            .title
            .as_deref()
            .map(validate_title)
            .transpose()?
            .map(String::from),
        director: payload
            .director
            .as_deref()
            .map(validate_director)
            .transpose()?
            .map(String::from),
        genre: payload
            .genre
            .as_deref()
            .map(validate_genre)
            .transpose()?
            .map(String::from),
        runtime_minutes: payload
            .runtime_minutes
            .map(validate_runtime)
            .transpose()?,
        year: payload.year.map(validate_year).transpose()?,
        rating: payload
            .rating
            .as_deref()
            .map(validate_rating)
            .transpose()?
            .map(String::from),
        synopsis: payload
            .synopsis
            .as_deref()
            .map(validate_synopsis)
            .transpose()?
            .map(String::from),
    };

    let updated = state
        .store()
        .update_movie(id, &update)
        .await?
        .ok_or_else(|| ApiError::movie_not_found(id))?;
    Ok(Json(ApiResponse::success(MovieDto::from(updated))))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    // Favorites referencing the movie go with it via FK cascade.
    let removed = state.store().remove_movie(id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::movie_not_found(id))
    }
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchMoviesQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let params = MovieSearch {
        title: query.title,
        director: query.director,
        genre: query.genre,
        year: query.year,
        year_min: query.year_min,
        year_max: query.year_max,
    };

    let movies = state.store().search_movies(&params).await?;
    let dtos: Vec<MovieDto> = movies.into_iter().map(MovieDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// Most-favorited movies first.
pub async fn popular_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let limit = validate_limit(query.limit.unwrap_or(10), 50)?;
    let movies = state.store().top_favorited_movies(limit).await?;
    let dtos: Vec<MovieDto> = movies.into_iter().map(MovieDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn movies_by_rating(
    State(state): State<Arc<AppState>>,
    Path(rating): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let rating = validate_rating_class(&rating)?;
    let (_, limit) = super::page_bounds(&state, &page).await?;
    let movies = state.store().movies_by_rating(&rating, limit).await?;
    let dtos: Vec<MovieDto> = movies.into_iter().map(MovieDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// Newest additions first, by creation timestamp.
pub async fn recent_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let limit = validate_limit(query.limit.unwrap_or(10), 50)?;
    let movies = state.store().recent_movies(limit).await?;
    let dtos: Vec<MovieDto> = movies.into_iter().map(MovieDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}
