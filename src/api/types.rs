use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{favorites, movies, users};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<users::Model> for UserDto {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub genre: String,
    pub runtime_minutes: i32,
    pub year: i32,
    pub rating: String,
    pub synopsis: Option<String>,
    pub created_at: String,
}

impl From<movies::Model> for MovieDto {
    fn from(movie: movies::Model) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            director: movie.director,
            genre: movie.genre,
            runtime_minutes: movie.runtime_minutes,
            year: movie.year,
            rating: movie.rating,
            synopsis: movie.synopsis,
            created_at: movie.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FavoriteDto {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub created_at: String,
}

impl From<favorites::Model> for FavoriteDto {
    fn from(favorite: favorites::Model) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            movie_id: favorite.movie_id,
            created_at: favorite.created_at,
        }
    }
}

/// A favorite with both parent records embedded.
#[derive(Debug, Serialize)]
pub struct FavoriteDetailDto {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub created_at: String,
    pub user: UserDto,
    pub movie: MovieDto,
}

#[derive(Debug, Serialize)]
pub struct FavoriteCheckDto {
    pub is_favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopUserDto {
    pub name: Option<String>,
    pub favorite_count: i64,
}

#[derive(Debug, Serialize)]
pub struct TopMovieDto {
    pub title: Option<String>,
    pub favorite_count: i64,
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatsDto {
    pub total_favorites: u64,
    pub top_user: TopUserDto,
    pub top_movie: TopMovieDto,
}

#[derive(Debug, Serialize)]
pub struct PlatformStatsDto {
    pub total_users: u64,
    pub total_movies: u64,
    pub total_favorites: u64,
    pub most_popular_movie: Option<String>,
    pub most_active_user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserStatsDto {
    pub user: String,
    pub total_favorites: u64,
    pub total_runtime_minutes: i64,
    pub total_runtime_hours: f64,
    pub favorite_genre: Option<String>,
    pub genre_distribution: BTreeMap<String, u32>,
}

/// Standard `skip`/`limit` pagination parameters for list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}
