use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{favorites, movies, users};

pub mod migrator;
pub mod repositories;

pub use repositories::favorite::{FavoriteStats, LinkError};
pub use repositories::movie::{MovieInput, MovieSearch, MovieUpdate};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn list_users(&self, skip: u64, limit: u64) -> Result<Vec<users::Model>> {
        self.user_repo().list(skip, limit).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<users::Model> {
        self.user_repo().create(name, email).await
    }

    pub async fn update_user(
        &self,
        id: i32,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<users::Model>> {
        self.user_repo().update(id, name, email).await
    }

    pub async fn remove_user(&self, id: i32) -> Result<bool> {
        self.user_repo().remove(id).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Movies ==========

    pub async fn list_movies(&self, skip: u64, limit: u64) -> Result<Vec<movies::Model>> {
        self.movie_repo().list(skip, limit).await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<movies::Model>> {
        self.movie_repo().get(id).await
    }

    pub async fn get_movie_by_title_and_year(
        &self,
        title: &str,
        year: i32,
    ) -> Result<Option<movies::Model>> {
        self.movie_repo().get_by_title_and_year(title, year).await
    }

    pub async fn create_movie(&self, input: &MovieInput) -> Result<movies::Model> {
        self.movie_repo().create(input).await
    }

    pub async fn update_movie(
        &self,
        id: i32,
        update: &MovieUpdate,
    ) -> Result<Option<movies::Model>> {
        self.movie_repo().update(id, update).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    pub async fn search_movies(&self, params: &MovieSearch) -> Result<Vec<movies::Model>> {
        self.movie_repo().search(params).await
    }

    pub async fn top_favorited_movies(&self, limit: u64) -> Result<Vec<movies::Model>> {
        self.movie_repo().top_favorited(limit).await
    }

    pub async fn movies_by_rating(&self, rating: &str, limit: u64) -> Result<Vec<movies::Model>> {
        self.movie_repo().by_rating(rating, limit).await
    }

    pub async fn recent_movies(&self, limit: u64) -> Result<Vec<movies::Model>> {
        self.movie_repo().recent(limit).await
    }

    pub async fn count_movies(&self) -> Result<u64> {
        self.movie_repo().count().await
    }

    // ========== Favorites ==========

    pub async fn list_favorites(&self, skip: u64, limit: u64) -> Result<Vec<favorites::Model>> {
        self.favorite_repo().list(skip, limit).await
    }

    pub async fn get_favorite(&self, id: i32) -> Result<Option<favorites::Model>> {
        self.favorite_repo().get(id).await
    }

    pub async fn get_favorite_with_parents(
        &self,
        id: i32,
    ) -> Result<Option<(favorites::Model, users::Model, movies::Model)>> {
        self.favorite_repo().get_with_parents(id).await
    }

    pub async fn get_favorite_pair(
        &self,
        user_id: i32,
        movie_id: i32,
    ) -> Result<Option<favorites::Model>> {
        self.favorite_repo().get_pair(user_id, movie_id).await
    }

    pub async fn link_favorite(
        &self,
        user_id: i32,
        movie_id: i32,
    ) -> Result<favorites::Model, LinkError> {
        self.favorite_repo().link(user_id, movie_id).await
    }

    pub async fn unlink_favorite_pair(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        self.favorite_repo().unlink_pair(user_id, movie_id).await
    }

    pub async fn remove_favorite(&self, id: i32) -> Result<bool> {
        self.favorite_repo().remove(id).await
    }

    pub async fn favorites_for_user(&self, user_id: i32) -> Result<Vec<favorites::Model>> {
        self.favorite_repo().list_for_user(user_id).await
    }

    pub async fn favorites_for_movie(&self, movie_id: i32) -> Result<Vec<favorites::Model>> {
        self.favorite_repo().list_for_movie(movie_id).await
    }

    pub async fn remove_all_favorites_for_user(&self, user_id: i32) -> Result<u64> {
        self.favorite_repo().remove_all_for_user(user_id).await
    }

    pub async fn favorite_movies_for_user(&self, user_id: i32) -> Result<Vec<movies::Model>> {
        self.favorite_repo().movies_for_user(user_id).await
    }

    pub async fn count_favorites(&self) -> Result<u64> {
        self.favorite_repo().count().await
    }

    pub async fn count_favorites_for_user(&self, user_id: i32) -> Result<u64> {
        self.favorite_repo().count_for_user(user_id).await
    }

    pub async fn favorite_stats(&self) -> Result<FavoriteStats> {
        self.favorite_repo().stats().await
    }
}
