use crate::entities::{favorites, movies, prelude::*, users};
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
};
use thiserror::Error;
use tracing::info;

/// Repository for the user-movie favorite links.
///
/// Uniqueness of a `(user_id, movie_id)` pair is enforced by the database
/// index, not by a check-then-insert sequence; [`link`](Self::link) maps the
/// constraint violation to [`LinkError::Duplicate`].
pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("movie {movie_id} is already a favorite of user {user_id}")]
    Duplicate { user_id: i32, movie_id: i32 },
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// Aggregate favorite counts across the platform.
#[derive(Debug)]
pub struct FavoriteStats {
    pub total: u64,
    pub top_user: Option<(users::Model, i64)>,
    pub top_movie: Option<(movies::Model, i64)>,
}

#[derive(Debug, FromQueryResult)]
struct ParentCount {
    parent_id: i32,
    favorite_count: i64,
}

impl FavoriteRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<favorites::Model>> {
        let rows = Favorites::find()
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<favorites::Model>> {
        Ok(Favorites::find_by_id(id).one(&self.conn).await?)
    }

    /// Fetches a favorite together with both parent records.
    pub async fn get_with_parents(
        &self,
        id: i32,
    ) -> Result<Option<(favorites::Model, users::Model, movies::Model)>> {
        let Some(favorite) = Favorites::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let user = Users::find_by_id(favorite.user_id)
            .one(&self.conn)
            .await?
            .with_context(|| format!("favorite {} references missing user {}", id, favorite.user_id))?;
        let movie = Movies::find_by_id(favorite.movie_id)
            .one(&self.conn)
            .await?
            .with_context(|| {
                format!("favorite {} references missing movie {}", id, favorite.movie_id)
            })?;

        Ok(Some((favorite, user, movie)))
    }

    pub async fn get_pair(&self, user_id: i32, movie_id: i32) -> Result<Option<favorites::Model>> {
        let row = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::MovieId.eq(movie_id))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    /// Creates the link. The unique pair index turns a duplicate insert into
    /// [`LinkError::Duplicate`].
    pub async fn link(&self, user_id: i32, movie_id: i32) -> Result<favorites::Model, LinkError> {
        let active_model = favorites::ActiveModel {
            user_id: Set(user_id),
            movie_id: Set(movie_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match Favorites::insert(active_model)
            .exec_with_returning(&self.conn)
            .await
        {
            Ok(created) => {
                info!(
                    "Linked favorite {}: user {} -> movie {}",
                    created.id, user_id, movie_id
                );
                Ok(created)
            }
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(LinkError::Duplicate { user_id, movie_id })
                }
                _ => Err(LinkError::Db(err)),
            },
        }
    }

    pub async fn unlink_pair(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        let result = Favorites::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::MovieId.eq(movie_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Favorites::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<favorites::Model>> {
        let rows = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn list_for_movie(&self, movie_id: i32) -> Result<Vec<favorites::Model>> {
        let rows = Favorites::find()
            .filter(favorites::Column::MovieId.eq(movie_id))
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// One set-based delete scoped by user, all-or-nothing.
    pub async fn remove_all_for_user(&self, user_id: i32) -> Result<u64> {
        let result = Favorites::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await?;
        info!(
            "Removed all {} favorites of user {}",
            result.rows_affected, user_id
        );
        Ok(result.rows_affected)
    }

    /// The movies a user has favorited, via the linking table.
    pub async fn movies_for_user(&self, user_id: i32) -> Result<Vec<movies::Model>> {
        let rows = Movies::find()
            .join(JoinType::InnerJoin, movies::Relation::Favorites.def())
            .filter(favorites::Column::UserId.eq(user_id))
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Favorites::find().count(&self.conn).await?)
    }

    pub async fn count_for_user(&self, user_id: i32) -> Result<u64> {
        let count = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Grouped counts; ties break by database natural order.
    async fn top_parent(&self, parent_col: favorites::Column) -> Result<Option<ParentCount>> {
        let row = Favorites::find()
            .select_only()
            .column_as(parent_col, "parent_id")
            .column_as(favorites::Column::Id.count(), "favorite_count")
            .group_by(parent_col)
            .order_by_desc(favorites::Column::Id.count())
            .limit(1)
            .into_model::<ParentCount>()
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    pub async fn stats(&self) -> Result<FavoriteStats> {
        let total = self.count().await?;

        let mut top_user = None;
        if let Some(row) = self.top_parent(favorites::Column::UserId).await? {
            if let Some(user) = Users::find_by_id(row.parent_id).one(&self.conn).await? {
                top_user = Some((user, row.favorite_count));
            }
        }

        let mut top_movie = None;
        if let Some(row) = self.top_parent(favorites::Column::MovieId).await? {
            if let Some(movie) = Movies::find_by_id(row.parent_id).one(&self.conn).await? {
                top_movie = Some((movie, row.favorite_count));
            }
        }

        Ok(FavoriteStats {
            total,
            top_user,
            top_movie,
        })
    }
}
