use crate::entities::{favorites, movies, prelude::*};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::info;

/// Repository for movie records
pub struct MovieRepository {
    conn: DatabaseConnection,
}

/// Fields for a new movie. Validation happens at the API boundary.
#[derive(Debug, Clone)]
pub struct MovieInput {
    pub title: String,
    pub director: String,
    pub genre: String,
    pub runtime_minutes: i32,
    pub year: i32,
    pub rating: String,
    pub synopsis: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub synopsis: Option<String>,
}

/// Search criteria; all fields combinable.
#[derive(Debug, Clone, Default)]
pub struct MovieSearch {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

impl MovieRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<movies::Model>> {
        let rows = Movies::find()
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<movies::Model>> {
        Ok(Movies::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_title_and_year(
        &self,
        title: &str,
        year: i32,
    ) -> Result<Option<movies::Model>> {
        let row = Movies::find()
            .filter(movies::Column::Title.eq(title))
            .filter(movies::Column::Year.eq(year))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, input: &MovieInput) -> Result<movies::Model> {
        let active_model = movies::ActiveModel {
            title: Set(input.title.clone()),
            director: Set(input.director.clone()),
            genre: Set(input.genre.clone()),
            runtime_minutes: Set(input.runtime_minutes),
            year: Set(input.year),
            rating: Set(input.rating.clone()),
            synopsis: Set(input.synopsis.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let created = Movies::insert(active_model)
            .exec_with_returning(&self.conn)
            .await?;
        info!("Created movie {}: {} ({})", created.id, created.title, created.year);
        Ok(created)
    }

    pub async fn update(&self, id: i32, update: &MovieUpdate) -> Result<Option<movies::Model>> {
        let Some(existing) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active_model: movies::ActiveModel = existing.into();
        if let Some(title) = &update.title {
            active_model.title = Set(title.clone());
        }
        if let Some(director) = &update.director {
            active_model.director = Set(director.clone());
        }
        if let Some(genre) = &update.genre {
            active_model.genre = Set(genre.clone());
        }
        if let Some(runtime) = update.runtime_minutes {
            active_model.runtime_minutes = Set(runtime);
        }
        if let Some(year) = update.year {
            active_model.year = Set(year);
        }
        if let Some(rating) = &update.rating {
            active_model.rating = Set(rating.clone());
        }
        if let Some(synopsis) = &update.synopsis {
            active_model.synopsis = Set(Some(synopsis.clone()));
        }

        let updated = active_model.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Movies::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected > 0 {
            info!("Removed movie {}", id);
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn search(&self, params: &MovieSearch) -> Result<Vec<movies::Model>> {
        let mut query = Movies::find();

        if let Some(title) = &params.title {
            query = query.filter(movies::Column::Title.contains(title));
        }
        if let Some(director) = &params.director {
            query = query.filter(movies::Column::Director.contains(director));
        }
        if let Some(genre) = &params.genre {
            query = query.filter(movies::Column::Genre.contains(genre));
        }
        if let Some(year) = params.year {
            query = query.filter(movies::Column::Year.eq(year));
        }
        if let Some(year_min) = params.year_min {
            query = query.filter(movies::Column::Year.gte(year_min));
        }
        if let Some(year_max) = params.year_max {
            query = query.filter(movies::Column::Year.lte(year_max));
        }

        Ok(query.all(&self.conn).await?)
    }

    /// Movies ordered by how often they were favorited, most popular first.
    pub async fn top_favorited(&self, limit: u64) -> Result<Vec<movies::Model>> {
        let rows = Movies::find()
            .join(JoinType::LeftJoin, movies::Relation::Favorites.def())
            .group_by(movies::Column::Id)
            .order_by_desc(favorites::Column::Id.count())
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn by_rating(&self, rating: &str, limit: u64) -> Result<Vec<movies::Model>> {
        let rows = Movies::find()
            .filter(movies::Column::Rating.eq(rating))
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<movies::Model>> {
        let rows = Movies::find()
            .order_by_desc(movies::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Movies::find().count(&self.conn).await?)
    }
}
