use crate::entities::{prelude::*, users};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use tracing::info;

/// Repository for user records
pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<users::Model>> {
        let rows = Users::find()
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<users::Model>> {
        Ok(Users::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        let row = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, name: &str, email: &str) -> Result<users::Model> {
        let active_model = users::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let created = Users::insert(active_model)
            .exec_with_returning(&self.conn)
            .await?;
        info!("Created user {} <{}>", created.id, created.email);
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<users::Model>> {
        let Some(existing) = Users::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active_model: users::ActiveModel = existing.into();
        if let Some(name) = name {
            active_model.name = Set(name.to_string());
        }
        if let Some(email) = email {
            active_model.email = Set(email.to_string());
        }

        let updated = active_model.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Users::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected > 0 {
            info!("Removed user {}", id);
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Users::find().count(&self.conn).await?)
    }
}
