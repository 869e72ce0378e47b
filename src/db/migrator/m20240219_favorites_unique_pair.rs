use sea_orm_migration::prelude::*;

/// Enforces favorite uniqueness in the database so two concurrent link
/// requests for the same pair cannot both pass an application-level check.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_favorites_user_movie")
                    .table(Favorites::Table)
                    .col(Favorites::UserId)
                    .col(Favorites::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_favorites_user_movie")
                    .table(Favorites::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Favorites {
    Table,
    UserId,
    MovieId,
}
