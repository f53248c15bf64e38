use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: newest-first listing and public filter
        manager
            .create_index(
                Index::create()
                    .name("idx_service_created_at")
                    .table(Service::Table)
                    .col(Service::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_visibility")
                    .table(Service::Table)
                    .col(Service::Visibility)
                    .to_owned(),
            )
            .await?;

        // Tool: name-ordered listing
        manager
            .create_index(
                Index::create()
                    .name("idx_tool_name")
                    .table(Tool::Table)
                    .col(Tool::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_created_at").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_visibility").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tool_name").table(Tool::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, Visibility, CreatedAt }

#[derive(DeriveIden)]
enum Tool { Table, Name }
