//! Create `service` table.
//! Catalog entries with an image list, optional pricing and a visibility flag.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Service::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Service::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Service::Description).text().null())
                    .col(
                        ColumnDef::new(Service::Images)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Service::ImageUrl).text().null())
                    .col(ColumnDef::new(Service::TotalTime).integer().null())
                    .col(ColumnDef::new(Service::Price).double().null())
                    .col(
                        ColumnDef::new(Service::Visibility)
                            .string_len(16)
                            .not_null()
                            .default("private"),
                    )
                    .col(ColumnDef::new(Service::Notes).json_binary().null())
                    .col(
                        ColumnDef::new(Service::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    Name,
    Description,
    Images,
    ImageUrl,
    TotalTime,
    Price,
    Visibility,
    Notes,
    CreatedAt,
}
