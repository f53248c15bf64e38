//! Create `tool` table.
//! Stock items; "low stock" is derived from quantity and min_quantity, never stored.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tool::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tool::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tool::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Tool::Description).text().null())
                    .col(ColumnDef::new(Tool::Quantity).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Tool::MinQuantity).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Tool::Location).string_len(255).null())
                    .col(
                        ColumnDef::new(Tool::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tool::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tool::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Tool {
    Table,
    Id,
    Name,
    Description,
    Quantity,
    MinQuantity,
    Location,
    CreatedAt,
    UpdatedAt,
}
