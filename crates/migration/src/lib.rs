//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_service;
mod m20240601_000002_create_tool;
mod m20240601_000003_create_admin_user;
mod m20240601_000004_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_service::Migration),
            Box::new(m20240601_000002_create_tool::Migration),
            Box::new(m20240601_000003_create_admin_user::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000004_add_indexes::Migration),
        ]
    }
}
