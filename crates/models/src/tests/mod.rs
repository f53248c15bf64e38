
/// CRUD operations tests for the catalog tables
pub mod crud_tests;

use sea_orm::DatabaseConnection;
use migration::MigratorTrait;

/// Connect and migrate, or `None` when no database is reachable.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let db = match crate::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}
