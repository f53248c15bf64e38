#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Connection to the test database, or `None` when `DATABASE_URL` is unset,
/// `SKIP_DB_TESTS` is set, or the database cannot be reached.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            match models::db::connect().await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(_) => false,
            }
        })
        .await;
    if !migrated {
        return None;
    }
    // Return a fresh connection for the current test's runtime
    models::db::connect().await.ok()
}
