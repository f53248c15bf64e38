use sea_orm::DatabaseConnection;

use crate::auth::domain::AdminAccount;
use crate::auth::errors::AuthError;
use crate::auth::repository::AdminRepository;

pub struct SeaOrmAdminRepository {
    pub db: DatabaseConnection,
}

fn to_account(m: models::admin_user::Model) -> AdminAccount {
    AdminAccount { id: m.id, email: m.email, password_hash: m.password_hash }
}

#[async_trait::async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AuthError> {
        let res = models::admin_user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_account))
    }

    async fn create(&self, email: &str, password_hash: String) -> Result<AdminAccount, AuthError> {
        let created = models::admin_user::create(&self.db, email, password_hash)
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
                models::errors::ModelError::Db(msg) => AuthError::Repository(msg),
            })?;
        Ok(to_account(created))
    }
}
