use async_trait::async_trait;

use super::domain::AdminAccount;
use super::errors::AuthError;

/// Repository abstraction for admin accounts.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AuthError>;
    async fn create(&self, email: &str, password_hash: String) -> Result<AdminAccount, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockAdminRepository {
        accounts: Mutex<HashMap<String, AdminAccount>>, // key: email
    }

    #[async_trait]
    impl AdminRepository for MockAdminRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.get(email).cloned())
        }

        async fn create(&self, email: &str, password_hash: String) -> Result<AdminAccount, AuthError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let account = AdminAccount { id: Uuid::new_v4(), email: email.to_string(), password_hash };
            accounts.insert(email.to_string(), account.clone());
            Ok(account)
        }
    }
}
