use async_trait::async_trait;

use super::domain::{AdminAccount, AdminRecord};
use super::errors::AuthError;

/// Repository abstraction for admin persistence.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminRecord>, AuthError>;
    async fn exists_with_name_or_email(&self, name: &str, email: &str) -> Result<bool, AuthError>;
    async fn create_admin(&self, name: &str, email: &str, password_hash: String) -> Result<AdminAccount, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAdminRepository {
        admins: Mutex<Vec<AdminRecord>>,
    }

    impl MockAdminRepository {
        fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<AdminRecord>>, AuthError> {
            self.admins.lock().map_err(|_| AuthError::Repository("mock store poisoned".into()))
        }
    }

    #[async_trait]
    impl AdminRepository for MockAdminRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<AdminRecord>, AuthError> {
            Ok(self.lock()?.iter().find(|r| r.account.email == email).cloned())
        }

        async fn exists_with_name_or_email(&self, name: &str, email: &str) -> Result<bool, AuthError> {
            Ok(self.lock()?.iter().any(|r| r.account.name == name || r.account.email == email))
        }

        async fn create_admin(&self, name: &str, email: &str, password_hash: String) -> Result<AdminAccount, AuthError> {
            let mut admins = self.lock()?;
            if admins.iter().any(|r| r.account.name == name || r.account.email == email) {
                return Err(AuthError::Conflict);
            }
            let account = AdminAccount { id: admins.len() as i32 + 1, name: name.to_string(), email: email.to_string() };
            admins.push(AdminRecord { account: account.clone(), password_hash });
            Ok(account)
        }
    }
}
