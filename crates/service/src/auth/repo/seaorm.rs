use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use crate::auth::domain::{AdminAccount, AdminRecord};
use crate::auth::errors::AuthError;
use crate::auth::repository::AdminRepository;

pub struct SeaOrmAdminRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAdminRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_account(m: models::admin::Model) -> (AdminAccount, String) {
    (AdminAccount { id: m.id, name: m.name, email: m.email }, m.password_hash)
}

#[async_trait::async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminRecord>, AuthError> {
        let found = models::admin::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(|m| {
            let (account, password_hash) = to_account(m);
            AdminRecord { account, password_hash }
        }))
    }

    async fn exists_with_name_or_email(&self, name: &str, email: &str) -> Result<bool, AuthError> {
        models::admin::exists_with_name_or_email(&self.db, name, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }

    async fn create_admin(&self, name: &str, email: &str, password_hash: String) -> Result<AdminAccount, AuthError> {
        let created = models::admin::create(&self.db, name, email, &password_hash)
            .await
            .map_err(|e| match e {
                ModelError::Conflict(_) => AuthError::Conflict,
                ModelError::Validation(m) => AuthError::Validation(m),
                ModelError::Db(m) => AuthError::Repository(m),
            })?;
        Ok(to_account(created).0)
    }
}
