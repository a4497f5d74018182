#![cfg(test)]
use sea_orm::DatabaseConnection;

use crate::images::UploadStore;

/// Each test gets its own migrated in-memory database.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_in_memory().await
}

/// Upload store rooted in a fresh temp directory.
pub fn temp_uploads() -> UploadStore {
    UploadStore::new(std::env::temp_dir().join(format!("storefront-test-{}", uuid::Uuid::new_v4())))
}
