use std::sync::Arc;

use configs::AppConfig;
use sea_orm::DatabaseConnection;
use service::auth::{repo::SeaOrmAdminRepository, AuthConfig, AuthService};
use service::contact::WhatsAppContact;
use service::errors::ServiceError;
use service::images::UploadStore;

/// Shared handler state. Cloned per request; heavy members sit behind `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAdminRepository>>,
    pub uploads: Arc<UploadStore>,
    pub whatsapp: Arc<WhatsAppContact>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &AppConfig) -> Result<Self, ServiceError> {
        let repo = Arc::new(SeaOrmAdminRepository::new(db.clone()));
        let auth = AuthService::new(repo, AuthConfig::from(&cfg.auth));
        Ok(Self {
            db,
            auth: Arc::new(auth),
            uploads: Arc::new(UploadStore::new(&cfg.uploads.dir)),
            whatsapp: Arc::new(WhatsAppContact::new(&cfg.contact.whatsapp_number)?),
        })
    }
}
