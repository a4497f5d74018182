use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::{info, instrument};

use models::service::{self, NewService};
use crate::errors::ServiceError;
use crate::images::{ImageSource, UploadStore};

/// Create/update input for a service. Each image slot is resolved on its own.
#[derive(Debug, Clone)]
pub struct ServiceDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_name: String,
    pub subcategory_name: String,
    pub before_image: ImageSource,
    pub after_image: ImageSource,
}

impl ServiceDraft {
    fn to_new(&self, before: Option<String>, after: Option<String>) -> NewService {
        NewService {
            name: self.name.trim().to_string(),
            description: self.description.clone().filter(|d| !d.trim().is_empty()),
            price: self.price,
            category_name: self.category_name.trim().to_string(),
            subcategory_name: self.subcategory_name.trim().to_string(),
            before_service_image: before,
            after_service_image: after,
        }
    }
}

/// Files written while handling one request, removed again if the row write fails.
struct StoredImages<'a> {
    uploads: &'a UploadStore,
    written: Vec<String>,
}

impl<'a> StoredImages<'a> {
    fn new(uploads: &'a UploadStore) -> Self {
        Self { uploads, written: Vec::new() }
    }

    async fn store(&mut self, source: ImageSource) -> Result<Option<String>, ServiceError> {
        let uploaded = matches!(source, ImageSource::Uploaded(_));
        let value = self.uploads.store(source).await?;
        if let (true, Some(v)) = (uploaded, value.as_ref()) {
            self.written.push(v.clone());
        }
        Ok(value)
    }

    async fn rollback(self) {
        for path in &self.written {
            self.uploads.discard(path).await;
        }
    }
}

pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<service::Model>, ServiceError> {
    let all = service::Entity::find()
        .order_by_asc(service::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(all)
}

pub async fn get_service(db: &DatabaseConnection, id: i32) -> Result<service::Model, ServiceError> {
    service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service"))
}

#[instrument(skip(db, uploads, draft), fields(name = %draft.name))]
pub async fn create_service(db: &DatabaseConnection, uploads: &UploadStore, draft: ServiceDraft) -> Result<service::Model, ServiceError> {
    service::validate(&draft.to_new(None, None))?;
    let mut stored = StoredImages::new(uploads);
    let before = stored.store(draft.before_image.clone()).await?;
    let after = stored.store(draft.after_image.clone()).await?;

    match service::create(db, draft.to_new(before, after)).await {
        Ok(created) => {
            info!(id = created.id, "service_created");
            Ok(created)
        }
        Err(e) => {
            stored.rollback().await;
            Err(e.into())
        }
    }
}

/// Replace a service's fields; each image keeps its previous value unless a
/// new file or URL is supplied for that slot.
#[instrument(skip(db, uploads, draft))]
pub async fn update_service(db: &DatabaseConnection, uploads: &UploadStore, id: i32, draft: ServiceDraft) -> Result<service::Model, ServiceError> {
    let existing = get_service(db, id).await?;
    let new = draft.to_new(existing.before_service_image.clone(), existing.after_service_image.clone());
    service::validate(&new)?;

    let mut stored = StoredImages::new(uploads);
    let before = stored.store(draft.before_image).await?;
    let after = stored.store(draft.after_image).await?;

    let mut am: service::ActiveModel = existing.into();
    am.name = Set(new.name);
    am.description = Set(new.description);
    am.price = Set(new.price);
    am.category_name = Set(new.category_name);
    am.subcategory_name = Set(new.subcategory_name);
    if let Some(v) = before {
        am.before_service_image = Set(Some(v));
    }
    if let Some(v) = after {
        am.after_service_image = Set(Some(v));
    }
    match am.update(db).await {
        Ok(updated) => {
            info!(id = updated.id, "service_updated");
            Ok(updated)
        }
        Err(e) => {
            stored.rollback().await;
            Err(e.into())
        }
    }
}

pub async fn delete_service(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = service::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("service"));
    }
    info!(id, "service_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, temp_uploads};

    fn draft(name: &str) -> ServiceDraft {
        ServiceDraft {
            name: name.into(),
            description: None,
            price: 45.0,
            category_name: "Salon".into(),
            subcategory_name: "Braids".into(),
            before_image: ImageSource::NoImage,
            after_image: ImageSource::NoImage,
        }
    }

    #[tokio::test]
    async fn updating_before_image_keeps_after_image() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uploads = temp_uploads();
        let s = create_service(&db, &uploads, ServiceDraft {
            before_image: ImageSource::Url("https://img/before-1.png".into()),
            after_image: ImageSource::Url("https://img/after-1.png".into()),
            ..draft("Box Braids")
        }).await?;

        let updated = update_service(&db, &uploads, s.id, ServiceDraft {
            before_image: ImageSource::Url("https://img/before-2.png".into()),
            ..draft("Box Braids")
        }).await?;
        assert_eq!(updated.before_service_image.as_deref(), Some("https://img/before-2.png"));
        assert_eq!(updated.after_service_image.as_deref(), Some("https://img/after-1.png"));
        Ok(())
    }

    #[tokio::test]
    async fn service_crud_and_errors() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let uploads = temp_uploads();
        let s = create_service(&db, &uploads, ServiceDraft { description: Some("Two hours".into()), ..draft("Cornrows") }).await?;
        assert_eq!(get_service(&db, s.id).await?.description.as_deref(), Some("Two hours"));
        assert_eq!(list_services(&db).await?.len(), 1);

        assert!(matches!(create_service(&db, &uploads, draft("Cornrows")).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(update_service(&db, &uploads, 999, draft("X")).await, Err(ServiceError::NotFound(_))));

        delete_service(&db, s.id).await?;
        assert!(matches!(delete_service(&db, s.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
