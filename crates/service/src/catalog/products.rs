use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};

use models::product::{self, NewProduct};
use crate::errors::ServiceError;
use crate::images::{ImageSource, UploadStore};

/// Create/update input for a product. Update replaces every scalar field; the
/// image is only replaced when `image` carries a new source.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub category_name: String,
    pub subcategory_name: String,
    pub description: String,
    pub price: f64,
    pub image: ImageSource,
}

impl ProductDraft {
    fn to_new(&self, image_url: Option<String>) -> NewProduct {
        NewProduct {
            name: self.name.trim().to_string(),
            category_name: self.category_name.trim().to_string(),
            subcategory_name: self.subcategory_name.trim().to_string(),
            description: self.description.clone(),
            price: self.price,
            image_url,
        }
    }
}

/// List all products ordered by id.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>, ServiceError> {
    let all = product::Entity::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(all)
}

/// Get a product by id.
pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<product::Model, ServiceError> {
    product::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("product"))
}

/// Create a product, storing an uploaded image first.
#[instrument(skip(db, uploads, draft), fields(name = %draft.name))]
pub async fn create_product(db: &DatabaseConnection, uploads: &UploadStore, draft: ProductDraft) -> Result<product::Model, ServiceError> {
    product::validate(&draft.to_new(None))?;
    let uploaded = matches!(draft.image, ImageSource::Uploaded(_));
    let image_url = uploads.store(draft.image.clone()).await?;

    match product::create(db, draft.to_new(image_url.clone())).await {
        Ok(created) => {
            info!(id = created.id, "product_created");
            Ok(created)
        }
        Err(e) => {
            if let (true, Some(path)) = (uploaded, image_url.as_deref()) {
                uploads.discard(path).await;
            }
            Err(e.into())
        }
    }
}

/// Replace a product's fields. The previous image is kept when no new one is given.
#[instrument(skip(db, uploads, draft))]
pub async fn update_product(db: &DatabaseConnection, uploads: &UploadStore, id: i32, draft: ProductDraft) -> Result<product::Model, ServiceError> {
    let existing = get_product(db, id).await?;
    let new = draft.to_new(existing.image_url.clone());
    product::validate(&new)?;

    let taken = product::Entity::find()
        .filter(product::Column::Name.eq(new.name.clone()))
        .filter(product::Column::Id.ne(id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if taken.is_some() {
        return Err(ServiceError::Conflict(format!("product name '{}' already exists", new.name)));
    }

    let uploaded = matches!(draft.image, ImageSource::Uploaded(_));
    let replacement = uploads.store(draft.image).await?;

    let mut am: product::ActiveModel = existing.into();
    am.name = Set(new.name);
    am.category_name = Set(new.category_name);
    am.subcategory_name = Set(new.subcategory_name);
    am.description = Set(new.description);
    am.price = Set(new.price);
    if let Some(url) = replacement.clone() {
        am.image_url = Set(Some(url));
    }
    match am.update(db).await {
        Ok(updated) => {
            info!(id = updated.id, "product_updated");
            Ok(updated)
        }
        Err(e) => {
            if let (true, Some(path)) = (uploaded, replacement.as_deref()) {
                uploads.discard(path).await;
            }
            Err(e.into())
        }
    }
}

/// Delete a product by id.
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = product::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("product"));
    }
    info!(id, "product_deleted");
    Ok(())
}
