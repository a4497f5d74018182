use std::collections::HashMap;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Serialize;
use tracing::{info, instrument};

use models::booking::{self, BookingStatus, NewBooking, TIMESTAMP_FORMAT};
use models::{product, service};
use crate::errors::ServiceError;

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const UNKNOWN_SERVICE: &str = "Unknown Service";

/// Which side of the catalogue a booking belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingKind {
    Product,
    Service,
}

impl BookingKind {
    fn owns(&self, b: &booking::Model) -> bool {
        match self {
            BookingKind::Product => b.product_id.is_some(),
            BookingKind::Service => b.service_id.is_some(),
        }
    }

    fn entity(&self) -> &'static str {
        match self {
            BookingKind::Product => "product booking",
            BookingKind::Service => "service booking",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductBooking {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
    pub timestamp: String,
    pub appointment: Option<String>,
    pub status: BookingStatus,
    pub amount_paid: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceBooking {
    pub id: i32,
    pub service_id: i32,
    pub service_name: String,
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
    pub timestamp: String,
    pub appointment: Option<String>,
    pub status: BookingStatus,
    pub amount_paid: Option<f64>,
}

/// Fields a PUT may change. The outer `None` leaves the stored value alone;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub appointment: Option<Option<String>>,
    pub status: Option<BookingStatus>,
    pub amount_paid: Option<Option<f64>>,
}

/// Product bookings labelled with the product's current name.
pub async fn list_product_bookings(db: &DatabaseConnection) -> Result<Vec<ProductBooking>, ServiceError> {
    let bookings = booking::list_for_products(db).await?;
    let names: HashMap<i32, String> = product::names_by_id(db).await?;
    Ok(bookings
        .into_iter()
        .filter_map(|b| {
            let product_id = b.product_id?;
            Some(ProductBooking {
                id: b.id,
                product_id,
                product_name: names.get(&product_id).cloned().unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                name: b.name,
                phone: b.phone,
                message: b.message,
                timestamp: b.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                appointment: b.appointment,
                status: b.status,
                amount_paid: b.amount_paid,
            })
        })
        .collect())
}

pub async fn list_service_bookings(db: &DatabaseConnection) -> Result<Vec<ServiceBooking>, ServiceError> {
    let bookings = booking::list_for_services(db).await?;
    let names: HashMap<i32, String> = service::names_by_id(db).await?;
    Ok(bookings
        .into_iter()
        .filter_map(|b| {
            let service_id = b.service_id?;
            Some(ServiceBooking {
                id: b.id,
                service_id,
                service_name: names.get(&service_id).cloned().unwrap_or_else(|| UNKNOWN_SERVICE.to_string()),
                name: b.name,
                phone: b.phone,
                message: b.message,
                timestamp: b.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                appointment: b.appointment,
                status: b.status,
                amount_paid: b.amount_paid,
            })
        })
        .collect())
}

#[instrument(skip(db, new), fields(target = ?new.target))]
pub async fn create_booking(db: &DatabaseConnection, new: NewBooking) -> Result<booking::Model, ServiceError> {
    let created = booking::create(db, new).await?;
    info!(id = created.id, "booking_created");
    Ok(created)
}

async fn find_owned(db: &DatabaseConnection, kind: BookingKind, id: i32) -> Result<booking::Model, ServiceError> {
    booking::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .filter(|b| kind.owns(b))
        .ok_or_else(|| ServiceError::not_found(kind.entity()))
}

#[instrument(skip(db, patch))]
pub async fn update_booking(db: &DatabaseConnection, kind: BookingKind, id: i32, patch: BookingPatch) -> Result<booking::Model, ServiceError> {
    let existing = find_owned(db, kind, id).await?;
    let mut am: booking::ActiveModel = existing.clone().into();
    if let Some(appointment) = patch.appointment {
        if let Some(a) = &appointment {
            booking::validate_appointment(a)?;
        }
        am.appointment = Set(appointment);
    }
    if let Some(status) = patch.status {
        am.status = Set(status);
    }
    if let Some(amount) = patch.amount_paid {
        if let Some(a) = amount {
            booking::validate_amount(a)?;
        }
        am.amount_paid = Set(amount);
    }
    if !am.is_changed() {
        return Ok(existing);
    }
    let updated = am.update(db).await?;
    info!(id, status = updated.status.as_str(), "booking_updated");
    Ok(updated)
}

pub async fn delete_booking(db: &DatabaseConnection, kind: BookingKind, id: i32) -> Result<(), ServiceError> {
    find_owned(db, kind, id).await?;
    booking::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id, "booking_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::booking::Target;
    use models::product::NewProduct;

    async fn seed_product(db: &DatabaseConnection, name: &str) -> Result<product::Model, anyhow::Error> {
        Ok(product::create(db, NewProduct {
            name: name.into(),
            category_name: "Hair".into(),
            subcategory_name: "Oil".into(),
            description: "d".into(),
            price: 10.0,
            image_url: None,
        }).await?)
    }

    #[tokio::test]
    async fn orphaned_booking_lists_unknown_product() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = seed_product(&db, "Castor").await?;
        create_booking(&db, NewBooking::contact(Target::Product(p.id), "Jane", "0700", None)).await?;
        create_booking(&db, NewBooking::contact(Target::Product(4242), "Joe", "0711", None)).await?;

        let list = list_product_bookings(&db).await?;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].product_name, "Castor");
        assert_eq!(list[1].product_name, UNKNOWN_PRODUCT);

        product::Entity::delete_by_id(p.id).exec(&db).await?;
        let list = list_product_bookings(&db).await?;
        assert!(list.iter().all(|b| b.product_name == UNKNOWN_PRODUCT));
        assert!(list_service_bookings(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn orphaned_booking_lists_unknown_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_booking(&db, NewBooking::contact(Target::Service(77), "Ann", "0722", None)).await?;
        let list = list_service_bookings(&db).await?;
        assert_eq!(list[0].service_name, UNKNOWN_SERVICE);
        assert_eq!(list[0].timestamp.len(), "2024-01-01 00:00:00".len());
        Ok(())
    }

    #[tokio::test]
    async fn patch_changes_only_given_fields() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mut new = NewBooking::contact(Target::Service(1), "Ann", "0722", None);
        new.appointment = Some("2024-06-01 10:00".into());
        let b = create_booking(&db, new).await?;

        let patched = update_booking(&db, BookingKind::Service, b.id, BookingPatch { status: Some(BookingStatus::Confirmed), ..Default::default() }).await?;
        assert_eq!(patched.status, BookingStatus::Confirmed);
        assert_eq!(patched.appointment.as_deref(), Some("2024-06-01 10:00"));
        assert_eq!(patched.amount_paid, None);

        let paid = update_booking(&db, BookingKind::Service, b.id, BookingPatch { amount_paid: Some(Some(50.0)), ..Default::default() }).await?;
        assert_eq!(paid.amount_paid, Some(50.0));
        assert_eq!(paid.status, BookingStatus::Confirmed);

        let cleared = update_booking(&db, BookingKind::Service, b.id, BookingPatch { amount_paid: Some(None), appointment: Some(None), ..Default::default() }).await?;
        assert_eq!(cleared.amount_paid, None);
        assert_eq!(cleared.appointment, None);
        assert_eq!(cleared.status, BookingStatus::Confirmed);
        Ok(())
    }

    #[tokio::test]
    async fn wrong_kind_or_missing_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let b = create_booking(&db, NewBooking::contact(Target::Product(1), "Jane", "0700", None)).await?;

        let res = update_booking(&db, BookingKind::Service, b.id, BookingPatch::default()).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete_booking(&db, BookingKind::Service, b.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete_booking(&db, BookingKind::Product, 9999).await, Err(ServiceError::NotFound(_))));

        delete_booking(&db, BookingKind::Product, b.id).await?;
        assert!(list_product_bookings(&db).await?.is_empty());
        Ok(())
    }
}
