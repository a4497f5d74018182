use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, TransactionTrait};
use serde::Serialize;
use tracing::{info, instrument};

use models::booking::{self, NewBooking, Target};
use models::{product, service};
use crate::contact::{enquiry_text, WhatsAppContact};
use crate::errors::ServiceError;

pub const BOOKING_STORED: &str = "Booking details stored successfully.";
const MISSING_CONTACT: &str = "Missing required information. Name, phone, and message are required.";

/// Customer details sent with a click.
#[derive(Debug, Clone, Default)]
pub struct ClickContact {
    pub name: String,
    pub phone: String,
    pub message: String,
}

impl ClickContact {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if [&self.name, &self.phone, &self.message].iter().any(|v| v.trim().is_empty()) {
            return Err(ServiceError::Validation(MISSING_CONTACT.into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClickOutcome {
    pub whatsapp_url: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductClicks {
    pub product_id: i32,
    pub name: String,
    pub clicks: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceClicks {
    pub service_id: i32,
    pub name: String,
    pub clicks: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalClicks {
    pub total_product_clicks: i64,
    pub total_service_clicks: i64,
    pub total_clicks: i64,
}

/// Count a click on a product and store the enquiry as a pending booking.
/// Nothing is written when the contact details are incomplete.
#[instrument(skip(db, whatsapp, contact))]
pub async fn record_product_click(db: &DatabaseConnection, whatsapp: &WhatsAppContact, id: i32, contact: ClickContact) -> Result<ClickOutcome, ServiceError> {
    contact.validate()?;
    let txn = db.begin().await?;
    let item = product::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("product"))?;
    let text = enquiry_text("product", &item.name, item.price, &contact.name, &contact.phone, &contact.message);
    let whatsapp_url = whatsapp.link(&text)?;
    product::increment_clicks(&txn, id).await?;
    let b = booking::create(&txn, NewBooking::contact(Target::Product(id), &contact.name, &contact.phone, Some(contact.message.clone()))).await?;
    txn.commit().await?;
    info!(booking_id = b.id, "product_click_recorded");
    Ok(ClickOutcome { whatsapp_url, message: BOOKING_STORED.into() })
}

#[instrument(skip(db, whatsapp, contact))]
pub async fn record_service_click(db: &DatabaseConnection, whatsapp: &WhatsAppContact, id: i32, contact: ClickContact) -> Result<ClickOutcome, ServiceError> {
    contact.validate()?;
    let txn = db.begin().await?;
    let item = service::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))?;
    let text = enquiry_text("service", &item.name, item.price, &contact.name, &contact.phone, &contact.message);
    let whatsapp_url = whatsapp.link(&text)?;
    service::increment_clicks(&txn, id).await?;
    let b = booking::create(&txn, NewBooking::contact(Target::Service(id), &contact.name, &contact.phone, Some(contact.message.clone()))).await?;
    txn.commit().await?;
    info!(booking_id = b.id, "service_click_recorded");
    Ok(ClickOutcome { whatsapp_url, message: BOOKING_STORED.into() })
}

pub async fn product_clicks(db: &DatabaseConnection) -> Result<Vec<ProductClicks>, ServiceError> {
    let rows = product::Entity::find()
        .select_only()
        .column(product::Column::Id)
        .column(product::Column::Name)
        .column(product::Column::Clicks)
        .order_by_asc(product::Column::Id)
        .into_tuple::<(i32, String, i32)>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(product_id, name, clicks)| ProductClicks { product_id, name, clicks }).collect())
}

pub async fn service_clicks(db: &DatabaseConnection) -> Result<Vec<ServiceClicks>, ServiceError> {
    let rows = service::Entity::find()
        .select_only()
        .column(service::Column::Id)
        .column(service::Column::Name)
        .column(service::Column::Clicks)
        .order_by_asc(service::Column::Id)
        .into_tuple::<(i32, String, i32)>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(service_id, name, clicks)| ServiceClicks { service_id, name, clicks }).collect())
}

pub async fn total_clicks(db: &DatabaseConnection) -> Result<TotalClicks, ServiceError> {
    let total_product_clicks = product::total_clicks(db).await?;
    let total_service_clicks = service::total_clicks(db).await?;
    Ok(TotalClicks {
        total_product_clicks,
        total_service_clicks,
        total_clicks: total_product_clicks + total_service_clicks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::product::NewProduct;
    use models::service::NewService;

    fn contact() -> ClickContact {
        ClickContact { name: "Jane".into(), phone: "0700123456".into(), message: "Available?".into() }
    }

    fn whatsapp() -> WhatsAppContact {
        WhatsAppContact::new("+254722669912").unwrap()
    }

    async fn seed(db: &DatabaseConnection) -> Result<(product::Model, service::Model), anyhow::Error> {
        let p = product::create(db, NewProduct {
            name: "Shea Butter".into(),
            category_name: "Skin".into(),
            subcategory_name: "Butter".into(),
            description: "Raw".into(),
            price: 8.0,
            image_url: None,
        }).await?;
        let s = service::create(db, NewService {
            name: "Facial".into(),
            description: None,
            price: 60.5,
            category_name: "Spa".into(),
            subcategory_name: "Face".into(),
            before_service_image: None,
            after_service_image: None,
        }).await?;
        Ok((p, s))
    }

    #[tokio::test]
    async fn two_clicks_add_two_and_create_two_bookings() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (p, _) = seed(&db).await?;

        let out = record_product_click(&db, &whatsapp(), p.id, contact()).await?;
        record_product_click(&db, &whatsapp(), p.id, contact()).await?;
        assert_eq!(out.message, BOOKING_STORED);
        assert!(out.whatsapp_url.starts_with("https://wa.me/254722669912?text="));
        assert!(out.whatsapp_url.contains("Shea+Butter"));

        let clicks = product_clicks(&db).await?;
        assert_eq!(clicks[0].clicks, 2);
        assert_eq!(booking::list_for_products(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn missing_phone_writes_nothing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (p, _) = seed(&db).await?;
        let res = record_product_click(&db, &whatsapp(), p.id, ClickContact { phone: "".into(), ..contact() }).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(product_clicks(&db).await?[0].clicks, 0);
        assert!(booking::list_for_products(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let res = record_service_click(&db, &whatsapp(), 404, contact()).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(booking::list_for_services(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn totals_sum_both_sides() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert_eq!(total_clicks(&db).await?, TotalClicks { total_product_clicks: 0, total_service_clicks: 0, total_clicks: 0 });

        let (p, s) = seed(&db).await?;
        record_product_click(&db, &whatsapp(), p.id, contact()).await?;
        record_service_click(&db, &whatsapp(), s.id, contact()).await?;
        record_service_click(&db, &whatsapp(), s.id, contact()).await?;

        let totals = total_clicks(&db).await?;
        assert_eq!(totals.total_product_clicks, 1);
        assert_eq!(totals.total_service_clicks, 2);
        assert_eq!(totals.total_clicks, 3);
        assert_eq!(service_clicks(&db).await?[0].service_id, s.id);
        Ok(())
    }
}
