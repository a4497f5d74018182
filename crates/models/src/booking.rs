use std::str::FromStr;

use chrono::Utc;
use sea_orm::{entity::prelude::*, QueryOrder, Set};
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::{self, ModelError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(ModelError::Validation(format!("unknown booking status '{other}'"))),
        }
    }
}

/// A booking points at a product or a service by id only. The referenced row
/// may be deleted later; readers label such bookings instead of failing.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: Option<i32>,
    pub service_id: Option<i32>,
    pub name: String,
    pub phone: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTimeWithTimeZone,
    pub appointment: Option<String>,
    pub status: BookingStatus,
    pub amount_paid: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn serialize_timestamp<S: Serializer>(ts: &DateTimeWithTimeZone, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
}

/// What a booking is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Product(i32),
    Service(i32),
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub target: Target,
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
    pub appointment: Option<String>,
    pub status: BookingStatus,
    pub amount_paid: Option<f64>,
}

impl NewBooking {
    /// A fresh pending booking, the shape recorded by click tracking.
    pub fn contact(target: Target, name: &str, phone: &str, message: Option<String>) -> Self {
        Self {
            target,
            name: name.to_string(),
            phone: phone.to_string(),
            message,
            appointment: None,
            status: BookingStatus::Pending,
            amount_paid: None,
        }
    }
}

pub fn validate_contact(name: &str, phone: &str) -> Result<(), ModelError> {
    errors::require_text("name", name)?;
    errors::max_len("name", name, 255)?;
    errors::require_text("phone", phone)?;
    errors::max_len("phone", phone, 20)
}

pub fn validate_appointment(appointment: &str) -> Result<(), ModelError> {
    errors::max_len("appointment", appointment, 25)
}

pub fn validate_amount(amount: f64) -> Result<(), ModelError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ModelError::Validation("amount_paid must be a non-negative number".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, b: NewBooking) -> Result<Model, ModelError> {
    validate_contact(&b.name, &b.phone)?;
    if let Some(a) = &b.appointment {
        validate_appointment(a)?;
    }
    if let Some(amount) = b.amount_paid {
        validate_amount(amount)?;
    }
    let (product_id, service_id) = match b.target {
        Target::Product(id) => (Some(id), None),
        Target::Service(id) => (None, Some(id)),
    };
    let am = ActiveModel {
        product_id: Set(product_id),
        service_id: Set(service_id),
        name: Set(b.name),
        phone: Set(b.phone),
        message: Set(b.message),
        timestamp: Set(Utc::now().into()),
        appointment: Set(b.appointment),
        status: Set(b.status),
        amount_paid: Set(b.amount_paid),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn list_for_products<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::ProductId.is_not_null())
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

pub async fn list_for_services<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::ServiceId.is_not_null())
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}
