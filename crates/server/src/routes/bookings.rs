use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

use models::booking::{self, BookingStatus, NewBooking, Target};
use service::booking_service::{self, BookingKind, BookingPatch, ProductBooking, ServiceBooking};

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct ProductBookingList {
    pub product_bookings: Vec<ProductBooking>,
}

#[derive(Debug, Serialize)]
pub struct ServiceBookingList {
    pub service_bookings: Vec<ServiceBooking>,
}

/// Fields shared by product and service booking requests.
#[derive(Debug, Deserialize)]
pub struct BookingFields {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub appointment: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount_paid: Option<f64>,
}

impl BookingFields {
    fn into_new(self, target: Target) -> Result<NewBooking, JsonApiError> {
        Ok(NewBooking {
            target,
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            message: self.message,
            appointment: self.appointment,
            status: parse_status(self.status.as_deref())?.unwrap_or_default(),
            amount_paid: self.amount_paid,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProductBookingInput {
    pub product_id: i32,
    #[serde(flatten)]
    pub fields: BookingFields,
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceBookingInput {
    pub service_id: i32,
    #[serde(flatten)]
    pub fields: BookingFields,
}

/// A missing key leaves the column alone; an explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingInput {
    #[serde(default, deserialize_with = "present")]
    pub appointment: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub amount_paid: Option<Option<f64>>,
}

fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn parse_status(raw: Option<&str>) -> Result<Option<BookingStatus>, JsonApiError> {
    raw.map(|s| s.parse::<BookingStatus>().map_err(|e| JsonApiError::validation(e.to_string())))
        .transpose()
}

fn patch_from(input: UpdateBookingInput) -> Result<BookingPatch, JsonApiError> {
    Ok(BookingPatch {
        status: parse_status(input.status.as_deref())?,
        appointment: input.appointment,
        amount_paid: input.amount_paid,
    })
}

#[utoipa::path(get, path = "/products/bookings", tag = "bookings", responses((status = 200, description = "Product bookings with product names")))]
pub async fn list_product(State(state): State<ServerState>) -> Result<Json<ProductBookingList>, JsonApiError> {
    let product_bookings = booking_service::list_product_bookings(&state.db).await?;
    Ok(Json(ProductBookingList { product_bookings }))
}

#[utoipa::path(get, path = "/services/bookings", tag = "bookings", responses((status = 200, description = "Service bookings with service names")))]
pub async fn list_service(State(state): State<ServerState>) -> Result<Json<ServiceBookingList>, JsonApiError> {
    let service_bookings = booking_service::list_service_bookings(&state.db).await?;
    Ok(Json(ServiceBookingList { service_bookings }))
}

#[utoipa::path(post, path = "/products/bookings", tag = "bookings", request_body = crate::openapi::ProductBookingInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create_product(
    State(state): State<ServerState>,
    payload: Result<Json<CreateProductBookingInput>, JsonRejection>,
) -> Result<(StatusCode, Json<booking::Model>), JsonApiError> {
    let Json(i) = payload?;
    let new = i.fields.into_new(Target::Product(i.product_id))?;
    let created = booking_service::create_booking(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(post, path = "/services/bookings", tag = "bookings", request_body = crate::openapi::ServiceBookingInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create_service(
    State(state): State<ServerState>,
    payload: Result<Json<CreateServiceBookingInput>, JsonRejection>,
) -> Result<(StatusCode, Json<booking::Model>), JsonApiError> {
    let Json(i) = payload?;
    let new = i.fields.into_new(Target::Service(i.service_id))?;
    let created = booking_service::create_booking(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(state: ServerState, kind: BookingKind, id: i32, payload: Result<Json<UpdateBookingInput>, JsonRejection>) -> Result<Json<booking::Model>, JsonApiError> {
    let Json(input) = payload?;
    let updated = booking_service::update_booking(&state.db, kind, id, patch_from(input)?).await?;
    Ok(Json(updated))
}

#[utoipa::path(put, path = "/products/bookings/{id}", tag = "bookings", params(("id" = i32, Path, description = "Booking ID")), request_body = crate::openapi::BookingUpdateDoc, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update_product(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateBookingInput>, JsonRejection>,
) -> Result<Json<booking::Model>, JsonApiError> {
    update(state, BookingKind::Product, id, payload).await
}

#[utoipa::path(put, path = "/services/bookings/{id}", tag = "bookings", params(("id" = i32, Path, description = "Booking ID")), request_body = crate::openapi::BookingUpdateDoc, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update_service(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateBookingInput>, JsonRejection>,
) -> Result<Json<booking::Model>, JsonApiError> {
    update(state, BookingKind::Service, id, payload).await
}

#[utoipa::path(delete, path = "/products/bookings/{id}", tag = "bookings", params(("id" = i32, Path, description = "Booking ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_product(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    booking_service::delete_booking(&state.db, BookingKind::Product, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(delete, path = "/services/bookings/{id}", tag = "bookings", params(("id" = i32, Path, description = "Booking ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_service(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    booking_service::delete_booking(&state.db, BookingKind::Service, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
