use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use service::click_service::{self, ClickContact, ClickOutcome, ProductClicks, ServiceClicks, TotalClicks};

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// All fields optional here so that missing ones surface as a validation
/// message instead of a deserialisation error.
#[derive(Debug, Default, Deserialize)]
pub struct ClickInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl From<ClickInput> for ClickContact {
    fn from(i: ClickInput) -> Self {
        ClickContact {
            name: i.name.unwrap_or_default(),
            phone: i.phone.unwrap_or_default(),
            message: i.message.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductClickList {
    pub products: Vec<ProductClicks>,
}

#[derive(Debug, Serialize)]
pub struct ServiceClickList {
    pub services: Vec<ServiceClicks>,
}

#[utoipa::path(post, path = "/products/{id}/clicks", tag = "clicks", params(("id" = i32, Path, description = "Product ID")), request_body = crate::openapi::ClickRequestDoc, responses((status = 200, description = "Click recorded, WhatsApp link returned"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn product_click(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<ClickInput>, JsonRejection>,
) -> Result<Json<ClickOutcome>, JsonApiError> {
    let Json(input) = payload?;
    let out = click_service::record_product_click(&state.db, &state.whatsapp, id, input.into()).await?;
    Ok(Json(out))
}

#[utoipa::path(post, path = "/services/{id}/clicks", tag = "clicks", params(("id" = i32, Path, description = "Service ID")), request_body = crate::openapi::ClickRequestDoc, responses((status = 200, description = "Click recorded, WhatsApp link returned"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn service_click(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<ClickInput>, JsonRejection>,
) -> Result<Json<ClickOutcome>, JsonApiError> {
    let Json(input) = payload?;
    let out = click_service::record_service_click(&state.db, &state.whatsapp, id, input.into()).await?;
    Ok(Json(out))
}

#[utoipa::path(get, path = "/products/clicks", tag = "clicks", responses((status = 200, description = "Click counts per product")))]
pub async fn product_clicks(State(state): State<ServerState>) -> Result<Json<ProductClickList>, JsonApiError> {
    Ok(Json(ProductClickList { products: click_service::product_clicks(&state.db).await? }))
}

#[utoipa::path(get, path = "/services/clicks", tag = "clicks", responses((status = 200, description = "Click counts per service")))]
pub async fn service_clicks(State(state): State<ServerState>) -> Result<Json<ServiceClickList>, JsonApiError> {
    Ok(Json(ServiceClickList { services: click_service::service_clicks(&state.db).await? }))
}

#[utoipa::path(get, path = "/total-clicks", tag = "clicks", responses((status = 200, description = "Summed click counters")))]
pub async fn total(State(state): State<ServerState>) -> Result<Json<TotalClicks>, JsonApiError> {
    Ok(Json(click_service::total_clicks(&state.db).await?))
}
