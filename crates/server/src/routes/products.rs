use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use models::product;
use service::catalog::products::{self as products_service, ProductDraft};
use service::images::ImageSource;

use crate::errors::JsonApiError;
use crate::form::FormPayload;
use crate::state::ServerState;

fn draft_from(mut form: FormPayload) -> Result<ProductDraft, JsonApiError> {
    let image = ImageSource::resolve(form.take_file("file"), form.text("image_url"));
    Ok(ProductDraft {
        name: form.require("name")?,
        category_name: form.require("category_name")?,
        subcategory_name: form.require("subcategory_name")?,
        description: form.require("description")?,
        price: form.number("price")?,
        image,
    })
}

#[utoipa::path(get, path = "/products", tag = "products", responses((status = 200, description = "All products")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<product::Model>>, JsonApiError> {
    let all = products_service::list_products(&state.db).await?;
    info!(count = all.len(), "list products");
    Ok(Json(all))
}

#[utoipa::path(get, path = "/products/{id}", tag = "products", params(("id" = i32, Path, description = "Product ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<product::Model>, JsonApiError> {
    Ok(Json(products_service::get_product(&state.db, id).await?))
}

#[utoipa::path(post, path = "/products", tag = "products", request_body = crate::openapi::ProductInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation or Conflict Error")))]
pub async fn create(State(state): State<ServerState>, form: FormPayload) -> Result<(StatusCode, Json<product::Model>), JsonApiError> {
    let draft = draft_from(form)?;
    let created = products_service::create_product(&state.db, &state.uploads, draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/products/{id}", tag = "products", params(("id" = i32, Path, description = "Product ID")), request_body = crate::openapi::ProductInputDoc, responses((status = 200, description = "Updated"), (status = 400, description = "Validation or Conflict Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, Path(id): Path<i32>, form: FormPayload) -> Result<Json<product::Model>, JsonApiError> {
    let draft = draft_from(form)?;
    let updated = products_service::update_product(&state.db, &state.uploads, id, draft).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/products/{id}", tag = "products", params(("id" = i32, Path, description = "Product ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    products_service::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
