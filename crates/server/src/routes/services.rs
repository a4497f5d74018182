use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use models::service::Model as ServiceModel;
use service::catalog::services::{self as services_service, ServiceDraft};
use service::images::ImageSource;

use crate::errors::JsonApiError;
use crate::form::FormPayload;
use crate::state::ServerState;

/// A lone `file` part fills whichever of the before/after slots has no part of its own.
fn draft_from(mut form: FormPayload) -> Result<ServiceDraft, JsonApiError> {
    let shared = form.take_file("file");
    let before_file = form.take_file("before_file").or_else(|| shared.clone());
    let after_file = form.take_file("after_file").or(shared);
    Ok(ServiceDraft {
        name: form.require("name")?,
        description: form.text("description"),
        price: form.number("price")?,
        category_name: form.require("category_name")?,
        subcategory_name: form.require("subcategory_name")?,
        before_image: ImageSource::resolve(before_file, form.text("before_service_image")),
        after_image: ImageSource::resolve(after_file, form.text("after_service_image")),
    })
}

#[utoipa::path(get, path = "/services", tag = "services", responses((status = 200, description = "All services")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ServiceModel>>, JsonApiError> {
    let all = services_service::list_services(&state.db).await?;
    info!(count = all.len(), "list services");
    Ok(Json(all))
}

#[utoipa::path(get, path = "/services/{id}", tag = "services", params(("id" = i32, Path, description = "Service ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<ServiceModel>, JsonApiError> {
    Ok(Json(services_service::get_service(&state.db, id).await?))
}

#[utoipa::path(post, path = "/services", tag = "services", request_body = crate::openapi::ServiceInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation or Conflict Error")))]
pub async fn create(State(state): State<ServerState>, form: FormPayload) -> Result<(StatusCode, Json<ServiceModel>), JsonApiError> {
    let draft = draft_from(form)?;
    let created = services_service::create_service(&state.db, &state.uploads, draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/services/{id}", tag = "services", params(("id" = i32, Path, description = "Service ID")), request_body = crate::openapi::ServiceInputDoc, responses((status = 200, description = "Updated"), (status = 400, description = "Validation or Conflict Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, Path(id): Path<i32>, form: FormPayload) -> Result<Json<ServiceModel>, JsonApiError> {
    let draft = draft_from(form)?;
    let updated = services_service::update_service(&state.db, &state.uploads, id, draft).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/services/{id}", tag = "services", params(("id" = i32, Path, description = "Service ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    services_service::delete_service(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
