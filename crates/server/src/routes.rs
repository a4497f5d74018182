use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::{Greeting, Health};

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod auth;
pub mod bookings;
pub mod clicks;
pub mod products;
pub mod services;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Greeting")))]
pub async fn greeting() -> Json<Greeting> {
    Json(Greeting::default())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    Json(ApiDoc::openapi())
}

/// Build the full application router.
///
/// Static segments (`/products/clicks`, `/products/bookings`) take priority
/// over the `/products/:id` capture.
pub fn build_router(state: ServerState, cors: CorsLayer, max_body_bytes: usize) -> Router {
    let upload_dir = ServeDir::new(state.uploads.root());

    let public = Router::new()
        .route("/", get(greeting))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest_service("/uploads", upload_dir);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh));

    let product_routes = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/clicks", get(clicks::product_clicks))
        .route("/products/bookings", get(bookings::list_product).post(bookings::create_product))
        .route("/products/bookings/:id", put(bookings::update_product).delete(bookings::delete_product))
        .route("/products/:id", get(products::get).put(products::update).delete(products::delete))
        .route("/products/:id/clicks", post(clicks::product_click));

    let service_routes = Router::new()
        .route("/services", get(services::list).post(services::create))
        .route("/services/clicks", get(clicks::service_clicks))
        .route("/services/bookings", get(bookings::list_service).post(bookings::create_service))
        .route("/services/bookings/:id", put(bookings::update_service).delete(bookings::delete_service))
        .route("/services/:id", get(services::get).put(services::update).delete(services::delete))
        .route("/services/:id/clicks", post(clicks::service_click))
        .route("/total-clicks", get(clicks::total));

    public
        .merge(auth_routes)
        .merge(product_routes)
        .merge(service_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
