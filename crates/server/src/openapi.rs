use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// JSON form of the product body; multipart requests use the same keys plus a `file` part.
#[derive(ToSchema)]
pub struct ProductInputDoc {
    pub name: String,
    pub category_name: String,
    pub subcategory_name: String,
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
}

/// Multipart requests may add `before_file`, `after_file` or a single `file` part.
#[derive(ToSchema)]
pub struct ServiceInputDoc {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_name: String,
    pub subcategory_name: String,
    pub before_service_image: Option<String>,
    pub after_service_image: Option<String>,
}

#[derive(ToSchema)]
pub struct ClickRequestDoc { pub name: String, pub phone: String, pub message: String }

#[derive(ToSchema)]
pub struct ProductBookingInputDoc {
    pub product_id: i32,
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
    pub appointment: Option<String>,
    /// pending, confirmed or cancelled
    pub status: Option<String>,
    pub amount_paid: Option<f64>,
}

#[derive(ToSchema)]
pub struct ServiceBookingInputDoc {
    pub service_id: i32,
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
    pub appointment: Option<String>,
    pub status: Option<String>,
    pub amount_paid: Option<f64>,
}

#[derive(ToSchema)]
pub struct BookingUpdateDoc {
    pub appointment: Option<String>,
    pub status: Option<String>,
    pub amount_paid: Option<f64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::greeting,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
        crate::routes::clicks::product_click,
        crate::routes::clicks::service_click,
        crate::routes::clicks::product_clicks,
        crate::routes::clicks::service_clicks,
        crate::routes::clicks::total,
        crate::routes::bookings::list_product,
        crate::routes::bookings::list_service,
        crate::routes::bookings::create_product,
        crate::routes::bookings::create_service,
        crate::routes::bookings::update_product,
        crate::routes::bookings::update_service,
        crate::routes::bookings::delete_product,
        crate::routes::bookings::delete_service,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ProductInputDoc,
            ServiceInputDoc,
            ClickRequestDoc,
            ProductBookingInputDoc,
            ServiceBookingInputDoc,
            BookingUpdateDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "products"),
        (name = "services"),
        (name = "clicks"),
        (name = "bookings")
    )
)]
pub struct ApiDoc;
