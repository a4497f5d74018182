/// CRUD and validation tests for every entity
pub mod crud_tests;


use sea_orm::DatabaseConnection;

/// Fresh migrated in-memory database per test.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    crate::db::connect_in_memory().await
}

pub(crate) fn sample_product(name: &str) -> crate::product::NewProduct {
    crate::product::NewProduct {
        name: name.to_string(),
        category_name: "Hair".into(),
        subcategory_name: "Shampoo".into(),
        description: "Gentle daily shampoo".into(),
        price: 12.5,
        image_url: None,
    }
}

pub(crate) fn sample_service(name: &str) -> crate::service::NewService {
    crate::service::NewService {
        name: name.to_string(),
        description: Some("Wash and blow dry".into()),
        price: 30.0,
        category_name: "Salon".into(),
        subcategory_name: "Styling".into(),
        before_service_image: None,
        after_service_image: None,
    }
}
