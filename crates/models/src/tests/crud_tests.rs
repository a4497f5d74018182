use anyhow::Result;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use super::{sample_product, sample_service, setup_test_db};
use crate::booking::{self, BookingStatus, NewBooking, Target};
use crate::errors::ModelError;
use crate::{admin, product, service};

#[tokio::test]
async fn test_admin_create_and_lookup() -> Result<()> {
    let db = setup_test_db().await?;

    let created = admin::create(&db, "alice", "alice@example.com", "$argon2id$fake").await?;
    assert!(created.id > 0);

    let found = admin::find_by_email(&db, "alice@example.com").await?;
    assert_eq!(found.map(|a| a.id), Some(created.id));
    assert!(admin::find_by_email(&db, "nobody@example.com").await?.is_none());

    assert!(admin::exists_with_name_or_email(&db, "alice", "other@example.com").await?);
    assert!(admin::exists_with_name_or_email(&db, "bob", "alice@example.com").await?);
    assert!(!admin::exists_with_name_or_email(&db, "bob", "bob@example.com").await?);
    Ok(())
}

#[tokio::test]
async fn test_admin_email_is_case_insensitive() -> Result<()> {
    let db = setup_test_db().await?;

    let created = admin::create(&db, "carol", " Carol@Example.COM", "$argon2id$fake").await?;
    assert_eq!(created.email, "carol@example.com");
    assert_eq!(admin::find_by_email(&db, "CAROL@example.com").await?.map(|a| a.id), Some(created.id));
    assert!(admin::exists_with_name_or_email(&db, "dave", "carol@EXAMPLE.com").await?);

    let dup = admin::create(&db, "carol2", "carol@example.com", "$argon2id$fake").await;
    assert!(matches!(dup, Err(crate::errors::ModelError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn test_admin_duplicate_email_is_conflict() -> Result<()> {
    let db = setup_test_db().await?;
    admin::create(&db, "alice", "alice@example.com", "h").await?;
    let err = admin::create(&db, "alice2", "alice@example.com", "h").await.unwrap_err();
    assert!(matches!(err, ModelError::Conflict(_)), "got {err:?}");
    Ok(())
}

#[test]
fn test_admin_serialization_hides_hash() {
    let m = admin::Model { id: 1, name: "a".into(), email: "a@b.c".into(), password_hash: "secret".into() };
    let v = serde_json::to_value(&m).unwrap();
    assert!(v.get("password_hash").is_none());
    assert_eq!(v["email"], "a@b.c");
}

#[tokio::test]
async fn test_product_crud_and_validation() -> Result<()> {
    let db = setup_test_db().await?;

    let p = product::create(&db, sample_product("Argan Shampoo")).await?;
    assert_eq!(p.clicks, 0);

    let mut am: product::ActiveModel = p.clone().into();
    am.price = Set(15.0);
    let updated = am.update(&db).await?;
    assert_eq!(updated.price, 15.0);

    let mut bad = sample_product("Cheap");
    bad.price = -1.0;
    assert!(matches!(product::create(&db, bad).await, Err(ModelError::Validation(_))));

    let dup = product::create(&db, sample_product("Argan Shampoo")).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));

    product::Entity::delete_by_id(p.id).exec(&db).await?;
    assert!(product::Entity::find_by_id(p.id).one(&db).await?.is_none());
    Ok(())
}

#[test]
fn test_product_json_omits_clicks() {
    let m = product::Model {
        id: 3,
        name: "Comb".into(),
        category_name: "Tools".into(),
        subcategory_name: "Combs".into(),
        description: "Wide tooth".into(),
        price: 2.0,
        image_url: None,
        clicks: 42,
    };
    let v = serde_json::to_value(&m).unwrap();
    assert!(v.get("clicks").is_none());
    assert_eq!(v["name"], "Comb");
}

#[tokio::test]
async fn test_service_create_requires_category() -> Result<()> {
    let db = setup_test_db().await?;
    let mut s = sample_service("Trim");
    s.category_name = "  ".into();
    assert!(matches!(service::create(&db, s).await, Err(ModelError::Validation(_))));

    let ok = service::create(&db, sample_service("Trim")).await?;
    assert_eq!(ok.description.as_deref(), Some("Wash and blow dry"));
    Ok(())
}

#[tokio::test]
async fn test_click_counters_and_totals() -> Result<()> {
    let db = setup_test_db().await?;
    assert_eq!(product::total_clicks(&db).await?, 0);

    let a = product::create(&db, sample_product("A")).await?;
    let b = product::create(&db, sample_product("B")).await?;
    let s = service::create(&db, sample_service("S")).await?;

    assert!(product::increment_clicks(&db, a.id).await?);
    assert!(product::increment_clicks(&db, a.id).await?);
    assert!(product::increment_clicks(&db, b.id).await?);
    assert!(service::increment_clicks(&db, s.id).await?);
    assert!(!product::increment_clicks(&db, 9999).await?);

    assert_eq!(product::total_clicks(&db).await?, 3);
    assert_eq!(service::total_clicks(&db).await?, 1);

    let names = product::names_by_id(&db).await?;
    assert_eq!(names.get(&a.id).map(String::as_str), Some("A"));
    Ok(())
}

#[tokio::test]
async fn test_booking_lists_split_by_target() -> Result<()> {
    let db = setup_test_db().await?;

    booking::create(&db, NewBooking::contact(Target::Product(7), "Jane", "0700000000", None)).await?;
    let sb = booking::create(&db, NewBooking::contact(Target::Service(2), "John", "0711111111", Some("hi".into()))).await?;
    assert_eq!(sb.status, BookingStatus::Pending);
    assert_eq!(sb.product_id, None);

    let products = booking::list_for_products(&db).await?;
    let services = booking::list_for_services(&db).await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_id, Some(7));
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].message.as_deref(), Some("hi"));
    Ok(())
}

#[tokio::test]
async fn test_booking_rejects_blank_phone() -> Result<()> {
    let db = setup_test_db().await?;
    let res = booking::create(&db, NewBooking::contact(Target::Product(1), "Jane", " ", None)).await;
    assert!(matches!(res, Err(ModelError::Validation(_))));
    Ok(())
}

#[test]
fn test_booking_status_parse_and_json() {
    assert_eq!("Confirmed".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
    assert!("shipped".parse::<BookingStatus>().is_err());
    assert_eq!(serde_json::to_value(BookingStatus::Cancelled).unwrap(), "cancelled");
}

#[test]
fn test_booking_timestamp_format() {
    use chrono::TimeZone;
    let ts = chrono::FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap();
    let m = booking::Model {
        id: 1,
        product_id: Some(1),
        service_id: None,
        name: "Jane".into(),
        phone: "1".into(),
        message: None,
        timestamp: ts,
        appointment: None,
        status: BookingStatus::Pending,
        amount_paid: None,
    };
    let v = serde_json::to_value(&m).unwrap();
    assert_eq!(v["timestamp"], "2024-05-01 09:30:05");
    assert_eq!(v["status"], "pending");
}
