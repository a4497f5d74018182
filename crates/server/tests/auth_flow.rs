use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, AuthSettings};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect_in_memory().await?;
    let mut cfg = AppConfig::default();
    cfg.auth = AuthSettings { jwt_secret: "test-secret".into(), ..AuthSettings::default() };
    cfg.uploads.dir = std::env::temp_dir()
        .join(format!("storefront-auth-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();
    server::startup::build_app(db, &cfg)
}

fn post_json(uri: &str, body: Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?)
}

async fn body_json(resp: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn register(app: &Router, email: &str, password: &str) -> anyhow::Result<StatusCode> {
    let name = format!("admin {email}");
    let resp = app.clone().oneshot(post_json("/register", json!({"name": name, "email": email, "password": password}))?).await?;
    Ok(resp.status())
}

#[tokio::test]
async fn test_register_returns_public_fields_and_rejects_duplicates() -> anyhow::Result<()> {
    let app = build_app().await?;

    let resp = app.clone().oneshot(post_json("/register", json!({"name": "Root", "email": "root@example.com", "password": "S3curePass!"}))?).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await?;
    assert_eq!(body["email"], "root@example.com");
    assert_eq!(body["name"], "Root");
    assert!(body["id"].as_i64().is_some());
    assert!(body.get("password_hash").is_none());

    let resp = app.clone().oneshot(post_json("/register", json!({"name": "Other", "email": "root@example.com", "password": "S3curePass!"}))?).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await?["error"], "ConflictError");
    Ok(())
}

#[tokio::test]
async fn test_register_validation_errors() -> anyhow::Result<()> {
    let app = build_app().await?;
    assert_eq!(register(&app, "short@example.com", "short").await?, StatusCode::BAD_REQUEST);
    assert_eq!(register(&app, "no-at-sign", "LongEnough1").await?, StatusCode::BAD_REQUEST);

    let resp = app.clone().oneshot(post_json("/register", json!({"email": "x@y.z"}))?).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await?["error"], "ValidationError");
    Ok(())
}

#[tokio::test]
async fn test_login_sets_cookie_and_refresh_works() -> anyhow::Result<()> {
    let app = build_app().await?;
    assert_eq!(register(&app, "ops@example.com", "S3curePass!").await?, StatusCode::CREATED);

    let resp = app.clone().oneshot(post_json("/login", json!({"email": "ops@example.com", "password": "S3curePass!"}))?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("refresh cookie");
    assert!(cookie.starts_with("refresh_token="));
    assert!(cookie.contains("HttpOnly"));
    let tokens = body_json(resp).await?;
    let access = tokens["access_token"].as_str().unwrap().to_string();
    let refresh = tokens["refresh_token"].as_str().unwrap().to_string();

    // cookie fallback
    let cookie_pair = cookie.split(';').next().unwrap().to_string();
    let req = Request::builder().method("POST").uri("/refresh").header(header::COOKIE, cookie_pair).body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await?["access_token"].as_str().is_some());

    // bearer refresh token
    let req = Request::builder().method("POST").uri("/refresh").header(header::AUTHORIZATION, format!("Bearer {refresh}")).body(Body::empty())?;
    assert_eq!(app.clone().oneshot(req).await?.status(), StatusCode::OK);

    // an access token is not a refresh token
    let req = Request::builder().method("POST").uri("/refresh").header(header::AUTHORIZATION, format!("Bearer {access}")).body(Body::empty())?;
    assert_eq!(app.clone().oneshot(req).await?.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder().method("POST").uri("/refresh").body(Body::empty())?;
    assert_eq!(app.clone().oneshot(req).await?.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_five_failures_lock_the_account() -> anyhow::Result<()> {
    let app = build_app().await?;
    assert_eq!(register(&app, "locked@example.com", "S3curePass!").await?, StatusCode::CREATED);

    for _ in 0..5 {
        let resp = app.clone().oneshot(post_json("/login", json!({"email": "locked@example.com", "password": "wrong-pass"}))?).await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await?["error"], "InvalidCredentialsError");
    }

    let resp = app.clone().oneshot(post_json("/login", json!({"email": "locked@example.com", "password": "S3curePass!"}))?).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await?["error"], "LockedError");

    // a different account is unaffected
    assert_eq!(register(&app, "free@example.com", "S3curePass!").await?, StatusCode::CREATED);
    let resp = app.clone().oneshot(post_json("/login", json!({"email": "free@example.com", "password": "S3curePass!"}))?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
