use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::info;

use service::auth::domain::{AdminAccount, LoginInput, RegisterInput, TokenPair};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Serialize)]
pub struct AccessTokenOutput {
    pub access_token: String,
}

#[utoipa::path(post, path = "/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Validation or Conflict Error")))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<AdminAccount>), JsonApiError> {
    let Json(input) = payload?;
    let admin = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

#[utoipa::path(post, path = "/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Invalid Credentials"), (status = 403, description = "Locked")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<TokenPair>), JsonApiError> {
    let Json(input) = payload?;
    let tokens = state.auth.login(input).await?;

    let mut cookie = Cookie::new(REFRESH_COOKIE, tokens.refresh_token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(tokens)))
}

/// Refresh token from `Authorization: Bearer`, falling back to the cookie.
fn refresh_token_from(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    bearer.or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()))
}

#[utoipa::path(post, path = "/refresh", tag = "auth", responses((status = 200, description = "New access token"), (status = 401, description = "Missing or invalid refresh token")))]
pub async fn refresh(
    State(state): State<ServerState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<Json<AccessTokenOutput>, JsonApiError> {
    let token = refresh_token_from(&headers, &jar).ok_or_else(|| JsonApiError::unauthorized("missing refresh token"))?;
    let access_token = state.auth.refresh(&token).await?;
    info!("access_token_refreshed");
    Ok(Json(AccessTokenOutput { access_token }))
}
