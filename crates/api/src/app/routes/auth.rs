use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde_json::Value as JsonValue;

use guardpost_auth::{
    AuthenticatedPrincipal, Guard, GuardRequest, LogoutConfirmation, TokenClaims, TokenPair,
};

use crate::app::AppState;
use crate::app::dto::{self, LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::app::errors::ApiResult;

/// Routes reachable without an access token.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// POST /auth/register
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TokenPair>)> {
    let req = dto::accept(payload)?;
    let pair = state.engine.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

/// POST /auth/login
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let req = dto::accept(payload)?;
    let pair = state.engine.login(&req.email, &req.password).await?;
    Ok(Json(pair))
}

/// POST /auth/refresh
///
/// The refresh guard reads the token from the raw body, so it runs before
/// the body is validated as a DTO.
pub async fn refresh(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(_) => JsonValue::Null,
    };
    let principal = state
        .refresh_guard
        .validate(&GuardRequest::default().with_body(&body))
        .await?;

    let pair = state
        .engine
        .rotate(&principal.token, principal.subject())
        .await?;
    Ok(Json(pair))
}

/// POST /auth/logout
pub async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<Json<LogoutConfirmation>> {
    let req = dto::accept(payload)?;
    let confirmation = state
        .engine
        .logout(&req.refresh_token, principal.subject())
        .await?;
    Ok(Json(confirmation))
}

/// GET /auth/me: the decoded access claims.
pub async fn me(Extension(principal): Extension<AuthenticatedPrincipal>) -> Json<TokenClaims> {
    Json(principal.claims)
}
