//! Role reference data, gated by the `roles` permission group.

use std::sync::Arc;

use axum::extract::Path;
use axum::routing::get;
use axum::{Extension, Json, Router};

use guardpost_auth::AuthenticatedPrincipal;
use guardpost_core::RoleId;

use crate::app::AppState;
use crate::app::dto::RoleResponse;
use crate::app::errors::ApiResult;
use crate::app::operations::{ROLES_GET, ROLES_LIST};

pub fn router() -> Router {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles/:id", get(get_role))
}

/// GET /roles
pub async fn list_roles(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    state.permissions.check(&ROLES_LIST, principal.role())?;

    let roles = state.engine.credentials().list_roles().await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

/// GET /roles/:id
pub async fn get_role(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Path(id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    state.permissions.check(&ROLES_GET, principal.role())?;

    let id: RoleId = id.parse()?;
    let role = state.engine.credentials().find_role_by_id(id).await?;
    Ok(Json(role.into()))
}
