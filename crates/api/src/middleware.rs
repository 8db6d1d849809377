use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::Response;

use guardpost_auth::{Guard, GuardRequest};

use crate::app::AppState;
use crate::app::errors::ApiError;

/// Run the access guard and attach the `AuthenticatedPrincipal` to the
/// request extensions.
pub async fn require_access(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // A header that is not valid UTF-8 counts as missing.
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let mut guard_request = GuardRequest::default();
    if let Some(value) = authorization.as_deref() {
        guard_request = guard_request.with_authorization(value);
    }
    let principal = state.access_guard.validate(&guard_request).await?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
