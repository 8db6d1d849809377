//! Router and shared state.
//!
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request/response bodies and boundary validation
//! - `errors.rs`: `AuthError` → status code + JSON body
//! - `operations.rs`: permission declarations for guarded routes

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use guardpost_auth::memory::{InMemoryCredentialStore, InMemoryRevocationLedger};
use guardpost_auth::{
    Argon2Hasher, AuthConfig, AuthEngine, CredentialStore, PasswordHasher, PermissionGuard,
    PermissionMatrix, RevocationLedger, TokenCodec, TokenGuard,
};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod operations;
pub mod routes;

/// Everything a handler needs, shared behind one `Arc`.
pub struct AppState {
    pub engine: Arc<AuthEngine>,
    pub access_guard: TokenGuard,
    pub refresh_guard: TokenGuard,
    pub permissions: PermissionGuard,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        ledger: Arc<dyn RevocationLedger>,
        hasher: Arc<dyn PasswordHasher>,
        config: &AuthConfig,
    ) -> Self {
        let codec = Arc::new(TokenCodec::from_config(config));
        let engine = Arc::new(AuthEngine::new(credentials, ledger, hasher, codec, config));

        Self {
            access_guard: TokenGuard::access(engine.clone()),
            refresh_guard: TokenGuard::refresh(engine.clone()),
            permissions: PermissionGuard::new(
                Arc::new(PermissionMatrix::standard()),
                Arc::new(operations::registry()),
            ),
            engine,
        }
    }

    /// In-memory stores seeded with the standard roles.
    pub fn in_memory(config: &AuthConfig) -> Self {
        Self::new(
            Arc::new(InMemoryCredentialStore::with_standard_roles()),
            Arc::new(InMemoryRevocationLedger::new()),
            Arc::new(Argon2Hasher::new()),
            config,
        )
    }
}

/// Build the full HTTP router (used by `main.rs` and the black-box tests).
pub fn build_app(state: Arc<AppState>) -> Router {
    // Access guard in front of everything that needs a logged-in principal.
    let protected = Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        .merge(routes::roles::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_access,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::auth::public_router())
        .merge(protected)
        .layer(Extension(state))
}
