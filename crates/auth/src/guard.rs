//! Per-request token guards.
//!
//! A guard walks one request through
//! `Unauthenticated → TokenExtracted → SignatureValid → NotRevoked → Authenticated`
//! and stops at the first failure. An invalid or expired token never reaches
//! the revocation lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::warn;

use guardpost_core::{AuthError, AuthResult};

use crate::engine::AuthEngine;
use crate::principal::AuthenticatedPrincipal;
use crate::TokenKind;

/// Transport-agnostic view of the parts of a request a guard may read.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardRequest<'a> {
    /// Raw `Authorization` header value.
    pub authorization: Option<&'a str>,
    /// Parsed JSON body.
    pub body: Option<&'a JsonValue>,
}

impl<'a> GuardRequest<'a> {
    pub fn with_authorization(mut self, value: &'a str) -> Self {
        self.authorization = Some(value);
        self
    }

    pub fn with_body(mut self, body: &'a JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}

/// Where a guard looks for its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLocation {
    /// `Authorization: Bearer <token>`.
    BearerHeader,
    /// A string field of the JSON body.
    BodyField(&'static str),
}

impl TokenLocation {
    fn extract<'a>(&self, request: &GuardRequest<'a>) -> Option<&'a str> {
        let token = match self {
            TokenLocation::BearerHeader => request.authorization?.strip_prefix("Bearer ")?,
            TokenLocation::BodyField(field) => request.body?.get(field)?.as_str()?,
        };
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }
}

/// Shared validation capability of the access and refresh guards.
#[async_trait]
pub trait Guard: Send + Sync {
    async fn validate(&self, request: &GuardRequest<'_>) -> AuthResult<AuthenticatedPrincipal>;
}

/// Guard parameterized by token kind: where the token lives, which secret
/// verifies it, and which rejection messages it uses.
#[derive(Clone)]
pub struct TokenGuard {
    kind: TokenKind,
    location: TokenLocation,
    engine: Arc<AuthEngine>,
}

impl TokenGuard {
    /// Field name of the refresh token in request bodies.
    pub const REFRESH_TOKEN_FIELD: &'static str = "refreshToken";

    /// Bearer header, access secret.
    pub fn access(engine: Arc<AuthEngine>) -> Self {
        Self {
            kind: TokenKind::Access,
            location: TokenLocation::BearerHeader,
            engine,
        }
    }

    /// `refreshToken` body field, refresh secret.
    pub fn refresh(engine: Arc<AuthEngine>) -> Self {
        Self {
            kind: TokenKind::Refresh,
            location: TokenLocation::BodyField(Self::REFRESH_TOKEN_FIELD),
            engine,
        }
    }

    fn missing_message(&self) -> &'static str {
        match self.kind {
            TokenKind::Access => "Token missing",
            TokenKind::Refresh => "Refresh token missing",
        }
    }

    fn revoked_message(&self) -> &'static str {
        match self.kind {
            TokenKind::Access => "Token has been revoked",
            TokenKind::Refresh => "Refresh token has been revoked",
        }
    }
}

#[async_trait]
impl Guard for TokenGuard {
    async fn validate(&self, request: &GuardRequest<'_>) -> AuthResult<AuthenticatedPrincipal> {
        let Some(token) = self.location.extract(request) else {
            return Err(AuthError::unauthorized(self.missing_message()));
        };

        let claims = self.engine.codec().verify(self.kind, token).map_err(|e| {
            warn!(kind = %self.kind, error = %e, "token rejected");
            AuthError::unauthorized("Invalid or expired token")
        })?;

        if self.engine.is_token_blacklisted(token).await? {
            warn!(kind = %self.kind, subject = %claims.sub, "revoked token presented");
            return Err(AuthError::unauthorized(self.revoked_message()));
        }

        Ok(AuthenticatedPrincipal {
            claims,
            token: token.to_string(),
        })
    }
}
