//! Auth engine: register, login, refresh, logout.
//!
//! The engine owns no state of its own. Every collaborator is handed in at
//! construction and shared behind `Arc`, so one engine serves all requests
//! concurrently.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use guardpost_core::{AuthError, AuthResult, PrincipalId, RoleId};

use crate::codec::TokenCodec;
use crate::config::AuthConfig;
use crate::password::PasswordHasher;
use crate::principal::NewPrincipal;
use crate::store::{CredentialStore, RevocationEntry, RevocationLedger};
use crate::TokenPair;

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration input. Boundary validation has already happened.
#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutConfirmation {
    pub message: String,
}

impl Default for LogoutConfirmation {
    fn default() -> Self {
        Self {
            message: "Logged out successfully".to_string(),
        }
    }
}

pub struct AuthEngine {
    credentials: Arc<dyn CredentialStore>,
    ledger: Arc<dyn RevocationLedger>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<TokenCodec>,
    default_role_id: RoleId,
    revoke_on_refresh: bool,
}

impl AuthEngine {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        ledger: Arc<dyn RevocationLedger>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<TokenCodec>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            credentials,
            ledger,
            hasher,
            codec,
            default_role_id: config.default_role_id,
            revoke_on_refresh: config.revoke_on_refresh,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Hash the password, create the principal with the default role, and
    /// issue its first token pair.
    pub async fn register(&self, registration: Registration) -> AuthResult<TokenPair> {
        let Registration {
            email,
            first_name,
            last_name,
            password,
        } = registration;

        let password_hash = self.hash_password(password).await?;

        let principal = self
            .credentials
            .create_principal(NewPrincipal {
                email: normalize_email(&email),
                password_hash,
                first_name: first_name.trim().to_string(),
                last_name: last_name.trim().to_string(),
                role_id: self.default_role_id,
            })
            .await?;

        info!(subject = %principal.id, role_id = %principal.role_id, "principal registered");
        self.issue_tokens(principal.id).await
    }

    /// Verify credentials and issue a token pair.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let Some(principal) = self
            .credentials
            .find_principal_by_email(&normalize_email(email))
            .await?
        else {
            warn!("login rejected");
            return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .verify_password(principal.password_hash.clone(), password.to_string())
            .await?
        {
            warn!(subject = %principal.id, "login rejected");
            return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
        }

        info!(subject = %principal.id, "login succeeded");
        self.issue_tokens(principal.id).await
    }

    /// Reissue a pair for a subject whose refresh token already passed the
    /// refresh guard. The role is re-read from the store.
    pub async fn refresh_tokens(&self, subject: PrincipalId) -> AuthResult<TokenPair> {
        self.issue_tokens(subject).await
    }

    /// Exchange a presented refresh token for a new pair. With rotation
    /// enabled the presented token is revoked, but only once the new pair
    /// exists; a failed issue leaves it usable.
    pub async fn rotate(&self, presented: &str, subject: PrincipalId) -> AuthResult<TokenPair> {
        let pair = self.refresh_tokens(subject).await?;
        if !self.revoke_on_refresh {
            return Ok(pair);
        }

        match self.revoke(presented, subject).await {
            Ok(()) => Ok(pair),
            // A concurrent rotation revoked it first.
            Err(AuthError::Conflict(_)) => {
                warn!(%subject, "refresh token replayed during rotation");
                Err(AuthError::unauthorized("Refresh token has been revoked"))
            }
            Err(e) => Err(e),
        }
    }

    /// Revoke `refresh_token` on behalf of `subject`.
    ///
    /// The token is only decoded here, not re-verified: the endpoint calling
    /// this sits behind the access guard.
    pub async fn logout(
        &self,
        refresh_token: &str,
        subject: PrincipalId,
    ) -> AuthResult<LogoutConfirmation> {
        self.revoke(refresh_token, subject).await?;
        info!(%subject, "logged out");
        Ok(LogoutConfirmation::default())
    }

    pub async fn is_token_blacklisted(&self, token: &str) -> AuthResult<bool> {
        Ok(self.ledger.lookup_revocation(token).await?.is_some())
    }

    async fn revoke(&self, token: &str, subject: PrincipalId) -> AuthResult<()> {
        let claims = self
            .codec
            .decode(token)
            .map_err(|_| AuthError::unauthorized("Invalid refresh token"))?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AuthError::unauthorized("Invalid refresh token"))?;

        if claims.sub != subject {
            warn!(%subject, token_subject = %claims.sub, "revoking a token issued to another subject");
        }

        self.ledger
            .insert_revocation(RevocationEntry {
                token: token.to_string(),
                subject,
                expires_at,
            })
            .await
    }

    /// Sign `{sub, role}` (access) and `{sub}` (refresh). Both or neither.
    async fn issue_tokens(&self, subject: PrincipalId) -> AuthResult<TokenPair> {
        let principal = self.credentials.find_principal_by_id(subject).await?;
        let role = self.credentials.find_role_by_id(principal.role_id).await?;

        let now = Utc::now();
        let access_token = self.codec.sign_access(subject, Some(role.name), now)?;
        let refresh_token = self.codec.sign_refresh(subject, now)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn hash_password(&self, password: String) -> AuthResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::internal(format!("password hashing task failed: {e}")))?
    }

    async fn verify_password(&self, hash: String, password: String) -> AuthResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| AuthError::internal(format!("password verification task failed: {e}")))?
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
