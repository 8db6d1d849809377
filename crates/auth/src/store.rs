//! Collaborator contracts consumed by the auth engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use guardpost_core::{AuthResult, PrincipalId, RoleId};

use crate::principal::{NewPrincipal, Principal};
use crate::roles::RoleRecord;

/// Principal and role lookups.
///
/// Ownership of these records lives with the user-management side; the auth
/// core only reads, plus one insert on registration.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_principal_by_email(&self, email: &str) -> AuthResult<Option<Principal>>;

    /// `NotFound` if absent.
    async fn find_principal_by_id(&self, id: PrincipalId) -> AuthResult<Principal>;

    /// `Conflict` on duplicate email.
    async fn create_principal(&self, new: NewPrincipal) -> AuthResult<Principal>;

    /// `NotFound` if absent.
    async fn find_role_by_id(&self, id: RoleId) -> AuthResult<RoleRecord>;

    async fn list_roles(&self) -> AuthResult<Vec<RoleRecord>>;
}

/// A revoked refresh token. Never updated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationEntry {
    pub token: String,
    pub subject: PrincipalId,
    pub expires_at: DateTime<Utc>,
}

/// Append-only store of revoked tokens, keyed by token string.
#[async_trait]
pub trait RevocationLedger: Send + Sync {
    /// Duplicate inserts may succeed or fail with `Conflict`, at the store's
    /// discretion; either way the token stays revoked.
    async fn insert_revocation(&self, entry: RevocationEntry) -> AuthResult<()>;

    async fn lookup_revocation(&self, token: &str) -> AuthResult<Option<RevocationEntry>>;
}
