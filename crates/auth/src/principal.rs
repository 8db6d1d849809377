use chrono::{DateTime, Utc};
use serde::Serialize;

pub use guardpost_core::PrincipalId;
use guardpost_core::RoleId;

use crate::{Role, TokenClaims};

/// A stored principal as returned by the credential collaborator.
///
/// The auth core treats it as immutable input.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
}

impl core::fmt::Debug for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password_hash", &"<redacted>")
            .field("role_id", &self.role_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input to `CredentialStore::create_principal`.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPrincipal {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: RoleId,
}

impl core::fmt::Debug for NewPrincipal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewPrincipal")
            .field("email", &self.email)
            .field("role_id", &self.role_id)
            .finish_non_exhaustive()
    }
}

/// The identity attached to a request once a guard accepted its token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    pub claims: TokenClaims,
    /// The raw token the claims came from.
    #[serde(skip)]
    pub token: String,
}

impl AuthenticatedPrincipal {
    pub fn subject(&self) -> PrincipalId {
        self.claims.sub
    }

    pub fn role(&self) -> Option<&Role> {
        self.claims.role.as_ref()
    }
}
