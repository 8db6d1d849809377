//! `guardpost-auth`: identity and access-control core.
//!
//! Credential verification, token issuance and revocation, and the
//! role → permission authorization engine. Decoupled from HTTP and storage:
//! persistence is reached only through the traits in [`store`].

pub mod authorize;
pub mod claims;
pub mod codec;
pub mod config;
pub mod engine;
pub mod guard;
pub mod matrix;
pub mod memory;
pub mod operations;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod store;

pub use authorize::{AuthorizationDecision, PermissionGuard, authorize};
pub use claims::{TokenClaims, TokenKind, TokenPair};
pub use codec::{TokenCodec, TokenError};
pub use config::AuthConfig;
pub use engine::{AuthEngine, LogoutConfirmation, Registration};
pub use guard::{Guard, GuardRequest, TokenGuard, TokenLocation};
pub use matrix::{PermissionMatrix, RoleGrant};
pub use operations::{OperationId, OperationRegistry};
pub use password::{Argon2Hasher, Argon2Params, PasswordHasher};
pub use permissions::{Permission, catalog};
pub use principal::{AuthenticatedPrincipal, NewPrincipal, Principal, PrincipalId};
pub use roles::{Role, RoleRecord};
pub use store::{CredentialStore, RevocationEntry, RevocationLedger};
