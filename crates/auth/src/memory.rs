//! In-memory collaborators.
//!
//! Intended for tests/dev. Locks are held only for the map operation itself.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use guardpost_core::{AuthError, AuthResult, PrincipalId, RoleId};

use crate::principal::{NewPrincipal, Principal};
use crate::roles::{RoleRecord, standard_roles};
use crate::store::{CredentialStore, RevocationEntry, RevocationLedger};

fn poisoned() -> AuthError {
    AuthError::internal("lock poisoned")
}

/// In-memory credential store with a fixed role table.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    roles: HashMap<RoleId, RoleRecord>,
    principals: RwLock<HashMap<PrincipalId, Principal>>,
}

impl InMemoryCredentialStore {
    pub fn new(roles: impl IntoIterator<Item = RoleRecord>) -> Self {
        Self {
            roles: roles.into_iter().map(|r| (r.id, r)).collect(),
            principals: RwLock::default(),
        }
    }

    /// Seeded with ADMIN (1), SUPERVISOR (2), GUARD (3).
    pub fn with_standard_roles() -> Self {
        Self::new(standard_roles())
    }

    /// Reassign a principal's role (user-management side; not part of the
    /// core contract).
    pub fn assign_role(&self, id: PrincipalId, role_id: RoleId) -> AuthResult<()> {
        if !self.roles.contains_key(&role_id) {
            return Err(AuthError::not_found("Role not found"));
        }
        let mut principals = self.principals.write().map_err(|_| poisoned())?;
        let principal = principals
            .get_mut(&id)
            .ok_or_else(|| AuthError::not_found("User not found"))?;
        principal.role_id = role_id;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.principals.read().map(|p| p.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_principal_by_email(&self, email: &str) -> AuthResult<Option<Principal>> {
        let principals = self.principals.read().map_err(|_| poisoned())?;
        Ok(principals
            .values()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_principal_by_id(&self, id: PrincipalId) -> AuthResult<Principal> {
        let principals = self.principals.read().map_err(|_| poisoned())?;
        principals
            .get(&id)
            .cloned()
            .ok_or_else(|| AuthError::not_found("User not found"))
    }

    async fn create_principal(&self, new: NewPrincipal) -> AuthResult<Principal> {
        if !self.roles.contains_key(&new.role_id) {
            return Err(AuthError::not_found("Role not found"));
        }

        let mut principals = self.principals.write().map_err(|_| poisoned())?;
        if principals
            .values()
            .any(|p| p.email.eq_ignore_ascii_case(&new.email))
        {
            return Err(AuthError::conflict("Email already exists"));
        }

        let principal = Principal {
            id: PrincipalId::new(),
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            password_hash: new.password_hash,
            role_id: new.role_id,
            created_at: Utc::now(),
        };
        principals.insert(principal.id, principal.clone());
        Ok(principal)
    }

    async fn find_role_by_id(&self, id: RoleId) -> AuthResult<RoleRecord> {
        self.roles
            .get(&id)
            .cloned()
            .ok_or_else(|| AuthError::not_found("Role not found"))
    }

    async fn list_roles(&self) -> AuthResult<Vec<RoleRecord>> {
        let mut roles: Vec<_> = self.roles.values().cloned().collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }
}

/// In-memory revocation ledger. Rejects a second insert of the same token.
#[derive(Debug, Default)]
pub struct InMemoryRevocationLedger {
    entries: RwLock<HashMap<String, RevocationEntry>>,
}

impl InMemoryRevocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries whose token has expired anyway. Maintenance only.
    pub fn prune_expired(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        Ok(before - entries.len())
    }
}

#[async_trait]
impl RevocationLedger for InMemoryRevocationLedger {
    async fn insert_revocation(&self, entry: RevocationEntry) -> AuthResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if entries.contains_key(&entry.token) {
            return Err(AuthError::conflict("Token already revoked"));
        }
        entries.insert(entry.token.clone(), entry);
        Ok(())
    }

    async fn lookup_revocation(&self, token: &str) -> AuthResult<Option<RevocationEntry>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::Role;

    fn new_principal(email: &str) -> NewPrincipal {
        NewPrincipal {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            role_id: RoleId::new(3),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryCredentialStore::with_standard_roles();
        store.create_principal(new_principal("alice@example.com")).await.unwrap();

        let err = store
            .create_principal(new_principal("ALICE@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::conflict("Email already exists"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn lookups_by_email_and_id() {
        let store = InMemoryCredentialStore::with_standard_roles();
        let created = store.create_principal(new_principal("bob@example.com")).await.unwrap();

        let by_email = store.find_principal_by_email("bob@example.com").await.unwrap();
        assert_eq!(by_email.as_ref().map(|p| p.id), Some(created.id));
        assert!(store.find_principal_by_email("nobody@example.com").await.unwrap().is_none());

        let by_id = store.find_principal_by_id(created.id).await.unwrap();
        assert_eq!(by_id.email, "bob@example.com");
        assert!(matches!(
            store.find_principal_by_id(PrincipalId::new()).await,
            Err(AuthError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn roles_are_seeded_and_listed_in_id_order() {
        let store = InMemoryCredentialStore::with_standard_roles();
        let names: Vec<_> = store
            .list_roles()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec![Role::ADMIN, Role::SUPERVISOR, Role::GUARD]);
        assert!(matches!(
            store.find_role_by_id(RoleId::new(99)).await,
            Err(AuthError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn assign_role_changes_stored_role() {
        let store = InMemoryCredentialStore::with_standard_roles();
        let created = store.create_principal(new_principal("carol@example.com")).await.unwrap();

        store.assign_role(created.id, RoleId::new(1)).unwrap();
        assert_eq!(store.find_principal_by_id(created.id).await.unwrap().role_id, RoleId::new(1));
        assert!(store.assign_role(created.id, RoleId::new(42)).is_err());
    }

    #[tokio::test]
    async fn ledger_is_append_only() {
        let ledger = InMemoryRevocationLedger::new();
        let entry = RevocationEntry {
            token: "t".to_string(),
            subject: PrincipalId::new(),
            expires_at: Utc::now() + Duration::days(1),
        };

        ledger.insert_revocation(entry.clone()).await.unwrap();
        assert_eq!(ledger.lookup_revocation("t").await.unwrap(), Some(entry.clone()));
        assert!(ledger.lookup_revocation("other").await.unwrap().is_none());
        assert!(matches!(
            ledger.insert_revocation(entry).await,
            Err(AuthError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn prune_drops_only_expired_entries() {
        let ledger = InMemoryRevocationLedger::new();
        let now = Utc::now();
        for (token, offset) in [("old", -1), ("live", 1)] {
            ledger
                .insert_revocation(RevocationEntry {
                    token: token.to_string(),
                    subject: PrincipalId::new(),
                    expires_at: now + Duration::hours(offset),
                })
                .await
                .unwrap();
        }

        assert_eq!(ledger.prune_expired(now).unwrap(), 1);
        assert!(ledger.lookup_revocation("live").await.unwrap().is_some());
        assert!(ledger.lookup_revocation("old").await.unwrap().is_none());
    }
}
