//! Role → permission table.

use std::collections::{HashMap, HashSet};

use crate::permissions::catalog::{incident, patrol, report, shift, site, user};
use crate::{Permission, Role};

/// What a role is granted, as resolved from the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrant<'a> {
    /// The wildcard role: every permission, present and future.
    All,
    /// An explicit set. Unknown roles resolve to an empty set.
    Only(&'a HashSet<Permission>),
}

impl RoleGrant<'_> {
    pub fn contains(&self, permission: &Permission) -> bool {
        match self {
            RoleGrant::All => true,
            RoleGrant::Only(set) => set.contains(permission),
        }
    }
}

/// Static mapping from role name to the permissions it holds.
///
/// At most one role holds the wildcard. A role without an entry holds
/// nothing (fail closed); looking it up is never an error.
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    wildcard: Option<Role>,
    grants: HashMap<Role, HashSet<Permission>>,
}

static EMPTY: std::sync::LazyLock<HashSet<Permission>> = std::sync::LazyLock::new(HashSet::new);

impl PermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `role` the wildcard role, replacing any previous one.
    pub fn with_wildcard(mut self, role: Role) -> Self {
        self.grants.remove(&role);
        self.wildcard = Some(role);
        self
    }

    /// Grant `permissions` to `role` (additive).
    pub fn with_grants<I>(mut self, role: Role, permissions: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        if self.wildcard.as_ref() != Some(&role) {
            self.grants.entry(role).or_default().extend(permissions);
        }
        self
    }

    /// The platform's built-in table: ADMIN is the wildcard role,
    /// SUPERVISOR manages teams and sites, GUARD works its own shifts.
    pub fn standard() -> Self {
        Self::new()
            .with_wildcard(Role::ADMIN)
            .with_grants(
                Role::SUPERVISOR,
                [
                    incident::CREATE,
                    incident::UPDATE_ANY,
                    incident::VIEW_SITE,
                    incident::APPROVE,
                    incident::CLOSE,
                    shift::VIEW_TEAM,
                    shift::ASSIGN,
                    patrol::VIEW_TEAM,
                    patrol::OVERRIDE,
                    report::VIEW_TEAM,
                    report::APPROVE,
                    user::VIEW,
                    site::VIEW,
                ],
            )
            .with_grants(
                Role::GUARD,
                [
                    incident::CREATE,
                    incident::UPDATE_OWN,
                    incident::VIEW_OWN,
                    shift::VIEW_OWN,
                    shift::CHECKIN,
                    shift::CHECKOUT,
                    patrol::EXECUTE,
                    report::SUBMIT,
                    report::VIEW_OWN,
                    site::VIEW,
                ],
            )
    }

    pub fn wildcard_role(&self) -> Option<&Role> {
        self.wildcard.as_ref()
    }

    pub fn is_wildcard(&self, role: &Role) -> bool {
        self.wildcard.as_ref() == Some(role)
    }

    /// Resolve a role's grant. Roles missing from the table get an empty set.
    pub fn grant_for(&self, role: &Role) -> RoleGrant<'_> {
        if self.is_wildcard(role) {
            return RoleGrant::All;
        }
        RoleGrant::Only(self.grants.get(role).unwrap_or(&EMPTY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::catalog::{self, system};

    #[test]
    fn admin_is_the_only_wildcard() {
        let matrix = PermissionMatrix::standard();
        assert_eq!(matrix.wildcard_role(), Some(&Role::ADMIN));
        assert_eq!(matrix.grant_for(&Role::ADMIN), RoleGrant::All);
        assert!(!matrix.is_wildcard(&Role::SUPERVISOR));
    }

    #[test]
    fn replacing_wildcard_demotes_previous_holder() {
        let matrix = PermissionMatrix::standard().with_wildcard(Role::new("ROOT"));
        assert!(matrix.is_wildcard(&Role::new("ROOT")));
        assert!(!matrix.grant_for(&Role::ADMIN).contains(&catalog::user::VIEW));
    }

    #[test]
    fn unknown_role_holds_nothing() {
        let matrix = PermissionMatrix::standard();
        let grant = matrix.grant_for(&Role::new("JANITOR"));
        assert!(catalog::ALL.iter().all(|p| !grant.contains(p)));
    }

    #[test]
    fn guard_cannot_configure_system() {
        let matrix = PermissionMatrix::standard();
        assert!(!matrix.grant_for(&Role::GUARD).contains(&system::CONFIGURE));
        assert!(matrix.grant_for(&Role::GUARD).contains(&shift::CHECKIN));
    }

    #[test]
    fn standard_grants_come_from_catalog() {
        let matrix = PermissionMatrix::standard();
        for role in [Role::SUPERVISOR, Role::GUARD] {
            let RoleGrant::Only(set) = matrix.grant_for(&role) else {
                panic!("{role} should not be a wildcard");
            };
            assert!(set.iter().all(|p| catalog::find(p.as_str()).is_some()));
        }
    }
}
