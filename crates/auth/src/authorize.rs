use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use guardpost_core::{AuthError, AuthResult};

use crate::matrix::{PermissionMatrix, RoleGrant};
use crate::operations::{OperationId, OperationRegistry};
use crate::{Permission, Role};

/// Outcome of a permission check, with the reason it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum AuthorizationDecision {
    /// Nothing is required for the operation.
    NoRequirement,
    /// The caller holds the wildcard role.
    Wildcard,
    /// The caller holds this one of the required permissions.
    Granted(Permission),
    /// Something is required and the caller has no role.
    NoRole,
    /// The caller's role holds none of the required permissions.
    MissingPermission { required: Vec<Permission> },
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            AuthorizationDecision::NoRequirement
                | AuthorizationDecision::Wildcard
                | AuthorizationDecision::Granted(_)
        )
    }
}

/// Decide whether `role` may perform an operation requiring `required`.
///
/// ANY-of semantics: one matching permission is enough.
///
/// - No IO
/// - No panics
pub fn authorize(
    matrix: &PermissionMatrix,
    required: Option<&[Permission]>,
    role: Option<&Role>,
) -> AuthorizationDecision {
    let required = match required {
        Some(r) if !r.is_empty() => r,
        _ => return AuthorizationDecision::NoRequirement,
    };

    let Some(role) = role else {
        return AuthorizationDecision::NoRole;
    };

    let grant = matrix.grant_for(role);
    if grant == RoleGrant::All {
        return AuthorizationDecision::Wildcard;
    }

    match required.iter().find(|p| grant.contains(p)) {
        Some(p) => AuthorizationDecision::Granted(p.clone()),
        None => AuthorizationDecision::MissingPermission {
            required: required.to_vec(),
        },
    }
}

/// Per-operation gate: looks up the operation's declaration in the
/// registry and checks it against the caller's role.
///
/// Runs after the access guard; it only sees already-authenticated callers.
#[derive(Debug, Clone)]
pub struct PermissionGuard {
    matrix: Arc<PermissionMatrix>,
    registry: Arc<OperationRegistry>,
}

impl PermissionGuard {
    pub fn new(matrix: Arc<PermissionMatrix>, registry: Arc<OperationRegistry>) -> Self {
        Self { matrix, registry }
    }

    pub fn decide(&self, operation: &OperationId, role: Option<&Role>) -> AuthorizationDecision {
        authorize(&self.matrix, self.registry.required_for(operation), role)
    }

    /// `Ok` with the decision when allowed, `Forbidden` otherwise.
    pub fn check(
        &self,
        operation: &OperationId,
        role: Option<&Role>,
    ) -> AuthResult<AuthorizationDecision> {
        let decision = self.decide(operation, role);
        debug!(%operation, role = role.map(Role::as_str), ?decision, "permission decision");

        if decision.is_allowed() {
            Ok(decision)
        } else {
            Err(AuthError::forbidden(format!(
                "insufficient permissions for '{operation}'"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::permissions::catalog::{self, incident, system, user};

    fn guard() -> PermissionGuard {
        let registry = OperationRegistry::new()
            .declare_group("users", [user::VIEW])
            .declare(OperationId::new("system", "configure"), [system::CONFIGURE])
            .declare(
                OperationId::new("incidents", "edit"),
                [incident::UPDATE_OWN, incident::UPDATE_ANY],
            );
        PermissionGuard::new(Arc::new(PermissionMatrix::standard()), Arc::new(registry))
    }

    #[test]
    fn undeclared_operation_is_allowed_without_role() {
        let decision = guard().check(&OperationId::new("health", "ping"), None).unwrap();
        assert_eq!(decision, AuthorizationDecision::NoRequirement);
    }

    #[test]
    fn admin_is_granted_anything() {
        let decision = guard()
            .check(&OperationId::new("system", "configure"), Some(&Role::ADMIN))
            .unwrap();
        assert_eq!(decision, AuthorizationDecision::Wildcard);
    }

    #[test]
    fn guard_role_cannot_configure_system() {
        let err = guard()
            .check(&OperationId::new("system", "configure"), Some(&Role::GUARD))
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
    }

    #[test]
    fn missing_role_is_denied_when_something_is_required() {
        let decision = guard().decide(&OperationId::new("users", "list"), None);
        assert_eq!(decision, AuthorizationDecision::NoRole);
    }

    #[test]
    fn supervisor_passes_group_declaration() {
        let decision = guard()
            .check(&OperationId::new("users", "list"), Some(&Role::SUPERVISOR))
            .unwrap();
        assert_eq!(decision, AuthorizationDecision::Granted(user::VIEW));
    }

    #[test]
    fn any_of_required_permissions_is_enough() {
        // GUARD only has incident.update.own, not .any
        let decision = guard()
            .check(&OperationId::new("incidents", "edit"), Some(&Role::GUARD))
            .unwrap();
        assert_eq!(decision, AuthorizationDecision::Granted(incident::UPDATE_OWN));
    }

    #[test]
    fn unknown_role_fails_closed() {
        let decision = guard().decide(&OperationId::new("users", "list"), Some(&Role::new("INTERN")));
        assert!(matches!(decision, AuthorizationDecision::MissingPermission { .. }));
    }

    fn any_permission_set() -> impl Strategy<Value = Vec<Permission>> {
        proptest::sample::subsequence(catalog::ALL, 0..catalog::ALL.len())
    }

    proptest! {
        #[test]
        fn wildcard_role_is_always_allowed(required in any_permission_set()) {
            let matrix = PermissionMatrix::standard();
            prop_assert!(authorize(&matrix, Some(required.as_slice()), Some(&Role::ADMIN)).is_allowed());
        }

        #[test]
        fn empty_requirement_is_always_allowed(role in prop_oneof![
            Just(None),
            Just(Some(Role::GUARD)),
            Just(Some(Role::SUPERVISOR)),
            Just(Some(Role::new("NOBODY"))),
        ]) {
            let matrix = PermissionMatrix::standard();
            prop_assert!(authorize(&matrix, Some(&[][..]), role.as_ref()).is_allowed());
            prop_assert!(authorize(&matrix, None, role.as_ref()).is_allowed());
        }

        #[test]
        fn no_role_is_denied_for_any_nonempty_requirement(required in any_permission_set()) {
            prop_assume!(!required.is_empty());
            let matrix = PermissionMatrix::standard();
            prop_assert_eq!(authorize(&matrix, Some(required.as_slice()), None), AuthorizationDecision::NoRole);
        }
    }
}
