use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use guardpost_core::RoleId;

/// Role name used for RBAC (`ADMIN`, `SUPERVISOR`, `GUARD`).
///
/// Kept as an opaque string so that a name unknown to the permission matrix
/// can still be carried (and then resolves to zero permissions).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role::from_static("ADMIN");
    pub const SUPERVISOR: Role = Role::from_static("SUPERVISOR");
    pub const GUARD: Role = Role::from_static("GUARD");

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role reference data as stored by the credential collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: Role,
}

/// The seeded role rows (ids are stable across stores).
pub fn standard_roles() -> Vec<RoleRecord> {
    vec![
        RoleRecord { id: RoleId::new(1), name: Role::ADMIN },
        RoleRecord { id: RoleId::new(2), name: Role::SUPERVISOR },
        RoleRecord { id: RoleId::new(3), name: Role::GUARD },
    ]
}
