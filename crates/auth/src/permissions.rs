use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are strings of the form `resource.action[.scope]`
/// (e.g. `incident.update.own`). The full set is the static [`catalog`];
/// nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading segment (`incident` for `incident.update.own`).
    pub fn resource(&self) -> &str {
        self.as_str().split('.').next().unwrap_or_default()
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static permission catalog, grouped by resource.
pub mod catalog {
    use super::Permission;

    pub mod incident {
        use super::Permission;

        pub const CREATE: Permission = Permission::from_static("incident.create");
        pub const UPDATE_OWN: Permission = Permission::from_static("incident.update.own");
        pub const UPDATE_ANY: Permission = Permission::from_static("incident.update.any");
        pub const VIEW_OWN: Permission = Permission::from_static("incident.view.own");
        pub const VIEW_SITE: Permission = Permission::from_static("incident.view.site");
        pub const APPROVE: Permission = Permission::from_static("incident.approve");
        pub const CLOSE: Permission = Permission::from_static("incident.close");
    }

    pub mod shift {
        use super::Permission;

        pub const VIEW_OWN: Permission = Permission::from_static("shift.view.own");
        pub const VIEW_TEAM: Permission = Permission::from_static("shift.view.team");
        pub const ASSIGN: Permission = Permission::from_static("shift.assign");
        pub const CHECKIN: Permission = Permission::from_static("shift.checkin");
        pub const CHECKOUT: Permission = Permission::from_static("shift.checkout");
    }

    pub mod patrol {
        use super::Permission;

        pub const EXECUTE: Permission = Permission::from_static("patrol.execute");
        pub const VIEW_TEAM: Permission = Permission::from_static("patrol.view.team");
        pub const OVERRIDE: Permission = Permission::from_static("patrol.override");
    }

    pub mod report {
        use super::Permission;

        pub const SUBMIT: Permission = Permission::from_static("report.submit");
        pub const VIEW_OWN: Permission = Permission::from_static("report.view.own");
        pub const VIEW_TEAM: Permission = Permission::from_static("report.view.team");
        pub const APPROVE: Permission = Permission::from_static("report.approve");
    }

    pub mod user {
        use super::Permission;

        pub const VIEW: Permission = Permission::from_static("user.view");
        pub const CREATE: Permission = Permission::from_static("user.create");
        pub const UPDATE: Permission = Permission::from_static("user.update");
        pub const DEACTIVATE: Permission = Permission::from_static("user.deactivate");
    }

    pub mod site {
        use super::Permission;

        pub const VIEW: Permission = Permission::from_static("site.view");
        pub const CREATE: Permission = Permission::from_static("site.create");
        pub const UPDATE: Permission = Permission::from_static("site.update");
        pub const DELETE: Permission = Permission::from_static("site.delete");
    }

    pub mod system {
        use super::Permission;

        pub const CONFIGURE: Permission = Permission::from_static("system.configure");
        pub const AUDIT_VIEW: Permission = Permission::from_static("audit.view");
        pub const INTEGRATION_MANAGE: Permission = Permission::from_static("integration.manage");
    }

    /// Every permission in the catalog.
    pub const ALL: &[Permission] = &[
        incident::CREATE,
        incident::UPDATE_OWN,
        incident::UPDATE_ANY,
        incident::VIEW_OWN,
        incident::VIEW_SITE,
        incident::APPROVE,
        incident::CLOSE,
        shift::VIEW_OWN,
        shift::VIEW_TEAM,
        shift::ASSIGN,
        shift::CHECKIN,
        shift::CHECKOUT,
        patrol::EXECUTE,
        patrol::VIEW_TEAM,
        patrol::OVERRIDE,
        report::SUBMIT,
        report::VIEW_OWN,
        report::VIEW_TEAM,
        report::APPROVE,
        user::VIEW,
        user::CREATE,
        user::UPDATE,
        user::DEACTIVATE,
        site::VIEW,
        site::CREATE,
        site::UPDATE,
        site::DELETE,
        system::CONFIGURE,
        system::AUDIT_VIEW,
        system::INTEGRATION_MANAGE,
    ];

    /// Catalog entries whose resource segment equals `resource`.
    pub fn by_resource(resource: &str) -> Vec<Permission> {
        ALL.iter()
            .filter(|p| p.resource() == resource)
            .cloned()
            .collect()
    }

    /// Looks a permission up by its string form.
    pub fn find(name: &str) -> Option<&'static Permission> {
        ALL.iter().find(|p| p.as_str() == name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_entries_are_unique_and_well_formed() {
        let mut seen = HashSet::new();
        for p in catalog::ALL {
            assert!(seen.insert(p.as_str()), "duplicate permission {p}");
            let segments = p.as_str().split('.').count();
            assert!((2..=3).contains(&segments), "malformed permission {p}");
        }
    }

    #[test]
    fn by_resource_groups_on_leading_segment() {
        let shift = catalog::by_resource("shift");
        assert_eq!(shift.len(), 5);
        assert!(shift.contains(&catalog::shift::CHECKIN));
        assert!(catalog::by_resource("payroll").is_empty());
    }

    #[test]
    fn find_returns_catalog_entry() {
        assert_eq!(catalog::find("user.view"), Some(&catalog::user::VIEW));
        assert_eq!(catalog::find("user.fly"), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&catalog::incident::UPDATE_OWN).unwrap();
        assert_eq!(json, "\"incident.update.own\"");
    }
}
