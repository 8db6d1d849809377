use guardpost_auth::catalog::user;
use guardpost_auth::{OperationId, OperationRegistry};

pub const ROLES_GROUP: &str = "roles";
pub const ROLES_LIST: OperationId = OperationId::new(ROLES_GROUP, "list");
pub const ROLES_GET: OperationId = OperationId::new(ROLES_GROUP, "get");

/// Requirements for every permission-guarded route.
pub fn registry() -> OperationRegistry {
    OperationRegistry::new().declare_group(ROLES_GROUP, [user::VIEW])
}
