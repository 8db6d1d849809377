//! Explicit per-operation permission declarations.

use std::collections::HashMap;

use crate::Permission;

/// Identifies a protected operation within a group (e.g. `roles` / `list`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OperationId {
    pub group: &'static str,
    pub name: &'static str,
}

impl OperationId {
    pub const fn new(group: &'static str, name: &'static str) -> Self {
        Self { group, name }
    }
}

impl core::fmt::Display for OperationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// Registry of required-permission declarations.
///
/// An operation-level declaration always wins over its group's declaration,
/// even when it is empty.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    groups: HashMap<&'static str, Vec<Permission>>,
    operations: HashMap<OperationId, Vec<Permission>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_group<I>(mut self, group: &'static str, required: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        self.groups.insert(group, required.into_iter().collect());
        self
    }

    pub fn declare<I>(mut self, operation: OperationId, required: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        self.operations.insert(operation, required.into_iter().collect());
        self
    }

    /// Required permissions for `operation`, or `None` when nothing is declared.
    pub fn required_for(&self, operation: &OperationId) -> Option<&[Permission]> {
        self.operations
            .get(operation)
            .or_else(|| self.groups.get(operation.group))
            .map(Vec::as_slice)
    }
}
