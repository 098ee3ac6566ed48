//! Compiles permission declarations into polarity trees

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::types::{ResolvedPermissions, RoleDefinition};
use crate::path::{compact, Permission};

/// Resolves a role's declarations into its four polarity trees
///
/// Duplicates and empty entries are dropped first. Declarations that reduce
/// to no segments (`"!!"`, `"..."`) are skipped. A declaration reaching a `*`
/// that is already in the tree is absorbed without notice.
pub fn resolve_role<S: AsRef<str>>(permissions: &[S]) -> ResolvedPermissions {
    let mut resolved = ResolvedPermissions::default();

    for raw in compact(permissions) {
        let permission = match Permission::parse(raw) {
            Ok(permission) => permission,
            Err(e) => {
                debug!("Skipping declaration: {}", e);
                continue;
            }
        };

        let inserted = resolved
            .tree_mut(permission.polarity())
            .insert(permission.segments());

        if !inserted {
            trace!("Declaration '{}' already covered", permission);
        }
    }

    resolved
}

/// Resolves every role of a role table, keyed by role name
pub fn resolve_roles(roles: &BTreeMap<String, RoleDefinition>) -> BTreeMap<String, ResolvedPermissions> {
    roles
        .iter()
        .map(|(name, role)| (name.clone(), resolve_role(&role.permissions)))
        .collect()
}
