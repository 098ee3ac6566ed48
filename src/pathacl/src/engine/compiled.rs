//! Immutable compiled ACL snapshot

use std::collections::BTreeMap;

use serde::Serialize;

use super::extensions::ExtensionRegistry;
use super::evaluator::Evaluator;
use crate::roles::{resolve_roles, ResolvedPermissions, RoleDefinition};
use crate::types::Grant;

/// Roles, grants and resolved permission trees, compiled once by `init`
///
/// A snapshot is never mutated after compilation; re-initialization builds
/// a new one and swaps it in wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledAcl {
    default_role: String,
    roles: BTreeMap<String, RoleDefinition>,
    permissions: BTreeMap<String, ResolvedPermissions>,
    grants: BTreeMap<String, Grant>,
}

impl CompiledAcl {
    /// Compiles roles and grants
    ///
    /// Grant names are taken from the table keys, overriding any name the
    /// definition carried.
    pub fn compile<R, G, K, N>(roles: R, grants: G, default_role: impl Into<String>) -> Self
    where
        R: IntoIterator<Item = (K, RoleDefinition)>,
        G: IntoIterator<Item = (N, Grant)>,
        K: Into<String>,
        N: Into<String>,
    {
        let roles: BTreeMap<String, RoleDefinition> =
            roles.into_iter().map(|(name, role)| (name.into(), role)).collect();

        let grants = grants
            .into_iter()
            .map(|(name, mut grant)| {
                let name = name.into();
                grant.name = name.clone();
                (name, grant)
            })
            .collect();

        let permissions = resolve_roles(&roles);

        Self {
            default_role: default_role.into(),
            roles,
            permissions,
            grants,
        }
    }

    /// Snapshot with no roles and no grants
    pub fn empty(default_role: impl Into<String>) -> Self {
        Self {
            default_role: default_role.into(),
            roles: BTreeMap::new(),
            permissions: BTreeMap::new(),
            grants: BTreeMap::new(),
        }
    }

    /// Role appended to every principal's roles
    pub fn default_role(&self) -> &str {
        &self.default_role
    }

    pub fn roles(&self) -> &BTreeMap<String, RoleDefinition> {
        &self.roles
    }

    pub fn grants(&self) -> &BTreeMap<String, Grant> {
        &self.grants
    }

    pub fn grant(&self, name: &str) -> Option<&Grant> {
        self.grants.get(name)
    }

    /// Resolved trees of every role
    pub fn permissions(&self) -> &BTreeMap<String, ResolvedPermissions> {
        &self.permissions
    }

    /// Resolved trees of one role
    pub fn role_permissions(&self, role: &str) -> Option<&ResolvedPermissions> {
        self.permissions.get(role)
    }

    /// Every `grants.main.<g>` and `grants.all.<g>` path the grants imply, sorted
    pub fn grant_permission_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .grants
            .keys()
            .flat_map(|name| [Grant::all_path(name), Grant::main_path(name)])
            .collect();
        paths.sort();
        paths
    }

    /// Evaluator over this snapshot and the given extensions
    pub fn evaluator<'a>(&'a self, extensions: &'a ExtensionRegistry) -> Evaluator<'a> {
        Evaluator::new(self, extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::resolve_role;

    fn sample() -> CompiledAcl {
        CompiledAcl::compile(
            [
                ("foo", RoleDefinition::new(["wut", "lut"])),
                ("bar", RoleDefinition::default()),
            ],
            [("bob", Grant::new("ignored")), ("pete", Grant::default())],
            "*",
        )
    }

    #[test]
    fn test_compile_resolves_every_role() {
        let acl = sample();
        assert_eq!(acl.default_role(), "*");
        assert_eq!(acl.roles().len(), 2);
        assert_eq!(acl.role_permissions("foo"), Some(&resolve_role(&["wut", "lut"])));
        assert!(acl.role_permissions("bar").unwrap().is_empty());
        assert!(acl.role_permissions("missing").is_none());
    }

    #[test]
    fn test_grant_names_come_from_keys() {
        let acl = sample();
        assert_eq!(acl.grant("bob").unwrap().name, "bob");
        assert_eq!(acl.grant("pete").unwrap().name, "pete");
    }

    #[test]
    fn test_grant_permission_paths() {
        assert_eq!(
            sample().grant_permission_paths(),
            vec![
                "grants.all.bob",
                "grants.all.pete",
                "grants.main.bob",
                "grants.main.pete",
            ]
        );
    }

    #[test]
    fn test_compilation_is_deterministic() {
        assert_eq!(sample(), sample());
    }

    #[test]
    fn test_empty_snapshot() {
        let acl = CompiledAcl::empty("guest");
        assert_eq!(acl.default_role(), "guest");
        assert!(acl.permissions().is_empty());
        assert!(acl.grant_permission_paths().is_empty());
    }
}
