//! Access and grant extension registries
//!
//! Extensions augment decisions; they never restrict them. An access
//! extension can turn a denied path into an allowed one, and a grant
//! extension can add values to a principal's grant (or lift the grant to
//! unrestricted by returning [`GrantValues::All`]).

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::types::{GrantRef, GrantValues, Principal};

/// Callback consulted after the base decision for one check path
pub type AccessExtension = Arc<dyn Fn(&Principal) -> Result<bool> + Send + Sync>;

/// Callback contributing values to a grant
///
/// The second argument is the caller-supplied `extra` context, if any.
pub type GrantExtension =
    Arc<dyn Fn(&Principal, Option<&Value>) -> Result<GrantValues> + Send + Sync>;

/// Registries of access and grant extensions, in registration order
///
/// Lookups clone the registered callbacks out of the map before they run,
/// so a callback may call back into the engine or register further
/// extensions.
#[derive(Default)]
pub struct ExtensionRegistry {
    access: DashMap<String, Vec<AccessExtension>>,
    grants: DashMap<String, Vec<GrantExtension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an extension for an exact check path
    pub fn register_access<F>(&self, path: impl Into<String>, extension: F)
    where
        F: Fn(&Principal) -> Result<bool> + Send + Sync + 'static,
    {
        let path = path.into();
        debug!("Registering access extension for '{}'", path);
        self.access.entry(path).or_default().push(Arc::new(extension));
    }

    /// Appends an extension for a grant
    ///
    /// Fails when the grant reference has no name.
    pub fn register_grant<'a, F>(&self, grant: impl Into<GrantRef<'a>>, extension: F) -> Result<()>
    where
        F: Fn(&Principal, Option<&Value>) -> Result<GrantValues> + Send + Sync + 'static,
    {
        let name = grant.into().name()?;
        debug!("Registering grant extension for '{}'", name);
        self.grants
            .entry(name.to_string())
            .or_default()
            .push(Arc::new(extension));
        Ok(())
    }

    /// Extensions registered for `path`
    pub fn access_extensions(&self, path: &str) -> Vec<AccessExtension> {
        self.access
            .get(path)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Extensions registered for `grant`
    pub fn grant_extensions(&self, grant: &str) -> Vec<GrantExtension> {
        self.grants
            .get(grant)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of extensions across both registries
    pub fn len(&self) -> usize {
        let access: usize = self.access.iter().map(|entry| entry.value().len()).sum();
        let grants: usize = self.grants.iter().map(|entry| entry.value().len()).sum();
        access + grants
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every registered extension
    pub fn clear(&self) {
        self.access.clear();
        self.grants.clear();
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("access_paths", &self.access.len())
            .field("grants", &self.grants.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AclError;
    use crate::types::Grant;
    use serde_json::json;

    #[test]
    fn test_access_extensions_keep_registration_order() {
        let registry = ExtensionRegistry::new();
        registry.register_access("boo", |_| Ok(false));
        registry.register_access("boo", |_| Ok(true));

        let principal = Principal::anonymous();
        let results: Vec<bool> = registry
            .access_extensions("boo")
            .iter()
            .map(|extension| extension(&principal).unwrap())
            .collect();

        assert_eq!(results, vec![false, true]);
        assert!(registry.access_extensions("other").is_empty());
    }

    #[test]
    fn test_grant_extensions_by_name_or_object() {
        let registry = ExtensionRegistry::new();
        registry
            .register_grant("bob", |_, _| Ok(GrantValues::Only(vec![json!(2)])))
            .unwrap();
        registry
            .register_grant(&Grant::new("bob"), |_, _| Ok(GrantValues::All))
            .unwrap();

        assert_eq!(registry.grant_extensions("bob").len(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_grant_extension_requires_name() {
        let registry = ExtensionRegistry::new();
        let result = registry.register_grant(&Grant::default(), |_, _| Ok(GrantValues::none()));
        assert!(matches!(result, Err(AclError::InvalidInput(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear() {
        let registry = ExtensionRegistry::new();
        registry.register_access("a", |_| Ok(true));
        registry.register_grant("g", |_, _| Ok(GrantValues::All)).unwrap();
        assert!(!registry.is_empty());

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.access_extensions("a").is_empty());
    }

    #[test]
    fn test_extension_may_register_while_running() {
        let registry = Arc::new(ExtensionRegistry::new());
        let inner = Arc::clone(&registry);
        registry.register_access("reentrant", move |_| {
            inner.register_access("late", |_| Ok(true));
            Ok(false)
        });

        for extension in registry.access_extensions("reentrant") {
            assert!(!extension(&Principal::anonymous()).unwrap());
        }
        assert_eq!(registry.access_extensions("late").len(), 1);
    }
}
