//! Access engine
//!
//! Ties compiled snapshots, the evaluator and the extension registries
//! together behind [`Authorizer`].
//!
//! # Architecture
//!
//! ```text
//! init(roles, grants) → RoleResolver → CompiledAcl ──┐
//!                                                     ↓
//! has_access(check, principal) → Evaluator → PolarityMatches → ladder → bool
//!                                    ↑
//!                           ExtensionRegistry
//! ```

pub mod compiled;
pub mod decision;
pub mod evaluator;
pub mod extensions;


pub use compiled::CompiledAcl;
pub use decision::{AccessDecision, Check, PolarityMatches, Rung};
pub use evaluator::Evaluator;
pub use extensions::{AccessExtension, ExtensionRegistry, GrantExtension};

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::info;

use crate::config::{AclDocument, EngineConfig};
use crate::error::Result;
use crate::roles::RoleDefinition;
use crate::types::{Grant, GrantMatch, GrantRef, GrantValues, Principal};

/// Access-control context owned by the caller
///
/// Holds the current [`CompiledAcl`] and the extension registries. Checks
/// grab the current snapshot and evaluate against it without holding any
/// lock, so concurrent checks never block each other; `init` and `reset`
/// swap the snapshot under a write lock.
///
/// Extensions survive `init` and are only cleared by `reset`.
///
/// # Example
///
/// ```rust
/// use pathacl::{Authorizer, Principal, RoleDefinition};
///
/// let authorizer = Authorizer::new();
/// authorizer.init(
///     [("editor", RoleDefinition::new(["api.posts.*", "!api.posts.delete", "!!api.posts.purge"]))],
///     Vec::<(String, pathacl::Grant)>::new(),
///     "*",
/// );
///
/// let editor = Principal::new(["editor"]);
/// assert!(authorizer.has_access("api.posts.update", &editor, false).unwrap());
/// // A wildcard grant outranks a plain denial, a forced denial does not
/// assert!(authorizer.has_access("api.posts.delete", &editor, false).unwrap());
/// assert!(!authorizer.has_access("api.posts.purge", &editor, false).unwrap());
/// ```
#[derive(Debug)]
pub struct Authorizer {
    config: EngineConfig,
    snapshot: RwLock<Arc<CompiledAcl>>,
    extensions: ExtensionRegistry,
}

impl Authorizer {
    /// Create an authorizer with the default configuration and no roles
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let snapshot = CompiledAcl::empty(config.default_role.clone());
        Self {
            config,
            snapshot: RwLock::new(Arc::new(snapshot)),
            extensions: ExtensionRegistry::new(),
        }
    }

    /// Create an authorizer initialized from an ACL document
    pub fn from_document(config: EngineConfig, document: &AclDocument) -> Self {
        let authorizer = Self::with_config(config);
        authorizer.load(document);
        authorizer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compiles roles and grants and swaps them in
    ///
    /// Replaces the previous snapshot wholesale. Registered extensions are
    /// kept.
    pub fn init<R, G, K, N>(&self, roles: R, grants: G, default_role: impl Into<String>)
    where
        R: IntoIterator<Item = (K, RoleDefinition)>,
        G: IntoIterator<Item = (N, Grant)>,
        K: Into<String>,
        N: Into<String>,
    {
        let compiled = CompiledAcl::compile(roles, grants, default_role);
        info!(
            "ACL initialized: {} roles, {} grants, default role '{}'",
            compiled.roles().len(),
            compiled.grants().len(),
            compiled.default_role()
        );
        *self.snapshot.write() = Arc::new(compiled);
    }

    /// Initializes from a document, falling back to the configured default role
    pub fn load(&self, document: &AclDocument) {
        let default_role = document
            .default_role
            .clone()
            .unwrap_or_else(|| self.config.default_role.clone());
        self.init(document.roles.clone(), document.grants.clone(), default_role);
    }

    /// Clears roles, grants and every registered extension
    pub fn reset(&self) {
        *self.snapshot.write() = Arc::new(CompiledAcl::empty(self.config.default_role.clone()));
        self.extensions.clear();
        info!("ACL reset");
    }

    /// The current compiled snapshot
    pub fn snapshot(&self) -> Arc<CompiledAcl> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// See [`Evaluator::has_access`]
    pub fn has_access(
        &self,
        check: impl Into<Check>,
        principal: &Principal,
        suppress_extensions: bool,
    ) -> Result<bool> {
        let acl = self.snapshot();
        acl.evaluator(&self.extensions)
            .has_access(&check.into(), principal, suppress_extensions)
    }

    /// See [`Evaluator::explain`]
    pub fn explain(&self, path: &str, principal: &Principal) -> Result<AccessDecision> {
        let acl = self.snapshot();
        acl.evaluator(&self.extensions).explain(path, principal, false)
    }

    /// See [`Evaluator::has_grant_access`]
    pub fn has_grant_access<'g>(
        &self,
        grant: impl Into<GrantRef<'g>>,
        principal: &Principal,
    ) -> Result<bool> {
        let acl = self.snapshot();
        acl.evaluator(&self.extensions).has_grant_access(grant, principal)
    }

    /// See [`Evaluator::grant_values`]
    pub fn grant_values<'g>(
        &self,
        grant: impl Into<GrantRef<'g>>,
        principal: &Principal,
        suppress_extensions: bool,
        extra: Option<&Value>,
    ) -> Result<GrantValues> {
        let acl = self.snapshot();
        acl.evaluator(&self.extensions)
            .grant_values(grant, principal, suppress_extensions, extra)
    }

    /// See [`Evaluator::match_grant_values`]
    pub fn match_grant_values<'g>(
        &self,
        grant: impl Into<GrantRef<'g>>,
        principal: &Principal,
        matcher: impl Into<GrantMatch>,
        extra: Option<&Value>,
    ) -> Result<bool> {
        let acl = self.snapshot();
        acl.evaluator(&self.extensions)
            .match_grant_values(grant, principal, matcher, extra)
    }

    /// Appends an access extension for an exact check path
    pub fn register_access_extension<F>(&self, path: impl Into<String>, extension: F)
    where
        F: Fn(&Principal) -> Result<bool> + Send + Sync + 'static,
    {
        self.extensions.register_access(path, extension);
    }

    /// Appends a grant extension; fails when the grant reference has no name
    pub fn register_grant_extension<'g, F>(
        &self,
        grant: impl Into<GrantRef<'g>>,
        extension: F,
    ) -> Result<()>
    where
        F: Fn(&Principal, Option<&Value>) -> Result<GrantValues> + Send + Sync + 'static,
    {
        self.extensions.register_grant(grant, extension)
    }
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::new()
    }
}
