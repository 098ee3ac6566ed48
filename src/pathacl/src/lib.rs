//! # pathacl
//!
//! Hierarchical access control over dotted permission paths.
//!
//! ## Features
//!
//! - **Polarity trees**: roles declare grants (`a.b`), denials (`!a.b`),
//!   forced grants (`+a.b`) and forced denials (`!!a.b`)
//! - **Wildcards**: `*` covers everything below a path, `_` stands for any
//!   single segment
//! - **Deterministic precedence** across multiple roles, independent of role
//!   order
//! - **Value-scoped grants** with "all values" and "listed values" tiers
//! - **Extensions**: caller callbacks that can widen access decisions and
//!   grant values at runtime
//!
//! ## Example
//!
//! ```rust
//! use pathacl::{Authorizer, Check, Grant, Principal, RoleDefinition};
//!
//! let authorizer = Authorizer::new();
//! authorizer.init(
//!     [
//!         ("editor", RoleDefinition::new(["api.posts.*", "!!api.posts.delete", "grants.main.project"])),
//!         ("admin", RoleDefinition::new(["+api.*", "grants.all.*"])),
//!     ],
//!     [("project", Grant::default())],
//!     "*",
//! );
//!
//! let editor = Principal::new(["editor"]).with_grant("project", ["alpha"]);
//! assert!(authorizer.has_access("api.posts.update", &editor, false)?);
//! assert!(!authorizer.has_access("api.posts.delete", &editor, false)?);
//! assert!(authorizer.has_access(Check::only(["api.posts.read", "api.posts.list"]), &editor, false)?);
//!
//! assert!(authorizer.match_grant_values("project", &editor, "alpha", None)?);
//! assert!(!authorizer.match_grant_values("project", &editor, "beta", None)?);
//!
//! let admin = Principal::new(["admin"]);
//! assert!(authorizer.grant_values("project", &admin, false, None)?.is_all());
//! # Ok::<(), pathacl::AclError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod path;
pub mod roles;
pub mod tree;
pub mod types;

// Re-export commonly used types
pub use config::{AclDocument, EngineConfig};
pub use engine::{
    AccessDecision, AccessExtension, Authorizer, Check, CompiledAcl, Evaluator, ExtensionRegistry,
    GrantExtension, PolarityMatches, Rung,
};
pub use error::{AclError, Result};
pub use path::{Permission, Polarity};
pub use roles::{resolve_role, ResolvedPermissions, RoleDefinition};
pub use tree::{LookupMode, Match, PermissionTree, TreeNode};
pub use types::{Grant, GrantMatch, GrantRef, GrantValues, Principal};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
