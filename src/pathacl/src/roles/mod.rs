//! Role resolution
//!
//! Compiles each role's flat list of permission declarations into four
//! polarity trees. Resolution happens once per role when an ACL is compiled;
//! the trees are never mutated afterwards.
//!
//! # Example
//!
//! ```rust
//! use pathacl::roles::resolve_role;
//! use pathacl::tree::{LookupMode, Match};
//!
//! let resolved = resolve_role(&["api.users.*", "!api.users.delete"]);
//!
//! assert_eq!(
//!     resolved.plus.lookup(&["api", "users", "get"], LookupMode::Positive),
//!     Match::Wildcard
//! );
//! assert!(!resolved.minus.is_empty());
//! assert!(resolved.superplus.is_empty());
//! ```

pub mod resolver;
pub mod types;

pub use resolver::{resolve_role, resolve_roles};
pub use types::{ResolvedPermissions, RoleDefinition};
