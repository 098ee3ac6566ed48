//! Dotted permission paths
//!
//! This module splits and joins dotted paths and parses permission
//! declarations into their polarity class and segments.
//!
//! # Examples
//!
//! ```
//! use pathacl::path::{Permission, Polarity};
//!
//! let permission: Permission = "!!api.users.delete".parse().unwrap();
//! assert_eq!(permission.polarity(), Polarity::SuperMinus);
//! assert_eq!(permission.segments(), &["api", "users", "delete"]);
//! ```

mod permission;
mod segments;

pub use permission::{Permission, Polarity};
pub use segments::{compact, join_path, split_check, split_path, PATTERN, SEPARATOR, WILDCARD};
