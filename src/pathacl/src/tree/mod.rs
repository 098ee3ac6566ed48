//! Permission trees
//!
//! A role's declarations of one polarity are folded into a [`PermissionTree`]:
//! nested branches keyed by path segment, ending in a [`TreeNode::Leaf`] at
//! the depth the permission was declared. A `*` key covers its whole subtree
//! and stops later declarations from growing past it.
//!
//! Lookups walk a check path through a tree and report a three-valued
//! [`Match`], keeping wildcard matches apart from exact ones because they
//! carry different precedence during role combination.

mod lookup;
mod node;

pub use lookup::{match_pattern_branches, LookupMode, Match};
pub use node::{PermissionTree, TreeNode};
