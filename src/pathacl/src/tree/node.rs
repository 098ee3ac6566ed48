use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::lookup::{walk, LookupMode, Match};
use crate::path::WILDCARD;

/// A node of a permission tree
///
/// Serializes as `null` for a leaf and as an object for a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Permission granted to exactly this depth
    Leaf,
    /// Deeper segments required
    Branch(BTreeMap<String, TreeNode>),
}

impl TreeNode {
    /// Builds the chain of branches for `segments`, ending in a leaf
    fn chain<S: AsRef<str>>(segments: &[S]) -> Self {
        segments.iter().rev().fold(TreeNode::Leaf, |node, segment| {
            TreeNode::Branch(BTreeMap::from([(segment.as_ref().to_string(), node)]))
        })
    }

    /// Whether this node's subtree is fully covered by a `*` child
    pub fn has_wildcard(&self) -> bool {
        match self {
            TreeNode::Leaf => false,
            TreeNode::Branch(children) => children.contains_key(WILDCARD),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf)
    }

    pub fn children(&self) -> Option<&BTreeMap<String, TreeNode>> {
        match self {
            TreeNode::Leaf => None,
            TreeNode::Branch(children) => Some(children),
        }
    }
}

/// Permission tree for one polarity of one role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTree {
    root: BTreeMap<String, TreeNode>,
}

impl PermissionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Top-level children of the tree
    pub fn root(&self) -> &BTreeMap<String, TreeNode> {
        &self.root
    }

    /// Inserts a declared path
    ///
    /// Returns `false` when the tree was left unchanged: the path was empty,
    /// already declared, a prefix of a deeper declaration, or absorbed by a
    /// `*` declared at one of its prefixes.
    pub fn insert<S: AsRef<str>>(&mut self, segments: &[S]) -> bool {
        insert_into(&mut self.root, segments)
    }

    /// Walks `segments` through the tree
    pub fn lookup(&self, segments: &[&str], mode: LookupMode) -> Match {
        if self.root.is_empty() {
            return Match::NoMatch;
        }
        walk(&self.root, segments, mode)
    }
}

fn insert_into<S: AsRef<str>>(children: &mut BTreeMap<String, TreeNode>, segments: &[S]) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };

    match children.get_mut(head.as_ref()) {
        None => {
            children.insert(head.as_ref().to_string(), TreeNode::chain(rest));
            true
        }
        // Wildcard absorption: first occurrence wins
        Some(child) if child.has_wildcard() => false,
        Some(_) if rest.is_empty() => false,
        Some(TreeNode::Branch(grandchildren)) => insert_into(grandchildren, rest),
        // A deeper declaration supersedes a shallower leaf
        Some(leaf) => {
            *leaf = TreeNode::chain(rest);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(paths: &[&str]) -> PermissionTree {
        let mut tree = PermissionTree::new();
        for path in paths {
            tree.insert(&crate::path::split_path(path));
        }
        tree
    }

    #[test]
    fn test_insert_builds_nested_branches() {
        let tree = tree(&["some.permissions", "some.more.permissions", "other.permissions"]);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "some": { "permissions": null, "more": { "permissions": null } },
                "other": { "permissions": null },
            })
        );
    }

    #[test]
    fn test_wildcard_absorbs_later_declarations() {
        let mut tree = tree(&["foo.*"]);
        assert!(!tree.insert(&["foo", "nerf"]));
        assert!(!tree.insert(&["foo", "this", "must", "not", "appear"]));
        assert_eq!(serde_json::to_value(&tree).unwrap(), json!({ "foo": { "*": null } }));
    }

    #[test]
    fn test_wildcard_does_not_absorb_earlier_siblings() {
        let tree = tree(&["foo.nerf", "foo.*"]);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({ "foo": { "nerf": null, "*": null } })
        );
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut tree = tree(&["a.b"]);
        assert!(!tree.insert(&["a", "b"]));
        assert!(!tree.insert(&["a"]));
        assert!(!tree.insert::<&str>(&[]));
    }

    #[test]
    fn test_deeper_declaration_replaces_leaf() {
        let mut tree = tree(&["a"]);
        assert!(tree.insert(&["a", "b"]));
        assert_eq!(serde_json::to_value(&tree).unwrap(), json!({ "a": { "b": null } }));
    }

    #[test]
    fn test_tree_deserializes_from_json() {
        let parsed: PermissionTree =
            serde_json::from_value(json!({ "a": { "*": null }, "b": null })).unwrap();
        assert_eq!(parsed, tree(&["a.*", "b"]));
        assert!(parsed.root()["a"].has_wildcard());
        assert!(parsed.root()["b"].is_leaf());
    }
}
