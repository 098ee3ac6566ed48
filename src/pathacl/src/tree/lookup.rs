use std::collections::BTreeMap;

use serde::Serialize;

use super::node::TreeNode;
use crate::path::{PATTERN, WILDCARD};

/// Outcome of walking a check path through one permission tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Match {
    /// The tree does not cover the path
    NoMatch,
    /// The path reached a leaf at exactly its depth, or a placeholder search succeeded
    Exact,
    /// The path was covered by a `*` in the tree, or a `*` check hit the tree
    Wildcard,
}

impl Match {
    pub fn is_match(self) -> bool {
        !matches!(self, Match::NoMatch)
    }
}

/// How a `*` segment in the check path is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// `*` matches any node with at least one child
    Positive,
    /// `*` matches only a node declaring a literal `*`
    Negative,
}

/// Walks `segments` from `node` down the tree
pub(super) fn walk(
    mut node: &BTreeMap<String, TreeNode>,
    segments: &[&str],
    mode: LookupMode,
) -> Match {
    for (idx, segment) in segments.iter().copied().enumerate() {
        let rest = &segments[idx + 1..];

        if segment.is_empty() {
            return Match::NoMatch;
        }

        if segment == WILDCARD {
            let covered = match mode {
                LookupMode::Positive => !node.is_empty(),
                LookupMode::Negative => node.contains_key(WILDCARD),
            };
            return if covered { Match::Wildcard } else { Match::NoMatch };
        }

        if node.contains_key(WILDCARD) {
            return Match::Wildcard;
        }

        if segment == PATTERN {
            return match_pattern_branches(node, rest, mode);
        }

        // A declared placeholder is only descended through, never ended on
        if rest.is_empty() {
            return match node.get(segment) {
                Some(TreeNode::Leaf) => Match::Exact,
                _ => Match::NoMatch,
            };
        }

        // Literal children win over a declared placeholder
        match node.get(segment).or_else(|| node.get(PATTERN)) {
            Some(TreeNode::Branch(children)) => node = children,
            _ => return Match::NoMatch,
        }
    }

    Match::NoMatch
}

/// Resolves a `_` check segment against every child of `node`
///
/// The placeholder is ambiguous across siblings, so each branch is searched
/// independently for the remaining segments. A trailing placeholder matches
/// as soon as the node exists.
pub fn match_pattern_branches(
    node: &BTreeMap<String, TreeNode>,
    rest: &[&str],
    mode: LookupMode,
) -> Match {
    if rest.is_empty() {
        return Match::Exact;
    }

    let found = node.values().any(|child| match child {
        TreeNode::Leaf => false,
        TreeNode::Branch(children) => walk(children, rest, mode).is_match(),
    });

    if found {
        Match::Exact
    } else {
        Match::NoMatch
    }
}
