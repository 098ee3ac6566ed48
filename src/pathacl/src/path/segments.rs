//! Segment helpers shared by the resolver and the evaluator

use std::collections::HashSet;

/// Terminal wildcard: everything below this point
pub const WILDCARD: &str = "*";

/// Placeholder matching any single segment
pub const PATTERN: &str = "_";

/// Separator between path segments
pub const SEPARATOR: char = '.';

/// Splits a declared path into its non-empty segments
///
/// `"api..users."` yields `["api", "users"]`.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty()).collect()
}

/// Splits a check path without discarding empty segments
///
/// Empty segments are kept so the evaluator can reject them; a check of
/// `"api..users"` never matches anything.
pub fn split_check(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).collect()
}

/// Joins segments back into a dotted path
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut joined = String::new();
    for (idx, segment) in segments.iter().enumerate() {
        if idx > 0 {
            joined.push(SEPARATOR);
        }
        joined.push_str(segment.as_ref());
    }
    joined
}

/// Drops empty entries and duplicates, keeping first-occurrence order
pub fn compact<S: AsRef<str>>(items: &[S]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|item| !item.is_empty() && seen.insert(*item))
        .collect()
}
