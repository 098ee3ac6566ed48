//! Access checks and the precedence ladder that decides them

use serde::{Deserialize, Serialize};

use crate::error::{AclError, Result};
use crate::path::Polarity;
use crate::tree::Match;

/// What is being checked
///
/// Deserializes from a string, a list of strings, or an object with `any`
/// and/or `only` lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Check {
    /// A single dotted path
    Path(String),
    /// Passes if any path passes
    AnyOf(Vec<String>),
    /// `only` (every path must pass) wins over `any` when non-empty
    Composite {
        #[serde(default)]
        any: Vec<String>,
        #[serde(default)]
        only: Vec<String>,
    },
}

impl Check {
    pub fn path(path: impl Into<String>) -> Self {
        Check::Path(path.into())
    }

    /// Passes if any of `paths` passes
    pub fn any<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Check::Composite {
            any: paths.into_iter().map(Into::into).collect(),
            only: Vec::new(),
        }
    }

    /// Passes only if every one of `paths` passes
    pub fn only<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Check::Composite {
            any: Vec::new(),
            only: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Rejects a check with nothing to evaluate
    pub fn validate(&self) -> Result<()> {
        match self {
            Check::Path(path) if path.is_empty() => Err(AclError::InvalidInput(
                "No permission provided for check".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl From<&str> for Check {
    fn from(path: &str) -> Self {
        Check::Path(path.to_string())
    }
}

impl From<String> for Check {
    fn from(path: String) -> Self {
        Check::Path(path)
    }
}

impl From<Vec<String>> for Check {
    fn from(paths: Vec<String>) -> Self {
        Check::AnyOf(paths)
    }
}

impl From<Vec<&str>> for Check {
    fn from(paths: Vec<&str>) -> Self {
        Check::AnyOf(paths.into_iter().map(str::to_string).collect())
    }
}

/// The rung of the precedence ladder that settled a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rung {
    /// Exact forced grant not met by an exact forced denial
    StrongGrant,
    /// Wildcard forced grant with no forced denial at all
    StrongWildcardGrant,
    /// Ordinary denial through a wildcard
    WildcardDenial,
    /// Exact forced denial
    StrongDenial,
    /// Forced denial through a wildcard
    StrongWildcardDenial,
    /// Ordinary grant through a wildcard
    WildcardGrant,
    /// Ordinary grant with no denial, or nothing matched
    Plain,
}

/// Per-polarity matches for one path, combined across all effective roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolarityMatches {
    pub superminus: Match,
    pub minus: Match,
    pub plus: Match,
    pub superplus: Match,
}

impl Default for PolarityMatches {
    fn default() -> Self {
        Self {
            superminus: Match::NoMatch,
            minus: Match::NoMatch,
            plus: Match::NoMatch,
            superplus: Match::NoMatch,
        }
    }
}

impl PolarityMatches {
    pub fn get(&self, polarity: Polarity) -> Match {
        match polarity {
            Polarity::SuperMinus => self.superminus,
            Polarity::Minus => self.minus,
            Polarity::Plus => self.plus,
            Polarity::SuperPlus => self.superplus,
        }
    }

    /// Folds one role's match for `polarity` into the combined result
    ///
    /// When roles disagree between exact and wildcard matches, the kind the
    /// ladder consults first wins, so role order never changes the outcome.
    pub fn record(&mut self, polarity: Polarity, found: Match) {
        let slot = match polarity {
            Polarity::SuperMinus => &mut self.superminus,
            Polarity::Minus => &mut self.minus,
            Polarity::Plus => &mut self.plus,
            Polarity::SuperPlus => &mut self.superplus,
        };

        *slot = match (*slot, found) {
            (Match::NoMatch, other) | (other, Match::NoMatch) => other,
            (current, other) if current == other => current,
            _ => dominant_match(polarity),
        };
    }

    /// Runs the precedence ladder
    pub fn decide(&self) -> (bool, Rung) {
        let veryno = self.superminus;
        let no = self.minus;
        let yes = self.plus;
        let veryyes = self.superplus;

        if veryyes == Match::Exact && veryno != Match::Exact {
            return (true, Rung::StrongGrant);
        }
        if veryyes == Match::Wildcard && !veryno.is_match() {
            return (true, Rung::StrongWildcardGrant);
        }
        if no == Match::Wildcard {
            return (false, Rung::WildcardDenial);
        }
        if veryno == Match::Exact {
            return (false, Rung::StrongDenial);
        }
        if veryno == Match::Wildcard {
            return (false, Rung::StrongWildcardDenial);
        }
        if yes == Match::Wildcard {
            return (true, Rung::WildcardGrant);
        }

        (yes.is_match() && !no.is_match() && !veryno.is_match(), Rung::Plain)
    }

    pub fn allowed(&self) -> bool {
        self.decide().0
    }
}

fn dominant_match(polarity: Polarity) -> Match {
    match polarity {
        Polarity::Minus | Polarity::Plus => Match::Wildcard,
        Polarity::SuperMinus | Polarity::SuperPlus => Match::Exact,
    }
}

/// Why a single path was allowed or denied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessDecision {
    /// Path that was checked
    pub path: String,

    /// Final outcome, extensions included
    pub allowed: bool,

    /// Ladder rung that settled the base decision
    pub rung: Rung,

    /// Combined per-polarity matches
    pub matches: PolarityMatches,

    /// Effective roles, default role included
    pub roles: Vec<String>,

    /// Whether an access extension turned a denial into an allow
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(superminus: Match, minus: Match, plus: Match, superplus: Match) -> PolarityMatches {
        PolarityMatches { superminus, minus, plus, superplus }
    }

    use Match::{Exact as E, NoMatch as N, Wildcard as W};

    #[test]
    fn test_nothing_matched_denies() {
        assert_eq!(PolarityMatches::default().decide(), (false, Rung::Plain));
    }

    #[test]
    fn test_plain_grant_and_denial() {
        assert_eq!(matches(N, N, E, N).decide(), (true, Rung::Plain));
        assert_eq!(matches(N, E, E, N).decide(), (false, Rung::Plain));
        assert_eq!(matches(E, N, E, N).decide(), (false, Rung::StrongDenial));
    }

    #[test]
    fn test_strong_grant_rungs() {
        assert_eq!(matches(W, W, N, E).decide(), (true, Rung::StrongGrant));
        assert_eq!(matches(E, N, N, E).decide(), (false, Rung::StrongDenial));
        assert_eq!(matches(N, W, N, W).decide(), (true, Rung::StrongWildcardGrant));
        assert_eq!(matches(W, N, N, W).decide(), (false, Rung::StrongWildcardDenial));
    }

    #[test]
    fn test_wildcard_rungs() {
        assert_eq!(matches(N, W, W, N).decide(), (false, Rung::WildcardDenial));
        assert_eq!(matches(E, W, W, N).decide(), (false, Rung::WildcardDenial));
        assert_eq!(matches(N, E, W, N).decide(), (true, Rung::WildcardGrant));
        assert_eq!(matches(W, N, W, N).decide(), (false, Rung::StrongWildcardDenial));
    }

    #[test]
    fn test_record_is_order_independent() {
        for polarity in Polarity::ALL {
            let mut forward = PolarityMatches::default();
            forward.record(polarity, E);
            forward.record(polarity, W);

            let mut backward = PolarityMatches::default();
            backward.record(polarity, W);
            backward.record(polarity, E);

            assert_eq!(forward, backward);
            assert_eq!(forward.get(polarity), dominant_match(polarity));
        }
    }

    #[test]
    fn test_record_keeps_first_match_over_none() {
        let mut combined = PolarityMatches::default();
        combined.record(Polarity::Plus, E);
        combined.record(Polarity::Plus, N);
        assert_eq!(combined.plus, E);
    }

    #[test]
    fn test_check_validation() {
        assert!(Check::from("").validate().is_err());
        assert!(Check::from("a.b").validate().is_ok());
        assert!(Check::from(Vec::<String>::new()).validate().is_ok());
        assert!(Check::any(Vec::<String>::new()).validate().is_ok());
    }

    #[test]
    fn test_check_deserialization() {
        let single: Check = serde_json::from_str(r#""a.b""#).unwrap();
        assert_eq!(single, Check::path("a.b"));

        let list: Check = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(list, Check::from(vec!["a", "b"]));

        let only: Check = serde_json::from_str(r#"{"only": ["a"]}"#).unwrap();
        assert_eq!(only, Check::only(["a"]));

        let empty: Check = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Check::Composite { any: vec![], only: vec![] });
    }
}
