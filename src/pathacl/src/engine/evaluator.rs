//! Access and grant evaluation over a compiled snapshot

use std::iter;

use serde_json::Value;
use tracing::{debug, trace};

use super::compiled::CompiledAcl;
use super::decision::{AccessDecision, Check, PolarityMatches};
use super::extensions::ExtensionRegistry;
use crate::error::{AclError, Result};
use crate::path::{split_check, Polarity};
use crate::types::{Grant, GrantMatch, GrantRef, GrantValues, Principal};

/// Evaluates checks against one snapshot and a set of extensions
///
/// Cheap to build; borrow one per request from [`CompiledAcl::evaluator`].
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    acl: &'a CompiledAcl,
    extensions: &'a ExtensionRegistry,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(acl: &'a CompiledAcl, extensions: &'a ExtensionRegistry) -> Self {
        Self { acl, extensions }
    }

    /// Combined per-polarity matches of `path` across `roles` and the default role
    ///
    /// Unknown role names are ignored.
    pub fn matches(&self, path: &str, roles: &[String]) -> PolarityMatches {
        let segments = split_check(path);
        let mut combined = PolarityMatches::default();

        let effective = roles
            .iter()
            .map(String::as_str)
            .chain(iter::once(self.acl.default_role()));

        for role in effective {
            let Some(resolved) = self.acl.role_permissions(role) else {
                continue;
            };

            for polarity in Polarity::ALL {
                let found = resolved.tree(polarity).lookup(&segments, polarity.lookup_mode());
                combined.record(polarity, found);
            }
        }

        combined
    }

    /// Whether `principal` passes `check`
    ///
    /// Access extensions registered for a path are consulted when the base
    /// decision for that path denies, unless `suppress_extensions` is set.
    pub fn has_access(
        &self,
        check: &Check,
        principal: &Principal,
        suppress_extensions: bool,
    ) -> Result<bool> {
        check.validate()?;
        principal.roles()?;

        let allowed = match check {
            Check::Path(path) => self.check_path(path, principal, suppress_extensions)?,
            Check::AnyOf(paths) => self.any_passes(paths, principal, suppress_extensions)?,
            Check::Composite { only, .. } if !only.is_empty() => {
                self.all_pass(only, principal, suppress_extensions)?
            }
            Check::Composite { any, .. } => self.any_passes(any, principal, suppress_extensions)?,
        };

        debug!("Access check {:?}: {}", check, if allowed { "ALLOW" } else { "DENY" });
        Ok(allowed)
    }

    /// Decision for one path with the matches and ladder rung behind it
    pub fn explain(
        &self,
        path: &str,
        principal: &Principal,
        suppress_extensions: bool,
    ) -> Result<AccessDecision> {
        Check::path(path).validate()?;
        let roles = principal.roles()?;

        let matches = self.matches(path, roles);
        let (base, rung) = matches.decide();
        let extended = !base && !suppress_extensions && self.run_access_extensions(path, principal)?;

        let mut effective: Vec<String> = roles.to_vec();
        effective.push(self.acl.default_role().to_string());

        Ok(AccessDecision {
            path: path.to_string(),
            allowed: base || extended,
            rung,
            matches,
            roles: effective,
            extended,
        })
    }

    /// Whether `principal` has all-values or listed-values access to a grant
    pub fn has_grant_access<'g>(
        &self,
        grant: impl Into<GrantRef<'g>>,
        principal: &Principal,
    ) -> Result<bool> {
        let name = grant.into().name()?;
        principal.roles()?;

        Ok(self.check_path(&Grant::all_path(name), principal, false)?
            || self.check_path(&Grant::main_path(name), principal, false)?)
    }

    /// Values `principal` may act on for a grant
    ///
    /// [`GrantValues::All`] when the principal has the all-values tier or a
    /// grant extension lifts it there. A principal without a grants map gets
    /// no values. The principal's own values only count while it still holds
    /// the listed-values tier, judged without extensions.
    pub fn grant_values<'g>(
        &self,
        grant: impl Into<GrantRef<'g>>,
        principal: &Principal,
        suppress_extensions: bool,
        extra: Option<&Value>,
    ) -> Result<GrantValues> {
        let name = grant.into().name()?;
        principal.roles()?;

        if self.acl.grant(name).is_none() {
            return Err(AclError::GrantNotFound(name.to_string()));
        }

        if self.check_path(&Grant::all_path(name), principal, false)? {
            return Ok(GrantValues::All);
        }

        if principal.grants.is_none() {
            return Ok(GrantValues::none());
        }

        self.collect_grant_values(name, principal, suppress_extensions, extra)
    }

    /// Whether `principal` may act on the value(s) in `matcher` for a grant
    ///
    /// [`GrantMatch::FullAccess`] asks whether the principal is unrestricted.
    pub fn match_grant_values<'g>(
        &self,
        grant: impl Into<GrantRef<'g>>,
        principal: &Principal,
        matcher: impl Into<GrantMatch>,
        extra: Option<&Value>,
    ) -> Result<bool> {
        let name = grant.into().name()?;
        principal.roles()?;

        if self.check_path(&Grant::all_path(name), principal, false)? {
            return Ok(true);
        }

        let matcher = matcher.into();
        if matcher == GrantMatch::FullAccess {
            return Ok(false);
        }

        if !self.check_path(&Grant::main_path(name), principal, false)? {
            return Ok(false);
        }

        if self.acl.grant(name).is_none() {
            return Err(AclError::GrantNotFound(name.to_string()));
        }

        // A missing grants map counts as empty here, so extensions still run
        let values = self.collect_grant_values(name, principal, false, extra)?;

        Ok(match (values, matcher) {
            (GrantValues::All, _) => true,
            (GrantValues::Only(values), GrantMatch::Value(value)) => {
                values.iter().any(|held| same_value(held, &value))
            }
            (GrantValues::Only(values), GrantMatch::AnyOf(candidates)) => values
                .iter()
                .any(|held| candidates.iter().any(|candidate| same_value(held, candidate))),
            (GrantValues::Only(_), GrantMatch::FullAccess) => false,
        })
    }

    fn check_path(&self, path: &str, principal: &Principal, suppress_extensions: bool) -> Result<bool> {
        let allowed = self.matches(path, principal.roles()?).allowed();
        if allowed || suppress_extensions {
            return Ok(allowed);
        }
        self.run_access_extensions(path, principal)
    }

    fn any_passes(&self, paths: &[String], principal: &Principal, suppress: bool) -> Result<bool> {
        for path in paths {
            if self.check_path(path, principal, suppress)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn all_pass(&self, paths: &[String], principal: &Principal, suppress: bool) -> Result<bool> {
        for path in paths {
            if !self.check_path(path, principal, suppress)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn run_access_extensions(&self, path: &str, principal: &Principal) -> Result<bool> {
        for extension in self.extensions.access_extensions(path) {
            if extension(principal)? {
                trace!("Access extension allowed '{}'", path);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn collect_grant_values(
        &self,
        name: &str,
        principal: &Principal,
        suppress_extensions: bool,
        extra: Option<&Value>,
    ) -> Result<GrantValues> {
        let mut values = if self.check_path(&Grant::main_path(name), principal, true)? {
            principal.grant_values(name).map(<[Value]>::to_vec).unwrap_or_default()
        } else {
            Vec::new()
        };

        if suppress_extensions {
            return Ok(GrantValues::Only(values));
        }

        for extension in self.extensions.grant_extensions(name) {
            match extension(principal, extra)? {
                GrantValues::All => {
                    trace!("Grant extension lifted '{}' to all values", name);
                    return Ok(GrantValues::All);
                }
                GrantValues::Only(more) => values.extend(more),
            }
        }

        Ok(GrantValues::Only(values))
    }
}

/// JSON equality where `1` and `1.0` are the same number
fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => l == r,
        },
        _ => left == right,
    }
}
