//! Role type definitions

use serde::{Deserialize, Serialize};

use crate::path::Polarity;
use crate::tree::PermissionTree;

/// Role as supplied by the caller: a flat list of permission declarations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Declarations such as `api.users.*`, `!api.users.delete`, `+admin.*`
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl RoleDefinition {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a declaration to the role
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }
}

/// A role's declarations compiled into one tree per polarity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPermissions {
    pub plus: PermissionTree,
    pub minus: PermissionTree,
    pub superplus: PermissionTree,
    pub superminus: PermissionTree,
}

impl ResolvedPermissions {
    pub fn tree(&self, polarity: Polarity) -> &PermissionTree {
        match polarity {
            Polarity::Plus => &self.plus,
            Polarity::Minus => &self.minus,
            Polarity::SuperPlus => &self.superplus,
            Polarity::SuperMinus => &self.superminus,
        }
    }

    pub fn tree_mut(&mut self, polarity: Polarity) -> &mut PermissionTree {
        match polarity {
            Polarity::Plus => &mut self.plus,
            Polarity::Minus => &mut self.minus,
            Polarity::SuperPlus => &mut self.superplus,
            Polarity::SuperMinus => &mut self.superminus,
        }
    }

    /// Whether the role declares nothing at all
    pub fn is_empty(&self) -> bool {
        Polarity::ALL.iter().all(|polarity| self.tree(*polarity).is_empty())
    }
}
