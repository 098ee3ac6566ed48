//! Core access-control types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{AclError, Result};

/// Role identifier
pub type RoleId = String;

/// Grant identifier
pub type GrantName = String;

/// Opaque grant value (project id, tenant name, ...)
pub type GrantValue = Value;

/// The role-bearing entity being checked
///
/// A principal without a role list is malformed: every access check on it
/// fails with [`AclError::InvalidInput`]. [`Principal::anonymous`] holds an
/// empty role list and is only granted what the default role allows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Role names held by the principal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<RoleId>>,

    /// Values the principal holds for each grant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grants: Option<HashMap<GrantName, Vec<GrantValue>>>,
}

impl Principal {
    /// Create a principal holding the given roles
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: Some(roles.into_iter().map(Into::into).collect()),
            grants: None,
        }
    }

    /// Principal with no roles of its own
    pub fn anonymous() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Add values for a grant
    pub fn with_grant<I>(mut self, grant: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<GrantValue>,
    {
        self.grants
            .get_or_insert_with(HashMap::new)
            .insert(grant.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Attach an empty grants map
    pub fn with_empty_grants(mut self) -> Self {
        self.grants.get_or_insert_with(HashMap::new);
        self
    }

    /// The principal's role list
    pub fn roles(&self) -> Result<&[RoleId]> {
        self.roles
            .as_deref()
            .ok_or_else(|| AclError::InvalidInput("Supplied principal has no roles".to_string()))
    }

    /// Values listed on the principal for `grant`
    pub fn grant_values(&self, grant: &str) -> Option<&[GrantValue]> {
        self.grants.as_ref()?.get(grant).map(Vec::as_slice)
    }
}

/// A named capability with free-form metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    /// Grant name; filled from the registry key when loaded from a table
    #[serde(default, rename = "grant")]
    pub name: GrantName,

    /// Metadata carried alongside the grant
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Grant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Map::new(),
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Path of the "all values" tier
    pub fn all_path(name: &str) -> String {
        format!("grants.all.{}", name)
    }

    /// Path of the "listed values" tier
    pub fn main_path(name: &str) -> String {
        format!("grants.main.{}", name)
    }
}

/// Reference to a grant by name or by its definition
#[derive(Debug, Clone, Copy)]
pub enum GrantRef<'a> {
    Name(&'a str),
    Grant(&'a Grant),
}

impl<'a> GrantRef<'a> {
    /// Resolves the referenced grant's name
    pub fn name(self) -> Result<&'a str> {
        match self {
            GrantRef::Name(name) if !name.is_empty() => Ok(name),
            GrantRef::Name(_) => Err(AclError::InvalidInput("No grant provided".to_string())),
            GrantRef::Grant(grant) if !grant.name.is_empty() => Ok(grant.name.as_str()),
            GrantRef::Grant(_) => Err(AclError::InvalidInput(
                "Grant object supplied has no grant name".to_string(),
            )),
        }
    }
}

impl<'a> From<&'a str> for GrantRef<'a> {
    fn from(name: &'a str) -> Self {
        GrantRef::Name(name)
    }
}

impl<'a> From<&'a String> for GrantRef<'a> {
    fn from(name: &'a String) -> Self {
        GrantRef::Name(name)
    }
}

impl<'a> From<&'a Grant> for GrantRef<'a> {
    fn from(grant: &'a Grant) -> Self {
        GrantRef::Grant(grant)
    }
}

/// Values a principal may act on for a grant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GrantValues {
    /// Unrestricted: every value is implicitly included
    All,
    /// Only the listed values
    Only(Vec<GrantValue>),
}

impl GrantValues {
    pub fn none() -> Self {
        GrantValues::Only(Vec::new())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, GrantValues::All)
    }

    /// Listed values, or `None` when unrestricted
    pub fn values(&self) -> Option<&[GrantValue]> {
        match self {
            GrantValues::All => None,
            GrantValues::Only(values) => Some(values),
        }
    }

    pub fn contains(&self, value: &GrantValue) -> bool {
        match self {
            GrantValues::All => true,
            GrantValues::Only(values) => values.contains(value),
        }
    }
}

impl From<Option<Vec<GrantValue>>> for GrantValues {
    fn from(values: Option<Vec<GrantValue>>) -> Self {
        values.map_or(GrantValues::All, GrantValues::Only)
    }
}

/// What a grant match is asked about
#[derive(Debug, Clone, PartialEq)]
pub enum GrantMatch {
    /// Does the principal have unrestricted access?
    FullAccess,
    /// Is this value allowed?
    Value(GrantValue),
    /// Is any of these values allowed?
    AnyOf(Vec<GrantValue>),
}

impl From<Value> for GrantMatch {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => GrantMatch::FullAccess,
            Value::Array(values) => GrantMatch::AnyOf(values),
            other => GrantMatch::Value(other),
        }
    }
}

impl From<&str> for GrantMatch {
    fn from(value: &str) -> Self {
        GrantMatch::Value(Value::from(value))
    }
}

impl From<Option<Value>> for GrantMatch {
    fn from(value: Option<Value>) -> Self {
        value.map_or(GrantMatch::FullAccess, GrantMatch::from)
    }
}
