//! Engine settings and ACL documents

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{AclError, Result};
use crate::roles::RoleDefinition;
use crate::types::Grant;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Role every principal implicitly holds
    #[serde(default = "default_role")]
    pub default_role: String,
}

fn default_role() -> String {
    "*".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_role: default_role(),
        }
    }
}

/// Roles and grants as written by an operator
///
/// ```toml
/// default_role = "guest"
///
/// [roles.guest]
/// permissions = ["public.*"]
///
/// [roles.editor]
/// permissions = ["api.posts.*", "!!api.posts.delete"]
///
/// [grants.project]
/// label = "Project"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AclDocument {
    /// Overrides [`EngineConfig::default_role`] when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_role: Option<String>,

    #[serde(default)]
    pub roles: BTreeMap<String, RoleDefinition>,

    /// Grant metadata keyed by grant name
    #[serde(default)]
    pub grants: BTreeMap<String, Grant>,
}

impl AclDocument {
    /// Load a document from disk
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let document: AclDocument = toml::from_str(contents)?;
        document.validated()
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let document: AclDocument = serde_json::from_str(contents)?;
        document.validated()
    }

    /// Reject documents with empty role, grant or default role names
    pub fn validate(&self) -> Result<()> {
        if matches!(self.default_role.as_deref(), Some("")) {
            return Err(AclError::Config("default_role must not be empty".to_string()));
        }

        if self.roles.keys().any(String::is_empty) {
            return Err(AclError::Config("Role names must not be empty".to_string()));
        }

        if self.grants.keys().any(String::is_empty) {
            return Err(AclError::Config("Grant names must not be empty".to_string()));
        }

        Ok(())
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TOML_DOC: &str = r#"
default_role = "guest"

[roles.guest]
permissions = ["public.*"]

[roles.editor]
permissions = ["api.posts.*", "!api.posts.delete"]

[grants.project]
label = "Project"
"#;

    #[test]
    fn test_default_engine_config() {
        assert_eq!(EngineConfig::default().default_role, "*");

        let parsed: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn test_toml_document() {
        let doc = AclDocument::from_toml_str(TOML_DOC).unwrap();

        assert_eq!(doc.default_role.as_deref(), Some("guest"));
        assert_eq!(doc.roles["editor"].permissions, vec!["api.posts.*", "!api.posts.delete"]);
        assert_eq!(doc.grants["project"].metadata["label"], "Project");
    }

    #[test]
    fn test_json_document() {
        let doc = AclDocument::from_json_str(
            r#"{ "roles": { "foo": { "permissions": ["a.b"] }, "bare": {} }, "grants": { "bob": {} } }"#,
        )
        .unwrap();

        assert!(doc.default_role.is_none());
        assert!(doc.roles["bare"].permissions.is_empty());
        assert!(doc.grants.contains_key("bob"));
    }

    #[test]
    fn test_from_path_picks_format_by_extension() {
        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        toml_file.write_all(TOML_DOC.as_bytes()).unwrap();
        let doc = AclDocument::from_path(toml_file.path()).unwrap();
        assert_eq!(doc.roles.len(), 2);

        let mut json_file = NamedTempFile::new().unwrap();
        json_file.write_all(br#"{ "default_role": "anon" }"#).unwrap();
        let doc = AclDocument::from_path(json_file.path()).unwrap();
        assert_eq!(doc.default_role.as_deref(), Some("anon"));
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            AclDocument::from_json_str(r#"{ "default_role": "" }"#),
            Err(AclError::Config(_))
        ));
        assert!(matches!(
            AclDocument::from_json_str(r#"{ "grants": { "": {} } }"#),
            Err(AclError::Config(_))
        ));
        assert!(matches!(AclDocument::from_json_str("not json"), Err(AclError::Json(_))));
        assert!(matches!(AclDocument::from_toml_str("roles = 3"), Err(AclError::Toml(_))));
        assert!(matches!(
            AclDocument::from_path("/nonexistent/acl.toml"),
            Err(AclError::Io(_))
        ));
    }
}
