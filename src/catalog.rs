//! Integration action catalog
//!
//! Loaded once at startup from a JSON array and immutable thereafter.
//! Entries are Arc-wrapped so selection results can share them cheaply.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WeftError;

/// Parameter interface kinds declared by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamInterface {
    ShortText,
    LongText,
    Json,
    SingleSelect,
    Number,
    Integration,
}

impl Default for ParamInterface {
    fn default() -> Self {
        ParamInterface::ShortText
    }
}

impl ParamInterface {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamInterface::ShortText => "short_text",
            ParamInterface::LongText => "long_text",
            ParamInterface::Json => "json",
            ParamInterface::SingleSelect => "single_select",
            ParamInterface::Number => "number",
            ParamInterface::Integration => "integration",
        }
    }
}

/// One declared parameter of an integration action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(default)]
    pub interface: ParamInterface,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_group")]
    pub group_id: String,
    #[serde(default)]
    pub test_value: Option<Value>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

fn default_group() -> String {
    "no-group".to_string()
}

impl ParamSpec {
    /// Label to show users, falling back to the parameter name
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Catalog entry as it appears in the JSON document
#[derive(Debug, Deserialize)]
struct ActionRaw {
    integration: String,
    action: String,
    #[serde(default)]
    inputs_schema: Vec<ParamSpec>,
    #[serde(default)]
    definition: Value,
    /// Explicit override for the `dynamic` config convention
    #[serde(default)]
    uses_dynamic_config: Option<bool>,
}

/// One addressable operation on a third-party platform
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationAction {
    pub integration: String,
    pub action: String,
    pub inputs_schema: Vec<ParamSpec>,
    /// Opaque platform-specific execution template, passed through unmodified
    pub definition: Value,
    /// Whether the integration step nests parameters under a `dynamic` key
    pub uses_dynamic_config: bool,
}

impl IntegrationAction {
    /// Look up a parameter spec by name
    pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.inputs_schema.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.inputs_schema.iter().filter(|p| p.required)
    }
}

/// Catalog load options
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Integrations whose steps nest parameters under `dynamic` when the
    /// entry carries no explicit `uses_dynamic_config` flag
    pub dynamic_config_integrations: HashSet<String>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        let dynamic_config_integrations = ["webflow_v2", "contentful", "notion"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            dynamic_config_integrations,
        }
    }
}

/// Immutable table of integration actions, stable in catalog order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    actions: Vec<Arc<IntegrationAction>>,
}

impl Catalog {
    /// Build from already-resolved actions (for tests and embedding)
    pub fn from_actions(actions: Vec<IntegrationAction>) -> Result<Self, WeftError> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for a in &actions {
            let key = (a.integration.to_lowercase(), a.action.to_lowercase());
            if !seen.insert(key) {
                return Err(WeftError::DuplicateAction {
                    integration: a.integration.clone(),
                    action: a.action.clone(),
                });
            }
        }
        Ok(Self {
            actions: actions.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a JSON catalog document
    pub fn from_json_str(json: &str, options: &CatalogOptions) -> Result<Self, WeftError> {
        let raw: Vec<ActionRaw> = serde_json::from_str(json).map_err(|e| WeftError::CatalogShape {
            details: e.to_string(),
        })?;

        let actions = raw
            .into_iter()
            .map(|r| {
                let uses_dynamic_config = r.uses_dynamic_config.unwrap_or_else(|| {
                    options
                        .dynamic_config_integrations
                        .contains(&r.integration.to_lowercase())
                });
                IntegrationAction {
                    integration: r.integration,
                    action: r.action,
                    inputs_schema: r.inputs_schema,
                    definition: r.definition,
                    uses_dynamic_config,
                }
            })
            .collect();

        Self::from_actions(actions)
    }

    /// Load a catalog file
    pub fn from_file(path: &Path, options: &CatalogOptions) -> Result<Self, WeftError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json, options)?;
        tracing::info!(
            path = %path.display(),
            actions = catalog.len(),
            platforms = catalog.platforms().len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Actions for one platform, case-insensitive, in catalog order
    pub fn for_platform(&self, platform: &str) -> Vec<Arc<IntegrationAction>> {
        let platform = platform.to_lowercase();
        self.actions
            .iter()
            .filter(|a| a.integration.to_lowercase() == platform)
            .cloned()
            .collect()
    }

    /// Unique platform names in first-seen order
    pub fn platforms(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for a in &self.actions {
            if seen.insert(a.integration.to_lowercase()) {
                out.push(a.integration.clone());
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<IntegrationAction>> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"[
        {
            "integration": "slack",
            "action": "Send Message",
            "definition": [],
            "inputs_schema": [
                {"name": "channel", "interface": "short_text", "label": "Channel", "required": true},
                {"name": "message", "interface": "long_text", "label": "Message"}
            ]
        },
        {
            "integration": "notion",
            "action": "Create Page",
            "definition": [],
            "inputs_schema": []
        },
        {
            "integration": "Slack",
            "action": "List Channels",
            "definition": [],
            "inputs_schema": []
        }
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_json_str(CATALOG_JSON, &CatalogOptions::default()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.platforms(), vec!["slack", "notion"]);
    }

    #[test]
    fn test_platform_filter_case_insensitive() {
        let catalog = Catalog::from_json_str(CATALOG_JSON, &CatalogOptions::default()).unwrap();
        let slack = catalog.for_platform("SLACK");
        assert_eq!(slack.len(), 2);
        // Catalog order preserved
        assert_eq!(slack[0].action, "Send Message");
        assert_eq!(slack[1].action, "List Channels");
    }

    #[test]
    fn test_dynamic_config_defaults() {
        let catalog = Catalog::from_json_str(CATALOG_JSON, &CatalogOptions::default()).unwrap();
        let notion = &catalog.for_platform("notion")[0];
        assert!(notion.uses_dynamic_config);
        let slack = &catalog.for_platform("slack")[0];
        assert!(!slack.uses_dynamic_config);
    }

    #[test]
    fn test_explicit_dynamic_config_override() {
        let json = r#"[
            {"integration": "notion", "action": "Create Page", "definition": [],
             "inputs_schema": [], "uses_dynamic_config": false}
        ]"#;
        let catalog = Catalog::from_json_str(json, &CatalogOptions::default()).unwrap();
        assert!(!catalog.for_platform("notion")[0].uses_dynamic_config);
    }

    #[test]
    fn test_duplicate_within_platform_rejected() {
        let json = r#"[
            {"integration": "slack", "action": "Send Message", "definition": [], "inputs_schema": []},
            {"integration": "SLACK", "action": "send message", "definition": [], "inputs_schema": []}
        ]"#;
        let err = Catalog::from_json_str(json, &CatalogOptions::default()).unwrap_err();
        assert!(matches!(err, WeftError::DuplicateAction { .. }));
    }

    #[test]
    fn test_param_defaults() {
        let catalog = Catalog::from_json_str(CATALOG_JSON, &CatalogOptions::default()).unwrap();
        let slack = &catalog.for_platform("slack")[0];
        let msg = slack.spec("message").unwrap();
        assert!(!msg.required);
        assert_eq!(msg.group_id, "no-group");
        assert_eq!(msg.interface, ParamInterface::LongText);
    }

    #[test]
    fn test_non_array_catalog_rejected() {
        let err = Catalog::from_json_str("{}", &CatalogOptions::default()).unwrap_err();
        assert!(matches!(err, WeftError::CatalogShape { .. }));
    }
}
