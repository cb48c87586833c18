//! Parameter validation
//!
//! Type/shape-checks bound parameters against the action schema. Every spec
//! is checked; the full issue list comes back regardless of how early the
//! first problem appears. Issues are data, not errors: validation never
//! fails, it reports.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::catalog::{IntegrationAction, ParamInterface, ParamSpec};
use crate::generate::BoundParameter;

/// What went wrong with one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingRequired,
    NotANumber,
    InvalidJson,
    NotAnOption,
}

/// One validation finding
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub parameter: String,
    pub kind: IssueKind,
    /// Human-readable error text
    pub error: String,
    pub suggestion: Option<String>,
}

/// Result of one validation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct Validation {
    pub issues: Vec<ValidationIssue>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate bound parameters against the schema, in schema order.
///
/// Duplicate bindings for one name are not rejected; the last write wins,
/// matching the lookup the downstream engine would build.
pub fn validate(action: &IntegrationAction, parameters: &[BoundParameter]) -> Validation {
    let mut lookup: HashMap<&str, Value> = HashMap::new();
    for p in parameters {
        lookup.insert(p.name.as_str(), p.value.to_wire());
    }

    let mut issues = Vec::new();
    for spec in &action.inputs_schema {
        let Some(value) = lookup.get(spec.name.as_str()) else {
            if spec.required {
                issues.push(ValidationIssue {
                    parameter: spec.name.clone(),
                    kind: IssueKind::MissingRequired,
                    error: "Required parameter is missing".to_string(),
                    suggestion: Some("Please provide a value for this parameter".to_string()),
                });
            }
            // Optional and absent: nothing to check
            continue;
        };

        if let Some(issue) = check_interface(spec, value) {
            issues.push(issue);
        }
    }

    Validation { issues }
}

fn check_interface(spec: &ParamSpec, value: &Value) -> Option<ValidationIssue> {
    match spec.interface {
        ParamInterface::Number if !is_number_like(value) => Some(ValidationIssue {
            parameter: spec.name.clone(),
            kind: IssueKind::NotANumber,
            error: format!("Expected a number, got: {}", display(value)),
            suggestion: Some("Please provide a numeric value".to_string()),
        }),
        ParamInterface::Json if !is_json_like(value) => Some(ValidationIssue {
            parameter: spec.name.clone(),
            kind: IssueKind::InvalidJson,
            error: format!("Expected valid JSON, got: {}", display(value)),
            suggestion: Some("Please provide a properly formatted JSON object".to_string()),
        }),
        ParamInterface::SingleSelect => {
            let options = spec.options.as_deref()?;
            if is_option_member(value, options) {
                None
            } else {
                Some(ValidationIssue {
                    parameter: spec.name.clone(),
                    kind: IssueKind::NotAnOption,
                    error: format!(
                        "Value '{}' not in allowed options: {:?}",
                        display(value),
                        options
                    ),
                    suggestion: Some(format!(
                        "Please select one of the allowed options: {options:?}"
                    )),
                })
            }
        }
        _ => None,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric JSON value, or a string that is an unsigned numeral with at most
/// one decimal point
fn is_number_like(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let stripped = s.replacen('.', "", 1);
            !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Already-structured value, or a string that parses as JSON
fn is_json_like(value: &Value) -> bool {
    match value {
        Value::Object(_) | Value::Array(_) => true,
        Value::String(s) => serde_json::from_str::<Value>(s).is_ok(),
        _ => false,
    }
}

fn is_option_member(value: &Value, options: &[String]) -> bool {
    match value {
        Value::String(s) => options.iter().any(|o| o == s),
        other => options.iter().any(|o| o == &other.to_string()),
    }
}
