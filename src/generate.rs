//! Parameter generation
//!
//! Binds schema-declared parameters to values from three competing sources,
//! in strict precedence: explicit user text, then workflow context variables,
//! then schema defaults. Required parameters that resolve nowhere are
//! recorded as missing and drive the repair path.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::IntegrationAction;
use crate::template::{BoundValue, TemplateRef};

/// Provenance of a bound parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSource {
    UserRequest,
    Context,
    Default,
    Repair,
}

impl std::fmt::Display for ParamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParamSource::UserRequest => "user_request",
            ParamSource::Context => "context",
            ParamSource::Default => "default",
            ParamSource::Repair => "repair",
        };
        write!(f, "{s}")
    }
}

/// One resolved parameter. Never mutated after creation; repair appends new
/// bindings rather than editing existing ones.
#[derive(Debug, Clone)]
pub struct BoundParameter {
    pub name: String,
    pub value: BoundValue,
    pub source: ParamSource,
}

/// Result of one generation pass
#[derive(Debug, Clone)]
pub struct Generation {
    pub parameters: Vec<BoundParameter>,
    /// Required parameters with no binding, in schema order
    pub missing: Vec<String>,
    /// Coverage of required parameters, in `[0, 1]`
    pub confidence: f32,
}

/// Bind every schema parameter, in declared order, first source wins.
///
/// Context matching scans keys in map iteration order (sorted by key for
/// `serde_json::Map`) and takes the first key that contains the lowercased
/// parameter name. Keys carrying template delimiter characters are skipped.
pub fn generate(
    action: &IntegrationAction,
    context: &Map<String, Value>,
    extracted: &Map<String, Value>,
) -> Generation {
    let mut parameters = Vec::new();
    let mut missing = Vec::new();

    for spec in &action.inputs_schema {
        // 1. Explicit value extracted from the user request
        if let Some(value) = extracted.get(&spec.name) {
            parameters.push(BoundParameter {
                name: spec.name.clone(),
                value: BoundValue::Literal(value.clone()),
                source: ParamSource::UserRequest,
            });
            continue;
        }

        // 2. Context variable whose key contains the parameter name
        let needle = spec.name.to_lowercase();
        let context_match = context.keys().find_map(|key| {
            if !key.to_lowercase().contains(&needle) {
                return None;
            }
            match TemplateRef::context(key.clone()) {
                Ok(t) => Some(t),
                Err(_) => {
                    tracing::warn!(key, "skipping context variable with template delimiters");
                    None
                }
            }
        });
        if let Some(template) = context_match {
            parameters.push(BoundParameter {
                name: spec.name.clone(),
                value: BoundValue::Template(template),
                source: ParamSource::Context,
            });
            continue;
        }

        // 3. Required goes to the missing list; optional falls back to the
        //    schema test value, or stays silently unbound.
        if spec.required {
            missing.push(spec.name.clone());
        } else if let Some(test_value) = &spec.test_value {
            parameters.push(BoundParameter {
                name: spec.name.clone(),
                value: BoundValue::Literal(test_value.clone()),
                source: ParamSource::Default,
            });
        }
    }

    let required = action.required_params().count();
    let confidence = if required == 0 {
        1.0
    } else {
        (required - missing.len()) as f32 / required as f32
    };

    Generation {
        parameters,
        missing,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ParamInterface, ParamSpec};
    use serde_json::json;

    fn spec(name: &str, required: bool, test_value: Option<Value>) -> ParamSpec {
        ParamSpec {
            name: name.into(),
            interface: ParamInterface::ShortText,
            label: String::new(),
            hint: None,
            required,
            group_id: "no-group".into(),
            test_value,
            options: None,
        }
    }

    fn action(specs: Vec<ParamSpec>) -> IntegrationAction {
        IntegrationAction {
            integration: "webflow_v2".into(),
            action: "Create Collection Item".into(),
            inputs_schema: specs,
            definition: Value::Array(vec![]),
            uses_dynamic_config: true,
        }
    }

    fn map(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_user_request_beats_context() {
        let a = action(vec![spec("title", true, None)]);
        let context = map(&[("step_1.title_output", json!("Y"))]);
        let extracted = map(&[("title", json!("X"))]);

        let g = generate(&a, &context, &extracted);
        assert_eq!(g.parameters.len(), 1);
        let p = &g.parameters[0];
        assert_eq!(p.source, ParamSource::UserRequest);
        assert_eq!(p.value, BoundValue::Literal(json!("X")));
        assert!(g.missing.is_empty());
    }

    #[test]
    fn test_context_substring_match_binds_template() {
        let a = action(vec![spec("keyword", true, None)]);
        let context = map(&[("step_1.output.keyword", json!("seo"))]);

        let g = generate(&a, &context, &Map::new());
        let p = &g.parameters[0];
        assert_eq!(p.source, ParamSource::Context);
        assert_eq!(p.value.to_wire(), json!("{{step_1.output.keyword}}"));
    }

    #[test]
    fn test_first_matching_context_key_wins() {
        let a = action(vec![spec("title", false, None)]);
        // serde_json::Map iterates sorted by key
        let context = map(&[
            ("b_title_late", json!(2)),
            ("a_title_early", json!(1)),
        ]);
        let g = generate(&a, &context, &Map::new());
        assert_eq!(g.parameters[0].value.to_wire(), json!("{{a_title_early}}"));
    }

    #[test]
    fn test_missing_required_and_confidence() {
        let a = action(vec![spec("channel", true, None), spec("message", true, None)]);
        let context = map(&[("step_1.output.message_text", json!("hi"))]);
        let g = generate(&a, &context, &Map::new());
        assert_eq!(g.missing, vec!["channel".to_string()]);
        assert!((g.confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_no_required_params_full_confidence() {
        let a = action(vec![spec("note", false, None)]);
        let g = generate(&a, &Map::new(), &Map::new());
        assert_eq!(g.confidence, 1.0);
        assert!(g.parameters.is_empty());
        assert!(g.missing.is_empty());
    }

    #[test]
    fn test_optional_falls_back_to_test_value() {
        let a = action(vec![spec("live", false, Some(json!(false)))]);
        let g = generate(&a, &Map::new(), &Map::new());
        let p = &g.parameters[0];
        assert_eq!(p.source, ParamSource::Default);
        assert_eq!(p.value, BoundValue::Literal(json!(false)));
    }

    #[test]
    fn test_context_key_with_braces_is_skipped() {
        let a = action(vec![spec("title", false, Some(json!("fallback")))]);
        let context = map(&[("{{title}}", json!("evil"))]);
        let g = generate(&a, &context, &Map::new());
        // Falls through to the schema default instead of binding the bad key
        assert_eq!(g.parameters[0].source, ParamSource::Default);
    }
}
