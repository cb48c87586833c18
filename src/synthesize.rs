//! Workflow synthesis
//!
//! Assembles transformation steps (JSON parsing, data mapping) and the final
//! integration-call step into an executable workflow document, plus the
//! user-facing input schema and a plain-text explanation.
//!
//! The generated `code` step bodies mirror what the downstream engine
//! executes today; their contract is the declared inputs and outputs
//! (parameter names, root variable, dotted path, null-on-failure), not the
//! exact code text.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::catalog::{IntegrationAction, ParamInterface};
use crate::error::WeftError;
use crate::generate::{BoundParameter, ParamSource};
use crate::template::TemplateRef;

/// Workflow step kinds emitted by this core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Code,
    Integration,
}

/// One step of the synthesized workflow
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStep {
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub config: Value,
}

/// One user-facing input declaration
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowInput {
    pub name: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub input_type: String,
    pub label: String,
    pub group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// The synthesized output document, immutable once returned
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDocument {
    pub input_schema: Vec<WorkflowInput>,
    pub definition: Vec<WorkflowStep>,
}

impl WorkflowDocument {
    /// Structural sanity checks run at final output: definition present,
    /// every step carrying a name and a config
    pub fn structural_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.definition.is_empty() {
            warnings.push("Definition is empty".to_string());
        }
        for (i, step) in self.definition.iter().enumerate() {
            if step.name.is_empty() {
                warnings.push(format!("Step {i} missing name"));
            }
            if step.config.is_null() {
                warnings.push(format!("Step {i} missing config"));
            }
        }
        warnings
    }

    fn integration_config_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for step in &self.definition {
            if step.step_type != StepType::Integration {
                continue;
            }
            for section in ["parameters", "dynamic"] {
                if let Some(Value::Object(map)) = step.config.get(section) {
                    keys.extend(map.keys().cloned());
                }
            }
        }
        keys
    }
}

/// Transformations a workflow may need before the integration call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    JsonParsing,
    DataMapping,
}

impl std::fmt::Display for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transformation::JsonParsing => write!(f, "JSON parsing"),
            Transformation::DataMapping => write!(f, "Data mapping"),
        }
    }
}

/// Result of synthesis
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub workflow: WorkflowDocument,
    pub transformations: Vec<Transformation>,
    pub explanation: String,
}

/// How each parameter reaches the integration step
struct Analysis {
    /// Names routed through the json_parser step
    json_params: Vec<usize>,
    /// Names routed through the data_mapper step
    mapping_params: Vec<usize>,
}

/// Classify parameters needing transformation. The two classifications are
/// independent and non-exclusive; both are always checked.
fn analyze(action: &IntegrationAction, parameters: &[BoundParameter]) -> Analysis {
    let mut json_params = Vec::new();
    let mut mapping_params = Vec::new();

    for (i, p) in parameters.iter().enumerate() {
        let interface = action
            .spec(&p.name)
            .map(|s| s.interface)
            .unwrap_or_default();
        let wire = p.value.to_wire();

        if interface == ParamInterface::Json
            && wire.is_string()
            && p.source != ParamSource::UserRequest
        {
            json_params.push(i);
        }

        if p.source == ParamSource::Context
            && wire.as_str().is_some_and(|s| s.contains('.'))
        {
            mapping_params.push(i);
        }
    }

    Analysis {
        json_params,
        mapping_params,
    }
}

fn json_parser_step(parameters: &[BoundParameter], indices: &[usize]) -> WorkflowStep {
    let mut code = String::from("import json\n\n# Parse JSON parameters\nparsed_params = {}\n");
    for &i in indices {
        let p = &parameters[i];
        let wire = p.value.wire_display();
        code.push_str(&format!(
            "\ntry:\n    parsed_params['{name}'] = json.loads({wire})\nexcept:\n    parsed_params['{name}'] = {wire}\n",
            name = p.name,
        ));
    }
    code.push_str("\nreturn parsed_params\n");

    WorkflowStep {
        name: "json_parser".to_string(),
        step_type: StepType::Code,
        config: json!({"language": "python", "function": code}),
    }
}

fn data_mapper_step(parameters: &[BoundParameter], indices: &[usize]) -> WorkflowStep {
    let mut code = String::from("# Extract and map data from context\nmapped_params = {}\n");
    for &i in indices {
        let p = &parameters[i];
        // Dotted path from the tagged reference; literal strings fall back
        // to stripping the wire delimiters
        let path = match p.value.as_template().and_then(TemplateRef::context_path) {
            Some(path) => path.to_string(),
            None => p
                .value
                .wire_display()
                .trim_matches(|c| c == '{' || c == '}')
                .to_string(),
        };
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or_default().to_string();
        let rest: Vec<String> = segments.map(str::to_string).collect();
        code.push_str(&format!(
            "\n# Extract {name} from {wire}\ntry:\n    value = {root}\n    for key in {rest:?}:\n        value = value.get(key, None) if isinstance(value, dict) else getattr(value, key, None)\n    mapped_params['{name}'] = value\nexcept:\n    mapped_params['{name}'] = None\n",
            name = p.name,
            wire = p.value.wire_display(),
        ));
    }
    code.push_str("\nreturn mapped_params\n");

    WorkflowStep {
        name: "data_mapper".to_string(),
        step_type: StepType::Code,
        config: json!({"language": "python", "function": code}),
    }
}

fn integration_step(
    action: &IntegrationAction,
    parameters: &[BoundParameter],
    analysis: &Analysis,
) -> Result<WorkflowStep, WeftError> {
    let mut params = Map::new();
    for (i, p) in parameters.iter().enumerate() {
        // json_parser wins when a parameter matched both classifications
        let value = if analysis.json_params.contains(&i) {
            Value::String(TemplateRef::step_output("json_parser", p.name.clone())?.render())
        } else if analysis.mapping_params.contains(&i) {
            Value::String(TemplateRef::step_output("data_mapper", p.name.clone())?.render())
        } else {
            p.value.to_wire()
        };
        params.insert(p.name.clone(), value);
    }

    let auth_ref = TemplateRef::placeholder(auth_input_name(action))?;
    let mut config = Map::new();
    config.insert("integration".to_string(), Value::String(auth_ref.render()));
    config.insert("action".to_string(), Value::String(action.action.clone()));
    // Catalog-driven naming convention: some integrations expect their
    // parameters nested under `dynamic` instead of `parameters`
    let section = if action.uses_dynamic_config {
        "dynamic"
    } else {
        "parameters"
    };
    config.insert(section.to_string(), Value::Object(params));

    Ok(WorkflowStep {
        name: format!(
            "{}_{}",
            action.integration,
            action.action.to_lowercase().replace(' ', "_")
        ),
        step_type: StepType::Integration,
        config: Value::Object(config),
    })
}

fn auth_input_name(action: &IntegrationAction) -> String {
    format!("{}_integration", action.integration)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn input_schema(
    action: &IntegrationAction,
    parameters: &[BoundParameter],
) -> Vec<WorkflowInput> {
    let mut inputs = Vec::new();

    // Authentication slot always comes first
    inputs.push(WorkflowInput {
        name: auth_input_name(action),
        required: true,
        input_type: "integration".to_string(),
        label: format!("{} Integration", title_case(&action.integration)),
        group_id: "authentication".to_string(),
        placeholder: None,
        test_value: None,
        options: None,
    });

    // Only user-supplied parameters become user inputs; context, default and
    // repair bindings are resolved automatically
    for p in parameters {
        if p.source != ParamSource::UserRequest {
            continue;
        }
        let Some(spec) = action.spec(&p.name) else {
            continue;
        };
        inputs.push(WorkflowInput {
            name: p.name.clone(),
            required: spec.required,
            input_type: spec.interface.as_str().to_string(),
            label: spec.display_label().to_string(),
            group_id: "parameters".to_string(),
            placeholder: spec.hint.clone(),
            test_value: Some(p.value.to_wire()),
            options: spec.options.clone(),
        });
    }

    inputs
}

fn explanation(
    action: &IntegrationAction,
    parameters: &[BoundParameter],
    transformations: &[Transformation],
) -> String {
    let mut text = format!(
        "Generated workflow for {} - {}:\n\nParameter Mappings:\n",
        action.integration, action.action
    );
    for p in parameters {
        text.push_str(&format!(
            "  \u{2022} {}: {} (from {})\n",
            p.name,
            p.value.wire_display(),
            p.source
        ));
    }

    if !transformations.is_empty() {
        text.push_str("\nTransformations Applied:\n");
        for t in transformations {
            text.push_str(&format!("  \u{2022} {t}\n"));
        }
    }

    text.push_str("\nWorkflow Steps:\n");
    let mut step_count = 1;
    if transformations.contains(&Transformation::JsonParsing) {
        text.push_str(&format!("  {step_count}. Parse JSON parameters\n"));
        step_count += 1;
    }
    if transformations.contains(&Transformation::DataMapping) {
        text.push_str(&format!("  {step_count}. Map data from context variables\n"));
        step_count += 1;
    }
    text.push_str(&format!("  {step_count}. Execute {} action\n", action.action));

    text
}

/// Assemble the workflow document for a validated parameter set
pub fn synthesize(
    action: &IntegrationAction,
    parameters: &[BoundParameter],
) -> Result<Synthesis, WeftError> {
    let analysis = analyze(action, parameters);

    let mut steps = Vec::new();
    let mut transformations = Vec::new();
    if !analysis.json_params.is_empty() {
        steps.push(json_parser_step(parameters, &analysis.json_params));
        transformations.push(Transformation::JsonParsing);
    }
    if !analysis.mapping_params.is_empty() {
        steps.push(data_mapper_step(parameters, &analysis.mapping_params));
        transformations.push(Transformation::DataMapping);
    }
    steps.push(integration_step(action, parameters, &analysis)?);

    let workflow = WorkflowDocument {
        input_schema: input_schema(action, parameters),
        definition: steps,
    };
    let explanation = explanation(action, parameters, &transformations);

    tracing::debug!(
        steps = workflow.definition.len(),
        inputs = workflow.input_schema.len(),
        ?transformations,
        "workflow synthesized"
    );

    Ok(Synthesis {
        workflow,
        transformations,
        explanation,
    })
}

/// Optional schema parameters absent from both the input schema and the
/// integration step config
pub fn unused_optional_params(
    action: &IntegrationAction,
    workflow: &WorkflowDocument,
) -> Vec<String> {
    let mut used: Vec<String> = workflow.input_schema.iter().map(|i| i.name.clone()).collect();
    used.extend(workflow.integration_config_keys());

    action
        .inputs_schema
        .iter()
        .filter(|spec| !spec.required && !used.contains(&spec.name))
        .map(|spec| spec.name.clone())
        .collect()
}
