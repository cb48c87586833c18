//! Tagged template references
//!
//! Cross-step data passing uses `{{...}}` interpolation strings on the wire
//! (the downstream workflow engine's contract). Internally a reference is a
//! tagged variant, never a raw interpolated string, so a parameter or
//! variable name containing brace characters cannot smuggle extra template
//! syntax into the rendered output.

use crate::error::WeftError;
use serde_json::Value;

/// A reference to a value produced elsewhere in the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    /// Context variable, rendered as `{{step_1.output.keyword}}`
    ContextVar(String),
    /// Output of an earlier step, rendered as `{{json_parser.output['title']}}`
    StepOutput { step: String, name: String },
    /// Repair placeholder, rendered as `{{channel}}`
    Placeholder(String),
}

fn check_name(name: &str) -> Result<(), WeftError> {
    if name.contains('{') || name.contains('}') {
        return Err(WeftError::TemplateName {
            name: name.to_string(),
        });
    }
    Ok(())
}

impl TemplateRef {
    /// Reference a context variable by its (possibly dotted) name
    pub fn context(name: impl Into<String>) -> Result<Self, WeftError> {
        let name = name.into();
        check_name(&name)?;
        Ok(TemplateRef::ContextVar(name))
    }

    /// Reference a named output of an earlier step
    pub fn step_output(step: impl Into<String>, name: impl Into<String>) -> Result<Self, WeftError> {
        let step = step.into();
        let name = name.into();
        check_name(&step)?;
        check_name(&name)?;
        Ok(TemplateRef::StepOutput { step, name })
    }

    /// Placeholder for a value the user still has to supply
    pub fn placeholder(name: impl Into<String>) -> Result<Self, WeftError> {
        let name = name.into();
        check_name(&name)?;
        Ok(TemplateRef::Placeholder(name))
    }

    /// Render to the `{{...}}` wire syntax
    pub fn render(&self) -> String {
        match self {
            TemplateRef::ContextVar(name) => format!("{{{{{name}}}}}"),
            TemplateRef::StepOutput { step, name } => {
                format!("{{{{{step}.output['{name}']}}}}")
            }
            TemplateRef::Placeholder(name) => format!("{{{{{name}}}}}"),
        }
    }

    /// Dotted path of a context reference (`step_1.output.keyword`), if any
    pub fn context_path(&self) -> Option<&str> {
        match self {
            TemplateRef::ContextVar(name) => Some(name),
            _ => None,
        }
    }
}

/// A value bound to a parameter: either concrete or a template reference
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Literal(Value),
    Template(TemplateRef),
}

impl BoundValue {
    /// The JSON value that crosses the wire (templates become strings)
    pub fn to_wire(&self) -> Value {
        match self {
            BoundValue::Literal(v) => v.clone(),
            BoundValue::Template(t) => Value::String(t.render()),
        }
    }

    /// Wire value as a display string (objects/arrays are compact JSON)
    pub fn wire_display(&self) -> String {
        match self.to_wire() {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    pub fn as_template(&self) -> Option<&TemplateRef> {
        match self {
            BoundValue::Template(t) => Some(t),
            BoundValue::Literal(_) => None,
        }
    }
}

impl From<Value> for BoundValue {
    fn from(v: Value) -> Self {
        BoundValue::Literal(v)
    }
}
