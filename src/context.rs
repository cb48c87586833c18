//! Workflow context source
//!
//! A flat mapping from variable name to JSON value, produced by earlier
//! steps of an enclosing workflow. Names follow the `step_1.output.keyword`
//! dotted convention and double as paths into nested values.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::WeftError;

/// Parse a context document (must be a JSON object)
pub fn from_json_str(json: &str) -> Result<Map<String, Value>, WeftError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        _ => Err(WeftError::ContextShape),
    }
}

/// Load a context file
pub fn load_context(path: &Path) -> Result<Map<String, Value>, WeftError> {
    let json = std::fs::read_to_string(path)?;
    let context = from_json_str(&json)?;
    tracing::info!(path = %path.display(), variables = context.len(), "context loaded");
    Ok(context)
}

/// Resolve a dotted variable path against the context.
///
/// An exact flat key wins; otherwise the path is walked segment by segment
/// through nested objects. Any miss returns `None`.
pub fn resolve_path<'a>(context: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = context.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let mut current = context.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
