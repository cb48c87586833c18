//! Repair engine
//!
//! Synthesizes placeholder bindings for missing required parameters and turns
//! every validation issue into a human-readable suggestion. Type mismatches
//! are never auto-corrected: guessing a corrected value would silently change
//! user intent, so those issues surface as suggestions only.

use std::collections::HashSet;

use crate::error::WeftError;
use crate::generate::{BoundParameter, ParamSource};
use crate::template::{BoundValue, TemplateRef};
use crate::validate::{IssueKind, Validation};

const DEFAULT_SUGGESTION: &str = "Please check this parameter";

/// Result of one repair pass
#[derive(Debug, Clone)]
pub struct Repair {
    /// Full binding set for the retry: existing bindings untouched,
    /// placeholders appended
    pub parameters: Vec<BoundParameter>,
    /// One line per validation issue, `"{parameter}: {suggestion}"`
    pub suggestions: Vec<String>,
    /// Whether any placeholder binding was injected
    pub applied: bool,
}

/// Repair a failed validation.
///
/// Idempotent with respect to placeholders: a parameter that already has a
/// binding of any source (including an earlier repair) is not repaired
/// again, so re-running on an unchanged issue list cannot duplicate
/// bindings.
pub fn repair(validation: &Validation, parameters: &[BoundParameter]) -> Result<Repair, WeftError> {
    let mut repaired = parameters.to_vec();
    let mut bound: HashSet<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
    let mut suggestions = Vec::new();
    let mut applied = false;

    for issue in &validation.issues {
        suggestions.push(format!(
            "{}: {}",
            issue.parameter,
            issue.suggestion.as_deref().unwrap_or(DEFAULT_SUGGESTION)
        ));

        if issue.kind != IssueKind::MissingRequired {
            continue;
        }
        if bound.contains(issue.parameter.as_str()) {
            tracing::debug!(parameter = %issue.parameter, "already bound, skipping repair");
            continue;
        }

        repaired.push(BoundParameter {
            name: issue.parameter.clone(),
            value: BoundValue::Template(TemplateRef::placeholder(issue.parameter.clone())?),
            source: ParamSource::Repair,
        });
        bound.insert(issue.parameter.as_str());
        applied = true;
    }

    if applied {
        tracing::info!(
            placeholders = repaired.len() - parameters.len(),
            "injected placeholder bindings"
        );
    }

    Ok(Repair {
        parameters: repaired,
        suggestions,
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationIssue;
    use serde_json::json;

    fn missing(parameter: &str) -> ValidationIssue {
        ValidationIssue {
            parameter: parameter.into(),
            kind: IssueKind::MissingRequired,
            error: "Required parameter is missing".into(),
            suggestion: Some("Please provide a value for this parameter".into()),
        }
    }

    fn type_error(parameter: &str) -> ValidationIssue {
        ValidationIssue {
            parameter: parameter.into(),
            kind: IssueKind::NotANumber,
            error: "Expected a number, got: abc".into(),
            suggestion: None,
        }
    }

    #[test]
    fn test_missing_required_gets_placeholder() {
        let validation = Validation {
            issues: vec![missing("channel")],
        };
        let r = repair(&validation, &[]).unwrap();
        assert!(r.applied);
        assert_eq!(r.parameters.len(), 1);
        let p = &r.parameters[0];
        assert_eq!(p.name, "channel");
        assert_eq!(p.source, ParamSource::Repair);
        assert_eq!(p.value.to_wire(), json!("{{channel}}"));
        assert_eq!(
            r.suggestions,
            vec!["channel: Please provide a value for this parameter"]
        );
    }

    #[test]
    fn test_type_error_gets_suggestion_only() {
        let validation = Validation {
            issues: vec![type_error("count")],
        };
        let existing = vec![BoundParameter {
            name: "count".into(),
            value: BoundValue::Literal(json!("abc")),
            source: ParamSource::UserRequest,
        }];
        let r = repair(&validation, &existing).unwrap();
        assert!(!r.applied);
        // Existing binding untouched, nothing appended
        assert_eq!(r.parameters.len(), 1);
        assert_eq!(r.parameters[0].value.to_wire(), json!("abc"));
        assert_eq!(r.suggestions, vec![format!("count: {DEFAULT_SUGGESTION}")]);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let validation = Validation {
            issues: vec![missing("channel")],
        };
        let first = repair(&validation, &[]).unwrap();
        // Same unchanged issue list against the already-repaired set
        let second = repair(&validation, &first.parameters).unwrap();
        assert!(!second.applied);
        assert_eq!(second.parameters.len(), 1);
    }

    #[test]
    fn test_duplicate_issues_one_placeholder() {
        let validation = Validation {
            issues: vec![missing("channel"), missing("channel")],
        };
        let r = repair(&validation, &[]).unwrap();
        assert_eq!(r.parameters.len(), 1);
        assert_eq!(r.suggestions.len(), 2);
    }
}
