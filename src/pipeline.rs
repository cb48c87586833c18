//! Request pipeline
//!
//! Drives one natural-language request through parse, select, generate,
//! validate, repair and synthesize, and folds the stage results into a
//! single [`PipelineOutcome`]. The pipeline itself never returns `Err`:
//! every failure mode is a terminal outcome status, so a caller always gets
//! a reportable answer.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::Catalog;
use crate::context::resolve_path;
use crate::generate::{generate, BoundParameter, Generation, ParamSource};
use crate::nlu::IntentParser;
use crate::repair::repair;
use crate::select::{select, SelectionStatus};
use crate::synthesize::{synthesize, unused_optional_params, WorkflowDocument};
use crate::telemetry::{StageRecord, TelemetrySink, TracingSink};
use crate::template::TemplateRef;
use crate::validate::{validate, Validation};

/// Tunable pipeline thresholds
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Repair passes allowed before a still-invalid parameter set becomes
    /// terminal
    pub max_repair_attempts: usize,
    /// Coverage confidence required for a `Success` outcome
    pub success_threshold: f32,
    /// Below this, a review hint is added to the suggestions
    pub review_hint_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_repair_attempts: 1,
            success_threshold: 0.7,
            review_hint_threshold: 0.8,
        }
    }
}

/// Terminal status of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// Workflow produced, confident and structurally clean
    Success,
    /// Workflow produced but the user should look it over
    NeedsReview,
    /// No usable action match; the user must disambiguate
    NeedsClarification,
    /// Validation still failing after the allowed repair attempts
    Unrepairable,
    /// A collaborator failed; nothing was produced
    Error,
}

/// Everything a caller learns about one request
#[derive(Debug, Serialize)]
pub struct PipelineOutcome {
    pub status: PipelineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub confidence: f32,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    /// Runner-up action names when clarification is needed
    pub alternatives: Vec<String>,
    /// Current values of the context variables bound into the workflow
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub context_preview: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineOutcome {
    fn error(message: String) -> Self {
        Self {
            status: PipelineStatus::Error,
            integration: None,
            action: None,
            workflow: None,
            explanation: None,
            confidence: 0.0,
            warnings: vec![],
            suggestions: vec![],
            alternatives: vec![],
            context_preview: Map::new(),
            error: Some(message),
        }
    }
}

/// Resolve the context paths bound into the parameter set to their current
/// values, so a caller can see what would actually feed the workflow
fn context_preview(
    context: &Map<String, Value>,
    parameters: &[BoundParameter],
) -> Map<String, Value> {
    let mut preview = Map::new();
    for p in parameters {
        if p.source != ParamSource::Context {
            continue;
        }
        let Some(path) = p.value.as_template().and_then(TemplateRef::context_path) else {
            continue;
        };
        if let Some(value) = resolve_path(context, path) {
            preview.insert(path.to_string(), value.clone());
        }
    }
    preview
}

pub struct Pipeline {
    catalog: Catalog,
    parser: Box<dyn IntentParser>,
    telemetry: Arc<dyn TelemetrySink>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(catalog: Catalog, parser: Box<dyn IntentParser>) -> Self {
        Self {
            catalog,
            parser,
            telemetry: Arc::new(TracingSink),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    fn observe<T>(&self, stage: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        self.telemetry.record(StageRecord {
            stage,
            duration: start.elapsed(),
            success: true,
            error: None,
        });
        value
    }

    fn observe_failure(&self, stage: &'static str, start: Instant, error: &str) {
        self.telemetry.record(StageRecord {
            stage,
            duration: start.elapsed(),
            success: false,
            error: Some(error.to_string()),
        });
    }

    /// Process one request against the given workflow context
    pub async fn run(&self, request: &str, context: &Map<String, Value>) -> PipelineOutcome {
        tracing::info!(request, "pipeline started");

        // Parse: the only async, fallible collaborator call
        let platforms = self.catalog.platforms();
        let context_keys: Vec<String> = context.keys().cloned().collect();
        let start = Instant::now();
        let intent = match self.parser.parse(request, &platforms, &context_keys).await {
            Ok(intent) => {
                self.telemetry.record(StageRecord {
                    stage: "parse",
                    duration: start.elapsed(),
                    success: true,
                    error: None,
                });
                intent
            }
            Err(e) => {
                let message = format!("Intent parsing failed: {e:#}");
                self.observe_failure("parse", start, &message);
                tracing::error!(error = %message, "pipeline aborted");
                return PipelineOutcome::error(message);
            }
        };

        // Select
        let selection = self.observe("select", || select(&intent, &self.catalog));
        if selection.status == SelectionStatus::NoMatch {
            return PipelineOutcome {
                status: PipelineStatus::NeedsClarification,
                integration: intent.platform.clone(),
                action: None,
                workflow: None,
                explanation: None,
                confidence: 0.0,
                warnings: vec![],
                suggestions: vec![format!(
                    "No matching integration found. Available integrations: {}",
                    platforms.join(", ")
                )],
                alternatives: vec![],
                context_preview: Map::new(),
                error: None,
            };
        }
        // select() returned a non-terminal status, so an action is present
        let Some(action) = selection.action.clone() else {
            return PipelineOutcome::error("Selection produced no action".to_string());
        };
        // A weak sole candidate still produces a workflow; the coverage
        // confidence downgrades the final status instead. Only genuine
        // ambiguity stops here.
        if selection.needs_clarification {
            return PipelineOutcome {
                status: PipelineStatus::NeedsClarification,
                integration: Some(action.integration.clone()),
                action: Some(action.action.clone()),
                workflow: None,
                explanation: None,
                confidence: selection.confidence,
                warnings: vec![],
                suggestions: vec![format!(
                    "Did you mean '{}'? Please confirm or pick an alternative",
                    action.action
                )],
                alternatives: selection
                    .alternatives
                    .iter()
                    .map(|a| a.action.clone())
                    .collect(),
                context_preview: Map::new(),
                error: None,
            };
        }

        // Generate and validate
        let generation: Generation =
            self.observe("generate", || generate(&action, context, &intent.parameters));
        let mut parameters: Vec<BoundParameter> = generation.parameters.clone();
        let mut validation: Validation =
            self.observe("validate", || validate(&action, &parameters));

        // Repair: bounded, and pointless to retry once a pass changes nothing
        let mut suggestions: Vec<String> = Vec::new();
        let mut attempts = 0;
        while !validation.is_valid() && attempts < self.config.max_repair_attempts {
            attempts += 1;
            let start = Instant::now();
            let pass = match repair(&validation, &parameters) {
                Ok(pass) => {
                    self.telemetry.record(StageRecord {
                        stage: "repair",
                        duration: start.elapsed(),
                        success: true,
                        error: None,
                    });
                    pass
                }
                Err(e) => {
                    let message = format!("Repair failed: {e}");
                    self.observe_failure("repair", start, &message);
                    return PipelineOutcome::error(message);
                }
            };
            suggestions = pass.suggestions;
            if !pass.applied {
                break;
            }
            parameters = pass.parameters;
            validation = self.observe("validate", || validate(&action, &parameters));
        }

        let preview = context_preview(context, &parameters);

        if !validation.is_valid() {
            let warnings = validation.issues.iter().map(|i| {
                format!("{}: {}", i.parameter, i.error)
            });
            return PipelineOutcome {
                status: PipelineStatus::Unrepairable,
                integration: Some(action.integration.clone()),
                action: Some(action.action.clone()),
                workflow: None,
                explanation: None,
                confidence: generation.confidence,
                warnings: warnings.collect(),
                suggestions,
                alternatives: vec![],
                context_preview: preview,
                error: None,
            };
        }

        // Synthesize
        let start = Instant::now();
        let synthesis = match synthesize(&action, &parameters) {
            Ok(synthesis) => {
                self.telemetry.record(StageRecord {
                    stage: "synthesize",
                    duration: start.elapsed(),
                    success: true,
                    error: None,
                });
                synthesis
            }
            Err(e) => {
                let message = format!("Workflow synthesis failed: {e}");
                self.observe_failure("synthesize", start, &message);
                return PipelineOutcome::error(message);
            }
        };

        // Final verdict
        let warnings = synthesis.workflow.structural_warnings();
        for name in unused_optional_params(&action, &synthesis.workflow) {
            suggestions.push(format!("Consider using optional parameter: {name}"));
        }
        if generation.confidence < self.config.review_hint_threshold {
            suggestions.push("Review parameter mappings for accuracy".to_string());
        }

        let status = if generation.confidence >= self.config.success_threshold
            && warnings.is_empty()
        {
            PipelineStatus::Success
        } else {
            PipelineStatus::NeedsReview
        };

        tracing::info!(
            ?status,
            integration = %action.integration,
            action = %action.action,
            confidence = generation.confidence,
            "pipeline finished"
        );

        PipelineOutcome {
            status,
            integration: Some(action.integration.clone()),
            action: Some(action.action.clone()),
            workflow: Some(synthesis.workflow),
            explanation: Some(synthesis.explanation),
            confidence: generation.confidence,
            warnings,
            suggestions,
            alternatives: vec![],
            context_preview: preview,
            error: None,
        }
    }
}
