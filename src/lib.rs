//! Weft - natural-language requests to integration workflows
//!
//! One request flows through a fixed pipeline: intent parsing, action
//! selection against the integration catalog, parameter generation from the
//! request and the workflow context, validation, bounded repair, and
//! workflow synthesis. The result is always a terminal
//! [`PipelineOutcome`], never a panic or a silent drop.

pub mod catalog;
pub mod context;
pub mod error;
pub mod generate;
pub mod intent;
pub mod nlu;
pub mod pipeline;
pub mod repair;
pub mod score;
pub mod select;
pub mod synthesize;
pub mod telemetry;
pub mod template;
pub mod validate;

pub use catalog::{Catalog, CatalogOptions, IntegrationAction, ParamInterface, ParamSpec};
pub use error::{FixSuggestion, WeftError};
pub use generate::{BoundParameter, Generation, ParamSource};
pub use intent::ParsedIntent;
pub use nlu::{create_parser, IntentParser};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutcome, PipelineStatus};
pub use select::{Selection, SelectionStatus};
pub use synthesize::{Synthesis, WorkflowDocument, WorkflowInput, WorkflowStep};
pub use telemetry::{MemorySink, StageRecord, TelemetrySink, TracingSink};
pub use template::{BoundValue, TemplateRef};
pub use validate::{Validation, ValidationIssue};
