//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
/// Some variants are only constructed in library code/tests.
#[derive(Error, Debug)]
pub enum WeftError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Catalog errors (WEFT-010 to WEFT-012)
    // ─────────────────────────────────────────────────────────────

    #[error("WEFT-010: Catalog is not a JSON array of actions: {details}")]
    CatalogShape { details: String },

    #[error("WEFT-011: Duplicate action '{action}' for integration '{integration}'")]
    DuplicateAction { integration: String, action: String },

    #[error("WEFT-012: Context document is not a JSON object")]
    ContextShape,

    // ─────────────────────────────────────────────────────────────
    // Collaborator errors (WEFT-020 to WEFT-022)
    // ─────────────────────────────────────────────────────────────

    #[error("WEFT-020: Intent parser '{name}' failed: {details}")]
    Parser { name: String, details: String },

    #[error("WEFT-021: Unknown intent parser: '{name}'")]
    UnknownParser { name: String },

    #[error("WEFT-022: Invalid parser endpoint '{endpoint}': {details}")]
    ParserEndpoint { endpoint: String, details: String },

    // ─────────────────────────────────────────────────────────────
    // Template errors (WEFT-030)
    // ─────────────────────────────────────────────────────────────

    #[error("WEFT-030: Name '{name}' contains template delimiter characters")]
    TemplateName { name: String },
}

impl FixSuggestion for WeftError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            WeftError::JsonParse(_) => Some("Check JSON syntax: quoting and trailing commas"),
            WeftError::Io(_) => Some("Check file path and permissions"),
            WeftError::CatalogShape { .. } => {
                Some("Catalog must be a JSON array of {integration, action, inputs_schema, definition} objects")
            }
            WeftError::DuplicateAction { .. } => {
                Some("Each integration+action pair must appear once in the catalog")
            }
            WeftError::ContextShape => {
                Some("Context must be a JSON object mapping variable names to values")
            }
            WeftError::Parser { .. } => {
                Some("Check the parser's API key env var and network access, or use --parser keyword")
            }
            WeftError::UnknownParser { .. } => Some("Available parsers: keyword, openai, mock"),
            WeftError::ParserEndpoint { .. } => Some("Use an http:// or https:// endpoint URL"),
            WeftError::TemplateName { .. } => {
                Some("Remove '{' and '}' from parameter and variable names")
            }
        }
    }
}
