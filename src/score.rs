//! Action relevance scoring
//!
//! Pure additive scorer, capped at 1.0. Missing or empty intent fields
//! contribute nothing to their term.

use crate::catalog::IntegrationAction;
use crate::intent::ParsedIntent;

/// Weight for an action-intent word appearing in the action name
const INTENT_WEIGHT: f32 = 0.4;
/// Weight for the entity type appearing in the action name
const ENTITY_WEIGHT: f32 = 0.4;
/// Weight for parameter-name overlap with the action schema
const PARAM_OVERLAP_WEIGHT: f32 = 0.2;

/// Score one action against a parsed intent, in `[0, 1]`
pub fn relevance(action: &IntegrationAction, intent: &ParsedIntent) -> f32 {
    let mut score = 0.0;
    let action_name = action.action.to_lowercase();

    if let Some(action_intent) = intent.action_intent.as_deref() {
        if !action_intent.is_empty() && action_name.contains(&action_intent.to_lowercase()) {
            score += INTENT_WEIGHT;
        }
    }

    if let Some(entity_type) = intent.entity_type.as_deref() {
        if !entity_type.is_empty() && action_name.contains(&entity_type.to_lowercase()) {
            score += ENTITY_WEIGHT;
        }
    }

    if !intent.parameters.is_empty() {
        let overlap = intent
            .parameters
            .keys()
            .filter(|name| action.spec(name).is_some())
            .count();
        score += PARAM_OVERLAP_WEIGHT * (overlap as f32 / intent.parameters.len() as f32);
    }

    score.min(1.0)
}
