//! Action selection
//!
//! Ranks a platform's catalog actions against a parsed intent and decides
//! whether the best match is trustworthy or needs clarification.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{Catalog, IntegrationAction};
use crate::intent::ParsedIntent;
use crate::score::relevance;

/// Best score must clear this to count as a confident match
const CONFIDENCE_FLOOR: f32 = 0.5;
/// Gap between 1st and 2nd below which we ask the user to pick
const CLARIFICATION_GAP: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    Success,
    LowConfidence,
    /// No platform identified, or no catalog actions for it.
    /// Terminal for the request.
    NoMatch,
}

/// Transient pairing of an action with its relevance, used during ranking
#[derive(Debug, Clone)]
pub struct ScoredAction {
    pub action: Arc<IntegrationAction>,
    pub relevance: f32,
}

/// Outcome of action selection
#[derive(Debug, Clone)]
pub struct Selection {
    pub status: SelectionStatus,
    pub action: Option<Arc<IntegrationAction>>,
    pub confidence: f32,
    /// Runners-up shown to the user when clarification is needed
    pub alternatives: Vec<Arc<IntegrationAction>>,
    pub needs_clarification: bool,
}

impl Selection {
    fn no_match() -> Self {
        Self {
            status: SelectionStatus::NoMatch,
            action: None,
            confidence: 0.0,
            alternatives: vec![],
            needs_clarification: false,
        }
    }
}

/// Rank all of a platform's actions against the intent.
///
/// Deterministic: equal scores keep catalog order (stable sort, so the
/// first-registered action wins ties).
pub fn select(intent: &ParsedIntent, catalog: &Catalog) -> Selection {
    let Some(platform) = intent.platform.as_deref().filter(|p| !p.is_empty()) else {
        tracing::debug!("no platform identified in intent");
        return Selection::no_match();
    };

    let candidates = catalog.for_platform(platform);
    if candidates.is_empty() {
        tracing::debug!(platform, "no catalog actions for platform");
        return Selection::no_match();
    }

    let mut scored: Vec<ScoredAction> = candidates
        .into_iter()
        .map(|action| ScoredAction {
            relevance: relevance(&action, intent),
            action,
        })
        .collect();
    scored.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(Ordering::Equal)
    });

    let best = &scored[0];
    let status = if best.relevance > CONFIDENCE_FLOOR {
        SelectionStatus::Success
    } else {
        SelectionStatus::LowConfidence
    };

    let needs_clarification =
        scored.len() > 1 && (scored[0].relevance - scored[1].relevance) < CLARIFICATION_GAP;
    let alternatives = if needs_clarification {
        scored
            .iter()
            .skip(1)
            .take(2)
            .map(|s| Arc::clone(&s.action))
            .collect()
    } else {
        vec![]
    };

    tracing::debug!(
        platform,
        action = %best.action.action,
        relevance = best.relevance,
        needs_clarification,
        "action selected"
    );

    Selection {
        status,
        confidence: best.relevance,
        action: Some(Arc::clone(&best.action)),
        alternatives,
        needs_clarification,
    }
}
