use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};
use uuid::Uuid;

use super::message::{ActionTier, TechMessageRecord};

/// Which matching paths a search runs
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, EnumString, Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum MatchMode {
    Exact,
    Fuzzy,
    #[default]
    Both,
}

impl MatchMode {
    pub fn includes_exact(&self) -> bool {
        matches!(self, MatchMode::Exact | MatchMode::Both)
    }

    pub fn includes_fuzzy(&self) -> bool {
        matches!(self, MatchMode::Fuzzy | MatchMode::Both)
    }
}

/// How a result was produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MatchType {
    Exact,
    Fuzzy,
}

/// One search invocation's input
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub search_text: String,
    pub occurrence_count: Option<u32>,
    pub match_mode: MatchMode,
}

impl SearchQuery {
    pub fn new(search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            occurrence_count: None,
            match_mode: MatchMode::default(),
        }
    }

    pub fn with_occurrence_count(mut self, count: u32) -> Self {
        self.occurrence_count = Some(count);
        self
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }
}

/// One ranked result, produced fresh per query and never persisted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    /// Read-only view of the matched catalog record
    pub record: TechMessageRecord,

    pub match_type: MatchType,

    /// EXACT is always exactly 1.0; FUZZY is capped at 0.9 so exact
    /// results always outrank fuzzy ones
    pub match_score: f64,

    /// Substring the pattern matched; EXACT only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,

    /// Named-capture values; EXACT only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_variables: Option<HashMap<String, String>>,

    /// Tier selected for the supplied occurrence count, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<ActionTier>,

    /// Full tier list for display, regardless of recommendation
    pub all_action_tiers: Vec<ActionTier>,
}

impl SearchMatch {
    pub fn record_id(&self) -> Uuid {
        self.record.id
    }
}

/// Ordered result list plus the explicit no-match flag, so callers can
/// render "no pattern found" guidance instead of a generic error
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub matches: Vec<SearchMatch>,
    pub no_matches: bool,
}

impl SearchOutcome {
    pub fn new(matches: Vec<SearchMatch>) -> Self {
        let no_matches = matches.is_empty();
        Self { matches, no_matches }
    }
}
