use crate::models::{Severity, TechMessageRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fuzzy scores never reach this ceiling's complement territory: the cap
/// guarantees a fuzzy result can never numerically outrank an exact match
/// (scored 1.0), no matter how many keywords and bonuses accumulate.
pub const FUZZY_SCORE_CEILING: f64 = 0.9;

/// Keyword cap bounding per-query cost; extra keywords are dropped, not
/// an error.
pub const MAX_KEYWORDS: usize = 3;

/// Per-field weight table for the default scoring policy.
///
/// Tunable from configuration without touching control flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_category_exact")]
    pub category_exact: f64,

    #[serde(default = "default_category_substring")]
    pub category_substring: f64,

    #[serde(default = "default_description_substring")]
    pub description_substring: f64,

    #[serde(default = "default_pattern_substring")]
    pub pattern_substring: f64,

    #[serde(default = "default_bonus_low")]
    pub bonus_low: f64,

    #[serde(default = "default_bonus_medium")]
    pub bonus_medium: f64,

    #[serde(default = "default_bonus_high")]
    pub bonus_high: f64,

    #[serde(default = "default_bonus_critical")]
    pub bonus_critical: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category_exact: default_category_exact(),
            category_substring: default_category_substring(),
            description_substring: default_description_substring(),
            pattern_substring: default_pattern_substring(),
            bonus_low: default_bonus_low(),
            bonus_medium: default_bonus_medium(),
            bonus_high: default_bonus_high(),
            bonus_critical: default_bonus_critical(),
        }
    }
}

fn default_category_exact() -> f64 {
    0.5
}

fn default_category_substring() -> f64 {
    0.3
}

fn default_description_substring() -> f64 {
    0.2
}

fn default_pattern_substring() -> f64 {
    0.2
}

fn default_bonus_low() -> f64 {
    0.025
}

fn default_bonus_medium() -> f64 {
    0.05
}

fn default_bonus_high() -> f64 {
    0.075
}

fn default_bonus_critical() -> f64 {
    0.1
}

/// Pure scoring strategy: one keyword against one record.
///
/// Swappable so weighting can be tuned or replaced without changing the
/// ranking control flow.
pub trait ScoringPolicy: Send + Sync {
    /// Weight of the single best-matching field for this keyword, or
    /// None when the keyword matches no field (which disqualifies the
    /// record under all-keywords-AND semantics).
    fn keyword_weight(&self, keyword: &str, record: &TechMessageRecord) -> Option<f64>;

    /// Severity bonus added once after summing keyword weights
    fn severity_bonus(&self, severity: Severity) -> f64;
}

/// Default field-weighted substring policy
pub struct FieldWeightPolicy {
    weights: ScoringWeights,
}

impl FieldWeightPolicy {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl Default for FieldWeightPolicy {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl ScoringPolicy for FieldWeightPolicy {
    fn keyword_weight(&self, keyword: &str, record: &TechMessageRecord) -> Option<f64> {
        let keyword = keyword.to_lowercase();
        let category = record.category.to_lowercase();

        let mut best: Option<f64> = None;
        let mut consider = |weight: f64| {
            if best.map_or(true, |b| weight > b) {
                best = Some(weight);
            }
        };

        if category == keyword {
            consider(self.weights.category_exact);
        }
        if category.contains(&keyword) {
            consider(self.weights.category_substring);
        }
        if let Some(description) = &record.description {
            if description.to_lowercase().contains(&keyword) {
                consider(self.weights.description_substring);
            }
        }
        if record.pattern.to_lowercase().contains(&keyword) {
            consider(self.weights.pattern_substring);
        }

        best
    }

    fn severity_bonus(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.weights.bonus_low,
            Severity::Medium => self.weights.bonus_medium,
            Severity::High => self.weights.bonus_high,
            Severity::Critical => self.weights.bonus_critical,
        }
    }
}

/// A catalog record that qualified for every keyword, with its score
#[derive(Debug, Clone)]
pub struct ScoredRecord<'a> {
    pub record: &'a TechMessageRecord,
    pub score: f64,
}

/// Ranks catalog records by keyword relevance.
///
/// A record qualifies only if every keyword matches at least one field;
/// partial keyword overlap is not a match.
pub struct FuzzyRanker {
    policy: Arc<dyn ScoringPolicy>,
}

impl FuzzyRanker {
    pub fn new(policy: Arc<dyn ScoringPolicy>) -> Self {
        Self { policy }
    }

    /// Split free text into search keywords: trim, drop empties, keep
    /// the first MAX_KEYWORDS.
    pub fn tokenize(text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .take(MAX_KEYWORDS)
            .collect()
    }

    /// Score every qualifying record, returned in catalog order; callers
    /// sort by score.
    pub fn rank<'a>(
        &self,
        keywords: &[String],
        catalog: &'a [TechMessageRecord],
    ) -> Vec<ScoredRecord<'a>> {
        if keywords.is_empty() {
            return Vec::new();
        }

        let keywords = &keywords[..keywords.len().min(MAX_KEYWORDS)];

        catalog
            .iter()
            .filter_map(|record| {
                let mut sum = 0.0;
                for keyword in keywords {
                    sum += self.policy.keyword_weight(keyword, record)?;
                }

                let score = (sum + self.policy.severity_bonus(record.severity))
                    .min(FUZZY_SCORE_CEILING);

                Some(ScoredRecord { record, score })
            })
            .collect()
    }
}

impl Default for FuzzyRanker {
    fn default() -> Self {
        Self::new(Arc::new(FieldWeightPolicy::default()))
    }
}
