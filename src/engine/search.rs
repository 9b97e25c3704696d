use crate::catalog::CatalogProvider;
use crate::engine::frequency::FrequencyAnalyzer;
use crate::engine::matcher::PatternMatcher;
use crate::engine::ranker::FuzzyRanker;
use crate::error::{AppError, Result};
use crate::models::{MatchType, SearchMatch, SearchOutcome, SearchQuery, TechMessageRecord};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Minimum trimmed search text length; anything shorter is a client
/// error, not an empty result.
pub const MIN_SEARCH_TEXT_LEN: usize = 3;

/// Coordinates the matching pipeline for one search: pattern matching
/// and/or fuzzy ranking by mode, merge/dedup/sort, then recommendation
/// lookup per surviving result.
///
/// Stateless per call apart from the shared compiled-pattern cache; the
/// catalog is fetched once per search as an immutable snapshot, so
/// concurrent searches need no coordination.
pub struct SearchEngine {
    catalog: Arc<dyn CatalogProvider>,
    matcher: Arc<PatternMatcher>,
    ranker: FuzzyRanker,
}

impl SearchEngine {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        matcher: Arc<PatternMatcher>,
        ranker: FuzzyRanker,
    ) -> Self {
        Self {
            catalog,
            matcher,
            ranker,
        }
    }

    /// Run one search over the current catalog snapshot.
    ///
    /// An empty result list is a valid outcome, reported through the
    /// `no_matches` flag rather than an error.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let trimmed = query.search_text.trim();
        if trimmed.chars().count() < MIN_SEARCH_TEXT_LEN {
            return Err(AppError::Validation(format!(
                "search text must be at least {} characters",
                MIN_SEARCH_TEXT_LEN
            )));
        }

        let records = self.catalog.load_all_records().await?;

        let mut matches: Vec<SearchMatch> = Vec::new();
        let mut exact_ids: HashSet<Uuid> = HashSet::new();

        // Exact path runs over the raw text, untokenized
        if query.match_mode.includes_exact() {
            for record in &records {
                if let Some(hit) = self.matcher.find_match(record, &query.search_text) {
                    exact_ids.insert(record.id);
                    matches.push(Self::exact_match(record, hit.matched_text, hit.variables));
                }
            }
        }

        if query.match_mode.includes_fuzzy() {
            let keywords = FuzzyRanker::tokenize(&query.search_text);
            let mut scored = self.ranker.rank(&keywords, &records);

            // Stable sort: equal scores keep catalog order, which makes
            // repeated identical searches return identical lists
            scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

            for entry in scored {
                // A record seen on the exact path keeps only its exact
                // entry; never show the same record twice
                if exact_ids.contains(&entry.record.id) {
                    continue;
                }
                matches.push(Self::fuzzy_match(entry.record, entry.score));
            }
        }

        for result in &mut matches {
            result.recommended_action =
                FrequencyAnalyzer::select_tier(&result.record.action_tiers, query.occurrence_count)
                    .cloned();
        }

        debug!(
            mode = %query.match_mode,
            exact = exact_ids.len(),
            total = matches.len(),
            "Search completed"
        );

        Ok(SearchOutcome::new(matches))
    }

    fn exact_match(
        record: &TechMessageRecord,
        matched_text: String,
        variables: std::collections::HashMap<String, String>,
    ) -> SearchMatch {
        SearchMatch {
            match_type: MatchType::Exact,
            match_score: 1.0,
            matched_text: Some(matched_text),
            extracted_variables: Some(variables),
            recommended_action: None,
            all_action_tiers: record.action_tiers.clone(),
            record: record.clone(),
        }
    }

    fn fuzzy_match(record: &TechMessageRecord, score: f64) -> SearchMatch {
        SearchMatch {
            match_type: MatchType::Fuzzy,
            match_score: score,
            matched_text: None,
            extracted_variables: None,
            recommended_action: None,
            all_action_tiers: record.action_tiers.clone(),
            record: record.clone(),
        }
    }
}
