use crate::error::{AppError, Result};
use crate::models::TechMessageRecord;
use dashmap::DashMap;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of testing one record's pattern against an input text
#[derive(Debug, Clone)]
pub struct PatternHit {
    /// Exact substring the pattern matched
    pub matched_text: String,

    /// Named capture group values; unnamed groups are ignored
    pub variables: HashMap<String, String>,
}

/// Evaluates catalog regex patterns against operator input.
///
/// Compiled patterns are cached keyed by pattern content, so an edited
/// record naturally misses the cache and unchanged patterns are never
/// recompiled across searches. The map is read-mostly and updated
/// atomically per key; concurrent searches share it without locking.
pub struct PatternMatcher {
    compiled: DashMap<String, Arc<Regex>>,
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self {
            compiled: DashMap::new(),
        }
    }

    /// Compile a pattern, reusing the cached handle when present.
    ///
    /// Callers on the write path use this to reject non-compiling
    /// patterns before they reach the catalog.
    pub fn compile(&self, pattern: &str) -> Result<Arc<Regex>> {
        if let Some(existing) = self.compiled.get(pattern) {
            return Ok(existing.clone());
        }

        let regex = Regex::new(pattern).map_err(|e| AppError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let handle = Arc::new(regex);
        self.compiled.insert(pattern.to_string(), handle.clone());
        Ok(handle)
    }

    /// Drop the cached handle for a pattern that was edited or whose
    /// record was deleted
    pub fn invalidate(&self, pattern: &str) {
        if self.compiled.remove(pattern).is_some() {
            tracing::debug!(pattern = %pattern, "Compiled pattern evicted from cache");
        }
    }

    /// Test one record's pattern anywhere within `text` (unanchored).
    ///
    /// Returns at most one hit per record: the leftmost match wins and
    /// further occurrences are not enumerated. A stored pattern that
    /// fails to compile is a data-integrity defect, not a search fault;
    /// the record is skipped so it cannot deny results for the rest of
    /// the catalog.
    pub fn find_match(&self, record: &TechMessageRecord, text: &str) -> Option<PatternHit> {
        let regex = match self.compile(&record.pattern) {
            Ok(regex) => regex,
            Err(e) => {
                tracing::warn!(
                    record_id = %record.id,
                    pattern = %record.pattern,
                    error = %e,
                    "Skipping record with non-compiling pattern"
                );
                return None;
            }
        };

        let caps = regex.captures(text)?;

        let matched_text = caps
            .get(0)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let mut variables = HashMap::new();
        for name in regex.capture_names().flatten() {
            if let Some(value) = caps.name(name) {
                variables.insert(name.to_string(), value.as_str().to_string());
            }
        }

        Some(PatternHit {
            matched_text,
            variables,
        })
    }

    /// Number of currently cached compiled patterns
    pub fn cached_pattern_count(&self) -> usize {
        self.compiled.len()
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}
