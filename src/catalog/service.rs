use crate::catalog::{CatalogStore, RecordFilter};
use crate::engine::PatternMatcher;
use crate::error::{AppError, Result};
use crate::models::{ActionTier, Severity, TechMessageRecord};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Fields for a new catalog record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    pub category: String,
    pub severity: Severity,
    pub pattern: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub action_tiers: Vec<TierDraft>,
}

/// Fields for a new action tier
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierDraft {
    pub occurrence_min: u32,
    #[serde(default)]
    pub occurrence_max: Option<u32>,
    pub action_text: String,
    pub priority: u32,
}

/// Partial update of a record; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub pattern: Option<String>,
    pub description: Option<String>,
}

/// Partial update of a tier; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierUpdate {
    pub occurrence_min: Option<u32>,
    pub occurrence_max: Option<u32>,
    pub action_text: Option<String>,
    pub priority: Option<u32>,
}

/// Catalog administration service.
///
/// All writes flow through here so pattern compilability is enforced at
/// edit time (the search path can then treat stored patterns as
/// compilable) and so compiled-pattern cache entries are released when a
/// pattern is edited or its record deleted.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    matcher: Arc<PatternMatcher>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, matcher: Arc<PatternMatcher>) -> Self {
        Self { store, matcher }
    }

    /// Create a catalog record; a non-compiling pattern rejects the edit
    pub async fn create_record(&self, draft: RecordDraft) -> Result<TechMessageRecord> {
        let mut record = TechMessageRecord::new(
            draft.category,
            draft.severity,
            draft.pattern,
            draft.description,
        );

        for tier_draft in draft.action_tiers {
            record.add_tier(Self::build_tier(tier_draft)?);
        }

        record.validate()?;
        self.matcher.compile(&record.pattern)?;

        self.store.save_record(&record).await?;

        tracing::info!(
            record_id = %record.id,
            category = %record.category,
            tiers = record.action_tiers.len(),
            "Tech message created"
        );

        Ok(record)
    }

    /// Get a record or fail with NotFound
    pub async fn get_record(&self, id: &Uuid) -> Result<TechMessageRecord> {
        self.store
            .get_record(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tech message {} not found", id)))
    }

    /// Apply a partial update; pattern edits are re-validated and the
    /// stale compiled handle dropped
    pub async fn update_record(
        &self,
        id: &Uuid,
        update: RecordUpdate,
    ) -> Result<TechMessageRecord> {
        let mut record = self.get_record(id).await?;
        let old_pattern = record.pattern.clone();

        if let Some(category) = update.category {
            record.category = category;
        }
        if let Some(severity) = update.severity {
            record.severity = severity;
        }
        if let Some(pattern) = update.pattern {
            record.pattern = pattern;
        }
        if let Some(description) = update.description {
            record.description = Some(description);
        }

        record.validate()?;
        self.matcher.compile(&record.pattern)?;
        record.updated_at = chrono::Utc::now();

        self.store.update_record(&record).await?;

        if record.pattern != old_pattern {
            self.matcher.invalidate(&old_pattern);
            tracing::info!(record_id = %record.id, "Pattern edited, cache entry released");
        }

        Ok(record)
    }

    /// Delete a record and its tiers
    pub async fn delete_record(&self, id: &Uuid) -> Result<()> {
        let removed = self.store.delete_record(id).await?;
        self.matcher.invalidate(&removed.pattern);

        tracing::info!(record_id = %id, "Tech message deleted");
        Ok(())
    }

    /// Append an action tier to a record
    pub async fn add_tier(&self, record_id: &Uuid, draft: TierDraft) -> Result<TechMessageRecord> {
        let mut record = self.get_record(record_id).await?;
        record.add_tier(Self::build_tier(draft)?);

        self.store.update_record(&record).await?;
        Ok(record)
    }

    /// Apply a partial update to one tier
    pub async fn update_tier(
        &self,
        record_id: &Uuid,
        tier_id: &Uuid,
        update: TierUpdate,
    ) -> Result<TechMessageRecord> {
        let mut record = self.get_record(record_id).await?;

        {
            let tier = record.tier_mut(tier_id).ok_or_else(|| {
                AppError::NotFound(format!("Action tier {} not found", tier_id))
            })?;

            if let Some(occurrence_min) = update.occurrence_min {
                tier.occurrence_min = occurrence_min;
            }
            if let Some(occurrence_max) = update.occurrence_max {
                tier.occurrence_max = Some(occurrence_max);
            }
            if let Some(action_text) = update.action_text {
                tier.action_text = action_text;
            }
            if let Some(priority) = update.priority {
                tier.priority = priority;
            }

            tier.validate()?;
            if !tier.has_valid_range() {
                return Err(AppError::Validation(
                    "occurrenceMax must be greater than or equal to occurrenceMin".to_string(),
                ));
            }
        }

        record.updated_at = chrono::Utc::now();
        self.store.update_record(&record).await?;
        Ok(record)
    }

    /// Remove one tier from a record
    pub async fn remove_tier(&self, record_id: &Uuid, tier_id: &Uuid) -> Result<TechMessageRecord> {
        let mut record = self.get_record(record_id).await?;

        record.remove_tier(tier_id).ok_or_else(|| {
            AppError::NotFound(format!("Action tier {} not found", tier_id))
        })?;

        self.store.update_record(&record).await?;
        Ok(record)
    }

    /// List records with filtering and pagination
    pub async fn list_records(
        &self,
        filter: &RecordFilter,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TechMessageRecord>> {
        self.store.list_records(filter, page, page_size).await
    }

    /// Count records matching filter
    pub async fn count_records(&self, filter: &RecordFilter) -> Result<u64> {
        self.store.count_records(filter).await
    }

    /// Distinct category labels
    pub async fn category_list(&self) -> Result<Vec<String>> {
        self.store.get_category_list().await
    }

    /// Load seed records from a JSON file at startup.
    ///
    /// A seed entry that fails validation is skipped with a warning so
    /// one bad entry cannot block service start; returns the number of
    /// records loaded.
    pub async fn seed_from_file(&self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)?;
        let drafts: Vec<RecordDraft> = serde_json::from_str(&raw)?;

        let total = drafts.len();
        let mut loaded = 0;
        for draft in drafts {
            match self.create_record(draft).await {
                Ok(_) => loaded += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping invalid seed record");
                }
            }
        }

        tracing::info!(loaded, total, "Catalog seeded");
        Ok(loaded)
    }

    fn build_tier(draft: TierDraft) -> Result<ActionTier> {
        let tier = ActionTier::new(
            draft.occurrence_min,
            draft.occurrence_max,
            draft.action_text,
            draft.priority,
        );

        tier.validate()?;
        if !tier.has_valid_range() {
            return Err(AppError::Validation(
                "occurrenceMax must be greater than or equal to occurrenceMin".to_string(),
            ));
        }

        Ok(tier)
    }
}
