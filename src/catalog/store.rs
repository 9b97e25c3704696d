use crate::catalog::{CatalogProvider, CatalogStore, RecordFilter};
use crate::error::{AppError, Result};
use crate::models::TechMessageRecord;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory catalog store (for MVP and testing).
///
/// Reads take a full snapshot; iteration over the underlying map has no
/// stable order, so snapshots are sorted by creation time to keep
/// repeated searches deterministic.
#[derive(Clone)]
pub struct InMemoryCatalog {
    records: Arc<DashMap<Uuid, TechMessageRecord>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    fn matches_filter(record: &TechMessageRecord, filter: &RecordFilter) -> bool {
        let category_match = filter.categories.is_empty()
            || filter
                .categories
                .iter()
                .any(|c| record.category.eq_ignore_ascii_case(c));

        let severity_match =
            filter.severities.is_empty() || filter.severities.contains(&record.severity);

        category_match && severity_match
    }

    fn sorted_snapshot(&self) -> Vec<TechMessageRecord> {
        let mut records: Vec<TechMessageRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        records
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn load_all_records(&self) -> Result<Vec<TechMessageRecord>> {
        Ok(self.sorted_snapshot())
    }

    async fn get_category_list(&self) -> Result<Vec<String>> {
        let categories: BTreeSet<String> = self
            .records
            .iter()
            .map(|entry| entry.value().category.clone())
            .collect();

        Ok(categories.into_iter().collect())
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn save_record(&self, record: &TechMessageRecord) -> Result<()> {
        self.records.insert(record.id, record.clone());
        tracing::debug!(record_id = %record.id, category = %record.category, "Record saved");
        Ok(())
    }

    async fn get_record(&self, id: &Uuid) -> Result<Option<TechMessageRecord>> {
        Ok(self.records.get(id).map(|entry| entry.clone()))
    }

    async fn update_record(&self, record: &TechMessageRecord) -> Result<()> {
        if self.records.contains_key(&record.id) {
            self.records.insert(record.id, record.clone());
            tracing::debug!(record_id = %record.id, "Record updated");
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Tech message {} not found",
                record.id
            )))
        }
    }

    async fn delete_record(&self, id: &Uuid) -> Result<TechMessageRecord> {
        if let Some((_, record)) = self.records.remove(id) {
            tracing::debug!(record_id = %id, "Record deleted");
            Ok(record)
        } else {
            Err(AppError::NotFound(format!("Tech message {} not found", id)))
        }
    }

    async fn list_records(
        &self,
        filter: &RecordFilter,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TechMessageRecord>> {
        let records = self.sorted_snapshot();

        let start = (page * page_size) as usize;

        Ok(records
            .into_iter()
            .filter(|record| Self::matches_filter(record, filter))
            .skip(start)
            .take(page_size as usize)
            .collect())
    }

    async fn count_records(&self, filter: &RecordFilter) -> Result<u64> {
        let count = self
            .records
            .iter()
            .filter(|entry| Self::matches_filter(entry.value(), filter))
            .count();

        Ok(count as u64)
    }
}
