pub mod service;
pub mod store;

pub use service::CatalogService;
pub use store::InMemoryCatalog;

use crate::error::Result;
use crate::models::{Severity, TechMessageRecord};
use async_trait::async_trait;
use uuid::Uuid;

/// Read contract the search engine consumes.
///
/// The engine never writes through this trait; each search takes one
/// snapshot of the full catalog with tiers already populated.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// All records in deterministic order (creation time, then id)
    async fn load_all_records(&self) -> Result<Vec<TechMessageRecord>>;

    /// Distinct category labels, sorted, for filter UIs
    async fn get_category_list(&self) -> Result<Vec<String>>;
}

/// Write contract the administration API consumes
#[async_trait]
pub trait CatalogStore: CatalogProvider {
    /// Save a new record
    async fn save_record(&self, record: &TechMessageRecord) -> Result<()>;

    /// Get a record by ID
    async fn get_record(&self, id: &Uuid) -> Result<Option<TechMessageRecord>>;

    /// Update an existing record
    async fn update_record(&self, record: &TechMessageRecord) -> Result<()>;

    /// Delete a record (and with it, its tiers); returns the removed
    /// record so callers can release derived state
    async fn delete_record(&self, id: &Uuid) -> Result<TechMessageRecord>;

    /// List records with filtering and pagination
    async fn list_records(
        &self,
        filter: &RecordFilter,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TechMessageRecord>>;

    /// Count records matching filter
    async fn count_records(&self, filter: &RecordFilter) -> Result<u64>;
}

/// Filter for querying catalog records
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub categories: Vec<String>,
    pub severities: Vec<Severity>,
}
