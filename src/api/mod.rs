pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::{catalog::CatalogService, engine::SearchEngine};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub search: Arc<SearchEngine>,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogService>, search: Arc<SearchEngine>) -> Self {
        Self { catalog, search }
    }
}
