//! # Catalog State
//!
//! Product reference data. Read-only after startup, so no lock.

use warung_core::InMemoryCatalog;

#[derive(Debug, Default)]
pub struct CatalogState {
    catalog: InMemoryCatalog,
}

impl CatalogState {
    pub fn new(catalog: InMemoryCatalog) -> Self {
        CatalogState { catalog }
    }

    /// The demo product list.
    pub fn demo() -> Self {
        Self::new(InMemoryCatalog::demo())
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }
}
