//! # Catalog Commands
//!
//! Product search for the sales screen.

use serde::Serialize;
use tracing::debug;
use warung_core::validation::validate_search_query;
use warung_core::{Product, ProductCatalog};

use crate::error::ApiError;
use crate::state::{CatalogState, ConfigState, SessionState};

/// A product tile on the sales screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    /// Price formatted for display, e.g. "Rp 3.500"
    pub price_display: String,
}

/// Products whose name (any case) or barcode contains `query`.
/// An empty query lists the whole catalog.
pub fn catalog_search(
    catalog: &CatalogState,
    session: &SessionState,
    config: &ConfigState,
    query: String,
) -> Result<Vec<ProductResponse>, ApiError> {
    debug!(query = %query, "catalog_search command");
    session.require()?;
    validate_search_query(&query)?;

    Ok(catalog
        .catalog()
        .search(&query)
        .into_iter()
        .map(|p| ProductResponse {
            price_display: config.format_currency(p.price),
            product: p.clone(),
        })
        .collect())
}
