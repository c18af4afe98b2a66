//! # Stock Commands
//!
//! The stock screen: filtered list, category chips, open-box and add-stock
//! actions. Each action locks the stock ledger once, so concurrent requests
//! for the same product never lose an update.

use serde::Serialize;
use tracing::{debug, info, warn};
use warung_core::validation::validate_search_query;
use warung_core::{StockRecord, StockStatus};

use crate::error::ApiError;
use crate::state::SessionState;

/// Category chip that disables the category filter.
pub const ALL_CATEGORIES: &str = "All";

/// One row of the stock list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemResponse {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub barcode: String,
    pub box_stock: u32,
    pub piece_stock: u32,
    pub pieces_per_box: u32,
    pub min_stock: u32,
    pub total_pieces: u64,
    pub status: StockStatus,
}

impl From<&StockRecord> for StockItemResponse {
    fn from(record: &StockRecord) -> Self {
        StockItemResponse {
            product_id: record.product_id.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            barcode: record.barcode.clone(),
            box_stock: record.box_stock,
            piece_stock: record.piece_stock,
            pieces_per_box: record.pieces_per_box,
            min_stock: record.min_stock,
            total_pieces: record.total_pieces(),
            status: record.status(),
        }
    }
}

/// Stock rows matching the search box and category chip.
///
/// `category` of `None` or `"All"` shows every category.
pub fn list_stock(
    session: &SessionState,
    query: String,
    category: Option<String>,
) -> Result<Vec<StockItemResponse>, ApiError> {
    debug!(query = %query, category = ?category, "list_stock command");
    let ctx = session.require()?;
    validate_search_query(&query)?;

    let category = category.as_deref().filter(|c| *c != ALL_CATEGORIES);

    Ok(ctx.with_stock(|s| {
        s.search(&query, category)
            .into_iter()
            .map(StockItemResponse::from)
            .collect()
    }))
}

/// Category chips: `"All"` followed by each category in first-seen order.
pub fn stock_categories(session: &SessionState) -> Result<Vec<String>, ApiError> {
    debug!("stock_categories command");
    let ctx = session.require()?;

    Ok(ctx.with_stock(|s| {
        std::iter::once(ALL_CATEGORIES)
            .chain(s.categories())
            .map(str::to_string)
            .collect()
    }))
}

/// Breaks one sealed box into loose pieces.
pub fn open_box(session: &SessionState, product_id: String) -> Result<StockItemResponse, ApiError> {
    debug!(product_id = %product_id, "open_box command");
    let ctx = session.require()?;

    let item = ctx
        .with_stock_mut(|s| s.open_box(&product_id).map(StockItemResponse::from))
        .inspect_err(|e| warn!(product_id = %product_id, error = %e, "Open box rejected"))?;

    info!(
        product_id = %product_id,
        box_stock = item.box_stock,
        piece_stock = item.piece_stock,
        "Box opened"
    );
    Ok(item)
}

/// Adds loose pieces to a product. Quantity must be positive.
pub fn add_stock(
    session: &SessionState,
    product_id: String,
    quantity: i64,
) -> Result<StockItemResponse, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "add_stock command");
    let ctx = session.require()?;

    let item = ctx
        .with_stock_mut(|s| s.add_pieces(&product_id, quantity).map(StockItemResponse::from))
        .inspect_err(|e| warn!(product_id = %product_id, error = %e, "Add stock rejected"))?;

    info!(product_id = %product_id, added = quantity, piece_stock = item.piece_stock, "Stock added");
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn signed_in() -> SessionState {
        let session = SessionState::default();
        let user = session
            .guard()
            .authenticate("owner@pos.com", "owner123")
            .unwrap();
        session.begin(user);
        session
    }

    fn ids(items: &[StockItemResponse]) -> Vec<&str> {
        items.iter().map(|i| i.product_id.as_str()).collect()
    }

    #[test]
    fn test_requires_session() {
        let session = SessionState::default();
        let err = list_stock(&session, String::new(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
        let err = open_box(&session, "1".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_list_and_filter() {
        let session = signed_in();

        let all = list_stock(&session, String::new(), None).unwrap();
        assert_eq!(ids(&all), vec!["1", "2", "3", "4"]);
        assert_eq!(all[0].total_pieces, 220);
        assert_eq!(all[0].status, StockStatus::Good);
        assert_eq!(all[3].status, StockStatus::Low);

        let drinks = list_stock(&session, String::new(), Some("Minuman".into())).unwrap();
        assert_eq!(ids(&drinks), vec!["2", "3", "4"]);

        let same = list_stock(&session, String::new(), Some("All".into())).unwrap();
        assert_eq!(same.len(), 4);

        let tea = list_stock(&session, "TEH".into(), None).unwrap();
        assert_eq!(ids(&tea), vec!["3"]);

        let by_barcode = list_stock(&session, "8992388404".into(), None).unwrap();
        assert_eq!(ids(&by_barcode), vec!["4"]);
    }

    #[test]
    fn test_categories() {
        let session = signed_in();
        assert_eq!(
            stock_categories(&session).unwrap(),
            vec!["All", "Makanan", "Minuman"]
        );
    }

    #[test]
    fn test_open_box_until_empty() {
        let session = signed_in();

        // Kopi Kapal Api: 1 box of 12, 5 loose
        let item = open_box(&session, "4".into()).unwrap();
        assert_eq!(item.box_stock, 0);
        assert_eq!(item.piece_stock, 17);

        let err = open_box(&session, "4".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoBoxStock);

        let err = open_box(&session, "404".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownProduct);
    }

    #[test]
    fn test_add_stock() {
        let session = signed_in();

        let item = add_stock(&session, "4".into(), 10).unwrap();
        assert_eq!(item.piece_stock, 15);
        assert_eq!(item.total_pieces, 27);
        // min 20: 27 is within 1.5×
        assert_eq!(item.status, StockStatus::Medium);

        let err = add_stock(&session, "4".into(), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        let err = add_stock(&session, "4".into(), -5).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
    }
}
