//! # Stock Ledger
//!
//! Per-product inventory in two units: sealed boxes and loose pieces.
//!
//! ## Box → Piece Conversion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Aqua 600ml: 24 pieces per box                                          │
//! │                                                                         │
//! │   boxes: 3   pieces: 15   total: 15 + 3×24 = 87                        │
//! │        │                                                                │
//! │        ▼  open_box()                                                    │
//! │   boxes: 2   pieces: 39   total: 87 (unchanged)                        │
//! │                                                                         │
//! │   add_pieces(10)                                                        │
//! │   boxes: 2   pieces: 49   total: 97                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `open_box` is the only operation that moves stock between units. Every
//! operation takes `&mut self` and either applies fully or returns an error
//! with nothing changed, so sharing the ledger behind a single lock is enough
//! to make each call atomic.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::StockStatus;
use crate::validation::{validate_pieces_per_box, validate_product_id, ValidationResult};

// =============================================================================
// Stock Record
// =============================================================================

/// Inventory for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockRecord {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub barcode: String,

    /// Sealed boxes on hand.
    pub box_stock: u32,

    /// Loose pieces on hand.
    pub piece_stock: u32,

    /// Fixed conversion ratio, always > 0.
    pub pieces_per_box: u32,

    /// Threshold in pieces at or below which stock is `Low`.
    pub min_stock: u32,
}

impl StockRecord {
    /// pieces + boxes × pieces_per_box.
    pub fn total_pieces(&self) -> u64 {
        u64::from(self.piece_stock) + u64::from(self.box_stock) * u64::from(self.pieces_per_box)
    }

    /// Classifies stock health.
    ///
    /// ## Thresholds
    /// ```text
    ///   total ≤ min              → Low
    ///   min < total ≤ min × 1.5  → Medium   (both bounds inclusive)
    ///   total > min × 1.5        → Good
    /// ```
    /// The 1.5× bound is compared as `2 × total ≤ 3 × min` so odd minimums
    /// need no rounding.
    pub fn status(&self) -> StockStatus {
        let total = self.total_pieces();
        let min = u64::from(self.min_stock);

        if total <= min {
            StockStatus::Low
        } else if total * 2 <= min * 3 {
            StockStatus::Medium
        } else {
            StockStatus::Good
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase()) || self.barcode.contains(query)
    }
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// All stock records, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    records: Vec<StockRecord>,
}

impl StockLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a product's stock.
    ///
    /// ## Errors
    /// - `Required` for a blank product id
    /// - `MustBePositive` when `pieces_per_box` is 0
    /// - `Duplicate` when the product already has a record
    pub fn insert(&mut self, record: StockRecord) -> ValidationResult<()> {
        validate_product_id(&record.product_id)?;
        validate_pieces_per_box(record.pieces_per_box)?;

        if self.get(&record.product_id).is_some() {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: record.product_id,
            });
        }

        self.records.push(record);
        Ok(())
    }

    /// Looks up a record.
    pub fn get(&self, product_id: &str) -> Option<&StockRecord> {
        self.records.iter().find(|r| r.product_id == product_id)
    }

    /// Opens one sealed box into loose pieces.
    ///
    /// ## Errors
    /// - `UnknownProduct` when there is no record
    /// - `NoBoxStock` when no sealed boxes are left
    ///
    /// Both leave the record untouched.
    pub fn open_box(&mut self, product_id: &str) -> CoreResult<&StockRecord> {
        let record = self.record_mut(product_id)?;

        if record.box_stock == 0 {
            return Err(CoreError::NoBoxStock(product_id.to_string()));
        }

        let piece_stock = record
            .piece_stock
            .checked_add(record.pieces_per_box)
            .ok_or(CoreError::InvalidQuantity(i64::from(record.pieces_per_box)))?;

        record.box_stock -= 1;
        record.piece_stock = piece_stock;
        Ok(record)
    }

    /// Adds loose pieces.
    ///
    /// ## Errors
    /// - `UnknownProduct` when there is no record
    /// - `InvalidQuantity` when `quantity` ≤ 0 (or would overflow the counter)
    pub fn add_pieces(&mut self, product_id: &str, quantity: i64) -> CoreResult<&StockRecord> {
        let record = self.record_mut(product_id)?;

        let piece_stock = u32::try_from(quantity)
            .ok()
            .filter(|&q| q > 0)
            .and_then(|q| record.piece_stock.checked_add(q))
            .ok_or(CoreError::InvalidQuantity(quantity))?;

        record.piece_stock = piece_stock;
        Ok(record)
    }

    /// Stock health of one product.
    pub fn classify(&self, product_id: &str) -> CoreResult<StockStatus> {
        self.get(product_id)
            .map(StockRecord::status)
            .ok_or_else(|| CoreError::UnknownProduct(product_id.to_string()))
    }

    /// Filters records for the stock screen.
    ///
    /// ## Matching
    /// - Name contains `query` (case-insensitive), or barcode contains `query`
    /// - When `category` is given, the record's category must equal it
    ///
    /// Results keep insertion order; there is no relevance ranking.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<&StockRecord> {
        self.records
            .iter()
            .filter(|r| r.matches(query))
            .filter(|r| category.map_or(true, |c| r.category == c))
            .collect()
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for record in &self.records {
            if !categories.contains(&record.category.as_str()) {
                categories.push(&record.category);
            }
        }
        categories
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    /// The four demo items stocked on a fresh terminal.
    pub fn demo() -> Self {
        let item = |id: &str, name: &str, category: &str, barcode: &str, stock: [u32; 4]| {
            let [box_stock, piece_stock, pieces_per_box, min_stock] = stock;
            StockRecord {
                product_id: id.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                barcode: barcode.to_string(),
                box_stock,
                piece_stock,
                pieces_per_box,
                min_stock,
            }
        };

        Self {
            records: vec![
                item("1", "Indomie Goreng", "Makanan", "8992388101010", [5, 20, 40, 50]),
                item("2", "Aqua 600ml", "Minuman", "8992388202020", [3, 15, 24, 30]),
                item("3", "Teh Botol Sosro", "Minuman", "8992388303030", [2, 10, 24, 25]),
                item("4", "Kopi Kapal Api", "Minuman", "8992388404040", [1, 5, 12, 20]),
            ],
        }
    }

    fn record_mut(&mut self, product_id: &str) -> CoreResult<&mut StockRecord> {
        self.records
            .iter_mut()
            .find(|r| r.product_id == product_id)
            .ok_or_else(|| CoreError::UnknownProduct(product_id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
