//! # Product Catalog
//!
//! The catalog is an external collaborator: the cart only needs to resolve a
//! product id to its current name and price, and the sales screen needs to
//! search by name or barcode. [`ProductCatalog`] is that seam.
//!
//! [`InMemoryCatalog`] is the implementation used by the terminal app. It keeps
//! products in insertion order and enforces the id and barcode uniqueness the
//! rest of the system relies on.

use crate::error::ValidationError;
use crate::types::Product;
use crate::validation::{validate_price, validate_product_id, ValidationResult};

/// Read access to product reference data.
pub trait ProductCatalog {
    /// Resolves a product id.
    fn find_by_id(&self, id: &str) -> Option<&Product>;

    /// Products whose name (case-insensitive) or barcode contains `text`.
    fn search(&self, text: &str) -> Vec<&Product>;
}

/// Catalog held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product.
    ///
    /// ## Errors
    /// - `Required` when the id is blank
    /// - `OutOfRange` when the price is negative
    /// - `Duplicate` when the id or barcode is already taken
    pub fn insert(&mut self, product: Product) -> ValidationResult<()> {
        validate_product_id(&product.id)?;
        validate_price(product.price)?;

        if self.products.iter().any(|p| p.id == product.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: product.id,
            });
        }

        if let Some(barcode) = product.barcode.as_deref() {
            if self
                .products
                .iter()
                .any(|p| p.barcode.as_deref() == Some(barcode))
            {
                return Err(ValidationError::Duplicate {
                    field: "barcode".to_string(),
                    value: barcode.to_string(),
                });
            }
        }

        self.products.push(product);
        Ok(())
    }

    /// The demo product list used by a fresh terminal.
    pub fn demo() -> Self {
        let product = |id: &str, name: &str, price: i64, barcode: &str, stock: i64| Product {
            id: id.to_string(),
            name: name.to_string(),
            price,
            barcode: Some(barcode.to_string()),
            stock,
        };

        Self {
            products: vec![
                product("1", "Indomie Goreng", 3500, "8992388101010", 100),
                product("2", "Aqua 600ml", 4000, "8992388202020", 50),
                product("3", "Teh Botol Sosro", 5000, "8992388303030", 75),
                product("4", "Kopi Kapal Api", 2500, "8992388404040", 30),
                product("5", "Biskuit Roma", 8000, "8992388505050", 25),
            ],
        }
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn search(&self, text: &str) -> Vec<&Product> {
        self.products.iter().filter(|p| p.matches(text)).collect()
    }
}

impl FromIterator<Product> for InMemoryCatalog {
    /// Builds a catalog, skipping products that violate uniqueness.
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = InMemoryCatalog::new();
        for product in iter {
            // First writer wins on duplicate ids/barcodes.
            let _ = catalog.insert(product);
        }
        catalog
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, price: i64, barcode: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price,
            barcode: barcode.map(str::to_string),
            stock: 10,
        }
    }

    #[test]
    fn test_find_by_id() {
        let catalog: InMemoryCatalog = [
            product("1", "Indomie Goreng", 3500, Some("8992388101010")),
            product("2", "Aqua 600ml", 4000, Some("8992388202020")),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.find_by_id("2").map(|p| p.price), Some(4000));
        assert!(catalog.find_by_id("9").is_none());
    }

    #[test]
    fn test_search_keeps_insertion_order() {
        let catalog: InMemoryCatalog = [
            product("1", "Teh Botol Sosro", 5000, Some("8992388303030")),
            product("2", "Teh Pucuk", 3500, None),
            product("3", "Aqua 600ml", 4000, Some("8992388202020")),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = catalog.search("teh").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let ids: Vec<&str> = catalog
            .search("89923882")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .insert(product("1", "Indomie Goreng", 3500, Some("111")))
            .unwrap();

        let err = catalog
            .insert(product("1", "Other", 1000, None))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { ref field, .. } if field == "id"));

        let err = catalog
            .insert(product("2", "Other", 1000, Some("111")))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { ref field, .. } if field == "barcode"));

        // Products without barcodes never collide with each other.
        catalog.insert(product("3", "Loose A", 500, None)).unwrap();
        catalog.insert(product("4", "Loose B", 500, None)).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_demo_catalog() {
        let catalog = InMemoryCatalog::demo();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.find_by_id("5").map(|p| p.name.as_str()), Some("Biskuit Roma"));
        assert_eq!(catalog.search("kopi").len(), 1);
        assert_eq!(catalog.search("").len(), 5);
    }

    #[test]
    fn test_insert_rejects_negative_price() {
        let mut catalog = InMemoryCatalog::new();
        assert!(catalog.insert(product("1", "Broken", -1, None)).is_err());
        assert!(catalog.is_empty());
    }
}
