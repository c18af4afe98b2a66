//! # Domain Types
//!
//! Core domain types shared by the ledgers and the session guard.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Session      │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (SKU)       │   │  id             │   │  Cash           │       │
//! │  │  name           │   │  name           │   │  NonCash        │       │
//! │  │  price          │   │  role           │   │  Qris           │       │
//! │  │  barcode?       │   │  email? phone?  │   │  Debt           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Role       │   │   Dashboard     │   │  StockStatus    │       │
//! │  │  Cashier        │──►│  Cashier        │   │  Low            │       │
//! │  │  Owner          │──►│  Owner          │   │  Medium / Good  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The product id doubles as the SKU: cart lines and stock records refer to
//! the same identifier space.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale. Reference data owned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique, stable identifier (the SKU).
    pub id: String,

    /// Display name shown to the cashier.
    pub name: String,

    /// Unit price in whole currency units.
    pub price: i64,

    /// Barcode (EAN-13). Unique when present.
    pub barcode: Option<String>,

    /// Stock level shown next to the product in the sales screen.
    pub stock: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_units(self.price)
    }

    /// Case-insensitive name match or barcode substring match.
    ///
    /// An empty query matches everything, the same as an empty search box.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .barcode
                .as_deref()
                .is_some_and(|barcode| barcode.contains(query))
    }
}

// =============================================================================
// Roles & Sessions
// =============================================================================

/// What a signed-in user is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Cashier,
    Owner,
}

impl Role {
    /// The dashboard a user with this role lands on after login.
    pub const fn home(self) -> Dashboard {
        match self {
            Role::Owner => Dashboard::Owner,
            Role::Cashier => Dashboard::Cashier,
        }
    }
}

/// Landing screens, one per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    /// Daily sales, target progress, quick links to sales and stock.
    Cashier,
    /// Business metrics across periods.
    Owner,
}

/// A signed-in user.
///
/// This is exactly what gets persisted under the session key, so it never
/// carries the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
///
/// Only `Cash` involves a tendered amount and change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Physical cash; tendered amount must cover the total.
    #[default]
    Cash,
    /// Card or bank transfer on an external terminal.
    NonCash,
    /// QRIS (national QR payment standard).
    Qris,
    /// Recorded as customer debt, settled later.
    Debt,
}

// =============================================================================
// Stock Status
// =============================================================================

/// Stock health of a product, measured in pieces against its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// At or below the minimum.
    Low,
    /// Above the minimum, up to and including 1.5× the minimum.
    Medium,
    /// Comfortably stocked.
    Good,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn indomie() -> Product {
        Product {
            id: "1".to_string(),
            name: "Indomie Goreng".to_string(),
            price: 3500,
            barcode: Some("8992388101010".to_string()),
            stock: 100,
        }
    }

    #[test]
    fn test_product_matches_name_case_insensitive() {
        let product = indomie();
        assert!(product.matches("indomie"));
        assert!(product.matches("GORENG"));
        assert!(product.matches(""));
        assert!(!product.matches("aqua"));
    }

    #[test]
    fn test_product_matches_barcode_substring() {
        let product = indomie();
        assert!(product.matches("8992388101"));
        assert!(!product.matches("8992388202"));

        let no_barcode = Product {
            barcode: None,
            ..indomie()
        };
        assert!(!no_barcode.matches("8992388101"));
    }

    #[test]
    fn test_role_home() {
        assert_eq!(Role::Owner.home(), Dashboard::Owner);
        assert_eq!(Role::Cashier.home(), Dashboard::Cashier);
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::NonCash).unwrap(),
            "\"non-cash\""
        );
        let qris: PaymentMethod = serde_json::from_str("\"qris\"").unwrap();
        assert_eq!(qris, PaymentMethod::Qris);
    }

    #[test]
    fn test_session_omits_missing_contact_fields() {
        let session = Session {
            id: "1".to_string(),
            name: "John Cashier".to_string(),
            role: Role::Cashier,
            email: None,
            phone: None,
        };
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(json, r#"{"id":"1","name":"John Cashier","role":"cashier"}"#);

        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
