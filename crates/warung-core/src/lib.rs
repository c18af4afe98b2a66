//! # warung-core: Domain Logic for Warung POS
//!
//! Cart totals, change calculation, box ↔ piece stock conversion with
//! stock-health classification, and the role-based session guard. Everything
//! here is arithmetic over small in-memory collections; there is no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Warung POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front-end (mobile / terminal)                   │   │
//! │  │      Login ──► Dashboard ──► Sales screen ──► Stock screen     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON commands                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    warung-terminal commands                     │   │
//! │  │      login, add_to_cart, checkout, open_box, add_stock, ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ warung-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  session  │  │   cart    │  │   stock   │  │  summary  │  │   │
//! │  │   │  Guard    │  │  Ledger   │  │  Ledger   │  │  Daily    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │          NO I/O • NO DATABASE • NO NETWORK                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            warung-db (device storage for the session)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Session, Role, PaymentMethod, StockStatus
//! - [`money`] - Whole-rupiah money type
//! - [`catalog`] - Product lookup seam and in-memory catalog
//! - [`cart`] - Cart ledger, payment selection, checkout receipts
//! - [`stock`] - Stock ledger with box/piece conversion
//! - [`session`] - Account registry and session guard
//! - [`summary`] - Daily sales summary
//! - [`validation`] - Input validation and lenient parsing
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use warung_core::{CartLedger, InMemoryCatalog, Money, PaymentMethod};
//!
//! let catalog = InMemoryCatalog::demo();
//! let mut cart = CartLedger::new();
//!
//! cart.add_item("1", &catalog).unwrap(); // Indomie Goreng 3500
//! cart.add_item("1", &catalog).unwrap();
//! cart.add_item("2", &catalog).unwrap(); // Aqua 600ml 4000
//! assert_eq!(cart.total(), Money::from_units(11_000));
//!
//! cart.set_payment_method(PaymentMethod::Cash);
//! cart.set_cash_tendered("20000");
//! let receipt = cart.checkout().unwrap();
//! assert_eq!(receipt.change_due.unwrap().to_string(), "9000");
//! assert!(cart.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod session;
pub mod stock;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLedger, CartLine, PaymentSelection, Receipt};
pub use catalog::{InMemoryCatalog, ProductCatalog};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{Account, AccountRegistry, SessionGuard};
pub use stock::{StockLedger, StockRecord};
pub use summary::DailySummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Device-storage key holding the signed-in user. Absent means logged out.
pub const SESSION_STORAGE_KEY: &str = "user";

/// Largest quantity a single cart line may hold.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Daily sales target in rupiah when none is configured.
pub const DEFAULT_DAILY_TARGET: i64 = 3_000_000;
