//! # Error Types
//!
//! Domain-specific error types for warung-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warung-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger and session failures                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  warung-db errors (separate crate)                                     │
//! │  └── DbError          - Device storage failures                        │
//! │                                                                         │
//! │  terminal app errors                                                   │
//! │  └── ApiError         - What the front-end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front-end              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every ledger operation either succeeds or returns one of these kinds with
//! the ledger left untouched. None of them carry display text meant for the
//! cashier; the app layer owns the wording.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The catalog or stock ledger has no product with this id.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// `set_quantity` was called for a product that has no cart line.
    ///
    /// Removing a line and then setting its quantity again does not re-add
    /// it; the caller has to go through `add_item`.
    #[error("Product {0} is not in the cart")]
    LineNotFound(String),

    /// Checkout attempted with no lines in the cart.
    ///
    /// Checked before anything else, whatever the payment method.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cash checkout where the tendered amount does not cover the total.
    #[error("Insufficient payment: total {total}, tendered {tendered}")]
    InsufficientPayment { total: Money, tendered: Decimal },

    /// `open_box` on a product with zero boxes left.
    #[error("No box stock left for {0}")]
    NoBoxStock(String),

    /// Stock adjustment with a quantity that is zero, negative, or would
    /// overflow the piece counter; or a cart quantity above
    /// `MAX_ITEM_QUANTITY` or one that would overflow the cart total.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Credentials rejected.
    ///
    /// Unknown identifier and wrong secret produce this same variant so the
    /// caller cannot tell which accounts exist.
    #[error("Authentication failed")]
    AuthFailure,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Duplicate value (e.g., duplicate product id or barcode).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientPayment {
            total: Money::from_units(9500),
            tendered: Decimal::from(5000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: total Rp9500, tendered 5000"
        );

        assert_eq!(
            CoreError::NoBoxStock("4".to_string()).to_string(),
            "No box stock left for 4"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::Duplicate {
            field: "barcode".to_string(),
            value: "8992388101010".to_string(),
        };
        assert_eq!(err.to_string(), "barcode '8992388101010' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "password".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
