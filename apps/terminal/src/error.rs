//! # API Error Type
//!
//! What a front-end sees when a command fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {"command":"checkout"}                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command handler  → Result<T, ApiError>                          │  │
//! │  │         │                                                        │  │
//! │  │  No session? ─────── ApiError::unauthenticated() ──┐            │  │
//! │  │  Storage error? ──── DbError::QueryFailed ─────────┤            │  │
//! │  │  Ledger error? ───── CoreError::EmptyCart ─────────┼─► ApiError │  │
//! │  │  Success ─────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  {"status":"error","error":{"code":"EMPTY_CART","message":"..."}}      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use warung_core::{CoreError, ValidationError};
use warung_db::DbError;

/// API error returned from commands.
///
/// ```json
/// { "code": "NO_BOX_STOCK", "message": "No sealed boxes left for Aqua 600ml" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No product with that id in the catalog or stock ledger
    UnknownProduct,

    /// Quantity update for a product that is not in the cart
    LineNotFound,

    EmptyCart,

    /// Cash tendered is below the total
    InsufficientPayment,

    NoBoxStock,

    /// Stock adjustment with a non-positive quantity
    InvalidQuantity,

    /// Wrong email or password
    AuthFailure,

    /// Command needs a signed-in user
    Unauthenticated,

    /// Input validation failed
    ValidationError,

    /// Device storage failed
    StorageError,

    /// The command line could not be parsed
    BadRequest,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "Please log in first")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Storage details are logged; the front-end gets a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!(error = %err, "Device storage failed");
        let message = match err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => "Device storage unavailable",
            DbError::MigrationFailed(_) => "Device storage migration failed",
            DbError::Serialization(_) => "Stored data is unreadable",
            DbError::QueryFailed(_) | DbError::Internal(_) => "Device storage operation failed",
        };
        ApiError::new(ErrorCode::StorageError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownProduct(id) => {
                ApiError::new(ErrorCode::UnknownProduct, format!("Product not found: {}", id))
            }
            CoreError::LineNotFound(id) => ApiError::new(
                ErrorCode::LineNotFound,
                format!("Product {} is not in the cart", id),
            ),
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, "Cart is empty"),
            CoreError::InsufficientPayment { total, tendered } => ApiError::new(
                ErrorCode::InsufficientPayment,
                format!(
                    "Insufficient payment: total {}, received {}",
                    total.units(),
                    tendered.normalize()
                ),
            ),
            CoreError::NoBoxStock(id) => ApiError::new(
                ErrorCode::NoBoxStock,
                format!("No box stock available for {}", id),
            ),
            CoreError::InvalidQuantity(qty) => ApiError::new(
                ErrorCode::InvalidQuantity,
                format!("Please enter a valid quantity (got {})", qty),
            ),
            CoreError::AuthFailure => {
                ApiError::new(ErrorCode::AuthFailure, "Invalid email or password")
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
