//! # Sale Commands
//!
//! Checkout and the cashier dashboard figures.
//!
//! ## Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout                                                               │
//! │    │                                                                    │
//! │    ├── cart empty?                    → EMPTY_CART                      │
//! │    ├── cash and tendered < total?     → INSUFFICIENT_PAYMENT            │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  Receipt {lines, total, method, change}                                 │
//! │    ├── cart reset to (empty, cash, 0)                                   │
//! │    └── recorded in the daily summary                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};
use warung_core::{Money, Receipt};

use crate::error::ApiError;
use crate::state::{ConfigState, SessionState, SummaryState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub receipt: Receipt,
    pub total_display: String,
}

/// Dashboard summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_sales: Money,
    pub transaction_count: u32,
    pub target: Money,
    /// Percent of target, one decimal place; may exceed 100
    pub achievement: Decimal,
    /// Achievement capped at 100 for the progress bar
    pub progress_percent: Decimal,
    pub total_sales_display: String,
    pub target_display: String,
}

/// Completes the sale in the cart.
pub fn checkout(
    session: &SessionState,
    summary: &SummaryState,
    config: &ConfigState,
) -> Result<CheckoutResponse, ApiError> {
    debug!("checkout command");
    let ctx = session.require()?;

    let receipt = ctx
        .with_cart_mut(|c| c.checkout())
        .inspect_err(|e| warn!(error = %e, "Checkout rejected"))?;

    summary.record(&receipt);

    info!(
        receipt_id = %receipt.id,
        cashier = %ctx.session().id,
        total = receipt.total.units(),
        method = ?receipt.method,
        lines = receipt.lines.len(),
        "Sale completed"
    );

    Ok(CheckoutResponse {
        total_display: config.format_currency(receipt.total.units()),
        receipt,
    })
}

/// Sales so far today against the target.
pub fn get_summary(
    session: &SessionState,
    summary: &SummaryState,
    config: &ConfigState,
) -> Result<SummaryResponse, ApiError> {
    debug!("get_summary command");
    session.require()?;

    let snapshot = summary.snapshot();
    Ok(SummaryResponse {
        total_sales: snapshot.total_sales,
        transaction_count: snapshot.transaction_count,
        target: snapshot.target,
        achievement: snapshot.achievement(),
        progress_percent: snapshot.progress_percent(),
        total_sales_display: config.format_currency(snapshot.total_sales.units()),
        target_display: config.format_currency(snapshot.target.units()),
    })
}
