//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Receipt  │       │
//! │  │  Cart    │     │          │     │ selected │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                │            │
//! │                   add_to_cart    set_payment_method   checkout         │
//! │                   update_item    set_cash_tendered    (sale.rs)        │
//! │                        │                                  │            │
//! │                        ▼                                  ▼            │
//! │                   clear_cart ─────────────────────► back to empty      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns the whole cart so the front-end can redraw from one
//! response.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use warung_core::{CartLedger, CartLine, Money, PaymentMethod};

use crate::error::ApiError;
use crate::state::{CatalogState, ConfigState, SessionState};

/// Cart contents, totals and payment state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
    /// `total` formatted for display, e.g. "Rp 11.000"
    pub total_display: String,
    pub payment_method: PaymentMethod,
    pub cash_tendered: Decimal,
    /// Present for cash only; negative while under-tendered.
    pub change_due: Option<Decimal>,
}

impl CartResponse {
    pub fn build(cart: &CartLedger, config: &ConfigState) -> Self {
        let total = cart.total();
        CartResponse {
            items: cart.lines().to_vec(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total,
            total_display: config.format_currency(total.units()),
            payment_method: cart.payment().method,
            cash_tendered: cart.payment().tendered,
            change_due: cart.change_due(),
        }
    }
}

pub fn get_cart(session: &SessionState, config: &ConfigState) -> Result<CartResponse, ApiError> {
    debug!("get_cart command");
    let ctx = session.require()?;
    Ok(ctx.with_cart(|c| CartResponse::build(c, config)))
}

/// Adds one unit of a product. A product already in the cart gets +1;
/// otherwise a new line is added at the catalog's current price.
pub fn add_to_cart(
    catalog: &CatalogState,
    session: &SessionState,
    config: &ConfigState,
    product_id: String,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "add_to_cart command");
    let ctx = session.require()?;

    ctx.with_cart_mut(|c| {
        c.add_item(&product_id, catalog.catalog())?;
        Ok::<_, ApiError>(CartResponse::build(c, config))
    })
}

/// Sets a line's quantity. Zero or below removes the line; above
/// `MAX_ITEM_QUANTITY` is rejected with the cart unchanged.
pub fn update_cart_item(
    session: &SessionState,
    config: &ConfigState,
    product_id: String,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");
    let ctx = session.require()?;

    ctx.with_cart_mut(|c| {
        c.set_quantity(&product_id, quantity)?;
        Ok::<_, ApiError>(CartResponse::build(c, config))
    })
}

/// Empties the cart and resets payment to cash with nothing tendered.
pub fn clear_cart(session: &SessionState, config: &ConfigState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");
    let ctx = session.require()?;

    Ok(ctx.with_cart_mut(|c| {
        c.clear();
        CartResponse::build(c, config)
    }))
}

pub fn set_payment_method(
    session: &SessionState,
    config: &ConfigState,
    method: PaymentMethod,
) -> Result<CartResponse, ApiError> {
    debug!(method = ?method, "set_payment_method command");
    let ctx = session.require()?;

    Ok(ctx.with_cart_mut(|c| {
        c.set_payment_method(method);
        CartResponse::build(c, config)
    }))
}

/// Records the cash amount as typed. Anything unreadable counts as zero.
pub fn set_cash_tendered(
    session: &SessionState,
    config: &ConfigState,
    amount: String,
) -> Result<CartResponse, ApiError> {
    debug!(amount = %amount, "set_cash_tendered command");
    let ctx = session.require()?;

    Ok(ctx.with_cart_mut(|c| {
        c.set_cash_tendered(&amount);
        CartResponse::build(c, config)
    }))
}
