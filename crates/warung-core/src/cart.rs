//! # Cart Ledger
//!
//! Owns the in-progress sale: lines, payment selection, tendered cash.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Ledger Operations                               │
//! │                                                                         │
//! │  Cashier Action           Ledger Call              State Change         │
//! │  ──────────────           ───────────              ────────────         │
//! │                                                                         │
//! │  Tap product ───────────► add_item() ───────────► qty += 1 / new line  │
//! │                                                                         │
//! │  Tap − / + ─────────────► set_quantity() ───────► qty = n (0 removes)  │
//! │                                                                         │
//! │  Tap trash ─────────────► clear() ──────────────► empty, cash, 0       │
//! │                                                                         │
//! │  Pick method ───────────► set_payment_method()                         │
//! │  Type cash ─────────────► set_cash_tendered()                          │
//! │                                                                         │
//! │  Process ───────────────► checkout() ───────────► Receipt + reset      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id, in the order products were first added
//! - Every line has 1 ≤ quantity ≤ `MAX_ITEM_QUANTITY`; reaching 0 deletes
//!   the line
//! - `subtotal` = quantity × the price captured when the line was created
//! - `total()` = Σ subtotals (0 for an empty cart), and always fits in i64:
//!   a change that would overflow it is rejected

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::ProductCatalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMethod, Product};
use crate::validation::parse_tendered;
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in the cart.
///
/// ## Price Freezing
/// `unit_price` is captured when the line is created. A catalog price change
/// mid-sale does not move the lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price at time of adding (frozen).
    pub unit_price: Money,

    pub quantity: i64,

    pub subtotal: Money,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price(),
            quantity: 1,
            subtotal: product.price(),
        }
    }

    /// Subtotal at `quantity`, or `InvalidQuantity` past the per-line cap.
    fn subtotal_for(&self, quantity: i64) -> CoreResult<Money> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::InvalidQuantity(quantity));
        }
        self.unit_price
            .checked_multiply_quantity(quantity)
            .ok_or(CoreError::InvalidQuantity(quantity))
    }
}

// =============================================================================
// Payment Selection
// =============================================================================

/// The active payment method and the cash typed in so far.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentSelection {
    pub method: PaymentMethod,

    /// Kept when switching away from cash; only cash checkouts look at it.
    #[ts(as = "String")]
    pub tendered: Decimal,
}

// =============================================================================
// Receipt
// =============================================================================

/// Snapshot returned by a successful checkout.
///
/// The ledger forgets the sale once this is handed out; storing it is the
/// caller's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub id: String,
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub method: PaymentMethod,
    /// Cash handed over; `None` for non-cash methods.
    #[ts(as = "Option<String>")]
    pub tendered: Option<Decimal>,
    /// Change returned; `None` for non-cash methods, never negative.
    #[ts(as = "Option<String>")]
    pub change_due: Option<Decimal>,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Cart Ledger
// =============================================================================

/// The in-progress sale.
#[derive(Debug, Clone)]
pub struct CartLedger {
    lines: Vec<CartLine>,
    payment: PaymentSelection,
    /// When the cart was created/last reset.
    started_at: DateTime<Utc>,
}

impl CartLedger {
    /// Creates an empty cart paying by cash with nothing tendered.
    pub fn new() -> Self {
        CartLedger {
            lines: Vec::new(),
            payment: PaymentSelection::default(),
            started_at: Utc::now(),
        }
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity + 1, subtotal recomputed from the
    ///   captured price
    /// - Product not in cart: new line, quantity 1, at the catalog's current
    ///   price
    ///
    /// ## Errors
    /// - `UnknownProduct` when the catalog cannot resolve `product_id`.
    ///   Checked first, so an unresolvable id never touches an existing line.
    /// - `InvalidQuantity` when the line is already at `MAX_ITEM_QUANTITY` or
    ///   the cart total would overflow. The cart is left as it was.
    pub fn add_item<C>(&mut self, product_id: &str, catalog: &C) -> CoreResult<&CartLine>
    where
        C: ProductCatalog + ?Sized,
    {
        let product = catalog
            .find_by_id(product_id)
            .ok_or_else(|| CoreError::UnknownProduct(product_id.to_string()))?;

        let index = match self.position(product_id) {
            Some(index) => {
                let quantity = self.lines[index].quantity + 1;
                self.apply_quantity(index, quantity)?;
                index
            }
            None => {
                let line = CartLine::from_product(product);
                self.total_with(None, line.subtotal)
                    .ok_or(CoreError::InvalidQuantity(line.quantity))?;
                self.lines.push(line);
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[index])
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: the line is removed
    /// - `quantity > 0`: quantity set, subtotal recomputed
    ///
    /// ## Errors
    /// - `LineNotFound` when there is no line for `product_id`. This never
    ///   re-adds a removed product.
    /// - `InvalidQuantity` above `MAX_ITEM_QUANTITY` or when the cart total
    ///   would overflow.
    ///
    /// On error the cart is left as it was.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        if quantity <= 0 {
            self.lines.remove(index);
        } else {
            self.apply_quantity(index, quantity)?;
        }

        Ok(())
    }

    /// Empties the cart and resets payment to cash with nothing tendered.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.payment = PaymentSelection::default();
        self.started_at = Utc::now();
    }

    /// Sum of all line subtotals.
    ///
    /// Every mutation checks the sum first, so this never saturates.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|line| line.subtotal).sum()
    }

    /// Switches the payment method. The tendered amount is kept.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment.method = method;
    }

    /// Records the cash typed by the cashier.
    ///
    /// Unparseable or negative text counts as zero.
    pub fn set_cash_tendered(&mut self, amount_text: &str) -> Decimal {
        self.payment.tendered = parse_tendered(amount_text);
        self.payment.tendered
    }

    /// Tendered minus total, for cash payments only.
    ///
    /// Negative while the customer has not handed over enough; checkout
    /// refuses in that case.
    pub fn change_due(&self) -> Option<Decimal> {
        match self.payment.method {
            PaymentMethod::Cash => Some(self.payment.tendered - self.total().to_decimal()),
            _ => None,
        }
    }

    /// Completes the sale.
    ///
    /// ## Preconditions (checked in this order)
    /// 1. Cart not empty, else `EmptyCart`
    /// 2. For cash: tendered ≥ total, else `InsufficientPayment`
    ///
    /// ## Returns
    /// A [`Receipt`]. The ledger is reset as if `clear()` had been called.
    pub fn checkout(&mut self) -> CoreResult<Receipt> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = self.total();
        let method = self.payment.method;

        let (tendered, change_due) = match method {
            PaymentMethod::Cash => {
                let tendered = self.payment.tendered;
                if tendered < total.to_decimal() {
                    return Err(CoreError::InsufficientPayment { total, tendered });
                }
                (Some(tendered), Some(tendered - total.to_decimal()))
            }
            _ => (None, None),
        };

        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            lines: std::mem::take(&mut self.lines),
            total,
            method,
            tendered,
            change_due,
            completed_at: Utc::now(),
        };

        self.clear();
        Ok(receipt)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Current payment selection.
    pub fn payment(&self) -> &PaymentSelection {
        &self.payment
    }

    /// When the cart was created or last reset.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sets a line's quantity once the new subtotal and cart total are known
    /// to fit.
    fn apply_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        let subtotal = self.lines[index].subtotal_for(quantity)?;
        self.total_with(Some(index), subtotal)
            .ok_or(CoreError::InvalidQuantity(quantity))?;

        let line = &mut self.lines[index];
        line.quantity = quantity;
        line.subtotal = subtotal;
        Ok(())
    }

    /// Cart total with the line at `replacing` (or no line) swapped for
    /// `subtotal`. `None` on overflow.
    fn total_with(&self, replacing: Option<usize>, subtotal: Money) -> Option<Money> {
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != replacing)
            .map(|(_, line)| line.subtotal);
        Money::checked_sum(others)?.checked_add(subtotal)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == product_id)
    }
}

impl Default for CartLedger {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    fn test_product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price,
            barcode: None,
            stock: 100,
        }
    }

    fn test_catalog() -> InMemoryCatalog {
        [
            test_product("1", 3500),
            test_product("2", 4000),
            test_product("3", 5000),
        ]
        .into_iter()
        .collect()
    }

    fn expected_total(cart: &CartLedger) -> i64 {
        cart.lines()
            .iter()
            .map(|l| l.quantity * l.unit_price.units())
            .sum()
    }

    #[test]
    fn test_add_item_creates_then_increments() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();

        let line = cart.add_item("1", &catalog).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.subtotal.units(), 3500);

        let line = cart.add_item("1", &catalog).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.subtotal.units(), 7000);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total().units(), 7000);
    }

    #[test]
    fn test_add_unknown_product() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();

        let err = cart.add_item("99", &catalog).unwrap_err();
        assert_eq!(err, CoreError::UnknownProduct("99".to_string()));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total().units(), 3500);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("3", &catalog).unwrap();
        cart.add_item("1", &catalog).unwrap();
        cart.add_item("3", &catalog).unwrap();

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_captured_price_survives_catalog_change() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(test_product("1", 3500)).unwrap();

        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();

        // Price goes up while the line is in the cart.
        let repriced: InMemoryCatalog = [test_product("1", 9000)].into_iter().collect();
        cart.add_item("1", &repriced).unwrap();
        cart.set_quantity("1", 4).unwrap();

        assert_eq!(cart.lines()[0].unit_price.units(), 3500);
        assert_eq!(cart.total().units(), 14000);
    }

    #[test]
    fn test_total_matches_lines_after_mixed_operations() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();

        cart.add_item("1", &catalog).unwrap();
        cart.add_item("2", &catalog).unwrap();
        cart.add_item("2", &catalog).unwrap();
        cart.set_quantity("1", 5).unwrap();
        cart.add_item("3", &catalog).unwrap();
        cart.set_quantity("2", 0).unwrap();
        cart.add_item("1", &catalog).unwrap();

        assert_eq!(cart.total().units(), expected_total(&cart));
        assert_eq!(cart.total().units(), 6 * 3500 + 5000);
        assert_eq!(cart.total_quantity(), 7);
    }

    #[test]
    fn test_set_quantity_zero_removes_and_does_not_readd() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();

        cart.set_quantity("1", 0).unwrap();
        assert!(cart.is_empty());

        let err = cart.set_quantity("1", 3).unwrap_err();
        assert_eq!(err, CoreError::LineNotFound("1".to_string()));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("2", &catalog).unwrap();

        cart.set_quantity("2", -4).unwrap();
        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_quantity_cap() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();

        cart.set_quantity("1", MAX_ITEM_QUANTITY).unwrap();
        assert_eq!(cart.total().units(), MAX_ITEM_QUANTITY * 3500);

        let err = cart.add_item("1", &catalog).unwrap_err();
        assert_eq!(err, CoreError::InvalidQuantity(MAX_ITEM_QUANTITY + 1));
        assert_eq!(cart.lines()[0].quantity, MAX_ITEM_QUANTITY);

        let err = cart.set_quantity("1", MAX_ITEM_QUANTITY + 1).unwrap_err();
        assert_eq!(err, CoreError::InvalidQuantity(MAX_ITEM_QUANTITY + 1));
        assert_eq!(cart.total().units(), expected_total(&cart));
    }

    #[test]
    fn test_huge_quantity_cannot_wrap_total() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();

        let huge = i64::MAX / 3500 + 1;
        let err = cart.set_quantity("1", huge).unwrap_err();
        assert_eq!(err, CoreError::InvalidQuantity(huge));
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.total().units(), 3500);

        // Still a normal cash sale afterwards: nothing tendered is refused.
        cart.set_cash_tendered("0");
        assert!(matches!(
            cart.checkout(),
            Err(CoreError::InsufficientPayment { .. })
        ));
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        let pricey = i64::MAX / 2 + 1;
        let catalog: InMemoryCatalog =
            [test_product("1", pricey), test_product("2", pricey)]
                .into_iter()
                .collect();
        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();

        // A second unit or a second product would push the total past i64.
        assert_eq!(
            cart.add_item("1", &catalog).unwrap_err(),
            CoreError::InvalidQuantity(2)
        );
        assert_eq!(
            cart.add_item("2", &catalog).unwrap_err(),
            CoreError::InvalidQuantity(1)
        );

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total().units(), pricey);
        assert!(!cart.total().is_negative());
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert!(CartLedger::new().total().is_zero());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();
        cart.set_payment_method(PaymentMethod::Qris);
        cart.set_cash_tendered("50000");

        cart.clear();
        let once = (cart.lines().to_vec(), cart.payment().clone());
        cart.clear();
        let twice = (cart.lines().to_vec(), cart.payment().clone());

        assert_eq!(once, twice);
        assert!(cart.is_empty());
        assert_eq!(cart.payment(), &PaymentSelection::default());
    }

    #[test]
    fn test_switching_method_keeps_tendered() {
        let mut cart = CartLedger::new();
        cart.set_cash_tendered("20000");
        cart.set_payment_method(PaymentMethod::NonCash);
        assert_eq!(cart.change_due(), None);

        cart.set_payment_method(PaymentMethod::Cash);
        assert_eq!(cart.payment().tendered, Decimal::from(20000));
        assert_eq!(cart.change_due(), Some(Decimal::from(20000)));
    }

    #[test]
    fn test_change_due_can_be_negative() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("3", &catalog).unwrap();
        cart.set_cash_tendered("2000");

        assert_eq!(cart.change_due(), Some(Decimal::from(-3000)));
    }

    #[test]
    fn test_unparseable_tendered_is_zero() {
        let mut cart = CartLedger::new();
        assert_eq!(cart.set_cash_tendered("lima ribu"), Decimal::ZERO);
        assert_eq!(cart.set_cash_tendered("-100"), Decimal::ZERO);
    }

    #[test]
    fn test_checkout_empty_cart_fails_for_every_method() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::NonCash,
            PaymentMethod::Qris,
            PaymentMethod::Debt,
        ] {
            let mut cart = CartLedger::new();
            cart.set_payment_method(method);
            cart.set_cash_tendered("100000");
            assert_eq!(cart.checkout().unwrap_err(), CoreError::EmptyCart);
        }
    }

    #[test]
    fn test_checkout_insufficient_cash() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();
        cart.add_item("2", &catalog).unwrap();
        cart.set_cash_tendered("7000");

        let err = cart.checkout().unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientPayment {
                total: Money::from_units(7500),
                tendered: Decimal::from(7000),
            }
        );
        // Nothing was consumed.
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.payment().tendered, Decimal::from(7000));
    }

    #[test]
    fn test_checkout_cash_returns_change_and_resets() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("1", &catalog).unwrap();
        cart.add_item("1", &catalog).unwrap();
        cart.add_item("3", &catalog).unwrap();
        cart.set_cash_tendered("20000");

        let receipt = cart.checkout().unwrap();
        assert_eq!(receipt.total.units(), 12000);
        assert_eq!(receipt.method, PaymentMethod::Cash);
        assert_eq!(receipt.tendered, Some(Decimal::from(20000)));
        assert_eq!(receipt.change_due, Some(Decimal::from(8000)));
        assert_eq!(receipt.lines.len(), 2);

        assert!(cart.is_empty());
        assert_eq!(cart.payment(), &PaymentSelection::default());
    }

    #[test]
    fn test_checkout_exact_cash_has_zero_change() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("2", &catalog).unwrap();
        cart.set_cash_tendered("4000");

        let receipt = cart.checkout().unwrap();
        assert_eq!(receipt.change_due, Some(Decimal::ZERO));
    }

    #[test]
    fn test_checkout_non_cash_ignores_tendered() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.add_item("3", &catalog).unwrap();
        cart.set_cash_tendered("1");
        cart.set_payment_method(PaymentMethod::Debt);

        let receipt = cart.checkout().unwrap();
        assert_eq!(receipt.method, PaymentMethod::Debt);
        assert_eq!(receipt.tendered, None);
        assert_eq!(receipt.change_due, None);
        assert!(cart.is_empty());
    }
}
