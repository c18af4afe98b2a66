//! # Daily Summary
//!
//! Running totals for the cashier dashboard: sales so far, number of
//! transactions, and progress toward the daily target.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Receipt;
use crate::money::Money;

/// Sales recorded since the terminal started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySummary {
    pub total_sales: Money,
    pub transaction_count: u32,
    pub target: Money,
}

impl DailySummary {
    /// An empty day with the given sales target.
    pub fn new(target: Money) -> Self {
        Self {
            total_sales: Money::zero(),
            transaction_count: 0,
            target,
        }
    }

    /// Adds a completed sale.
    pub fn record(&mut self, receipt: &Receipt) {
        self.total_sales += receipt.total;
        self.transaction_count = self.transaction_count.saturating_add(1);
    }

    /// Sales as a percentage of target, one decimal place. Can exceed 100.
    ///
    /// A zero target reports 0.
    pub fn achievement(&self) -> Decimal {
        if self.target.units() <= 0 {
            return Decimal::ZERO;
        }

        (self.total_sales.to_decimal() * Decimal::ONE_HUNDRED / self.target.to_decimal())
            .round_dp(1)
    }

    /// Achievement capped at 100, for the progress bar width.
    pub fn progress_percent(&self) -> Decimal {
        self.achievement().min(Decimal::ONE_HUNDRED)
    }
}

impl Default for DailySummary {
    fn default() -> Self {
        Self::new(Money::from_units(crate::DEFAULT_DAILY_TARGET))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLedger;
    use crate::catalog::InMemoryCatalog;
    use crate::types::PaymentMethod;

    fn sale(product_ids: &[&str]) -> Receipt {
        let catalog = InMemoryCatalog::demo();
        let mut cart = CartLedger::new();
        for id in product_ids {
            cart.add_item(id, &catalog).unwrap();
        }
        cart.set_payment_method(PaymentMethod::Qris);
        cart.checkout().unwrap()
    }

    #[test]
    fn test_record_accumulates() {
        let mut summary = DailySummary::default();
        assert_eq!(summary.target, Money::from_units(3_000_000));

        summary.record(&sale(&["1", "1", "2"]));
        summary.record(&sale(&["5"]));

        assert_eq!(summary.total_sales, Money::from_units(3500 * 2 + 4000 + 8000));
        assert_eq!(summary.transaction_count, 2);
    }

    #[test]
    fn test_achievement() {
        let summary = DailySummary {
            total_sales: Money::from_units(2_450_000),
            transaction_count: 45,
            target: Money::from_units(3_000_000),
        };
        assert_eq!(summary.achievement(), Decimal::new(817, 1));
        assert_eq!(summary.progress_percent(), Decimal::new(817, 1));
    }

    #[test]
    fn test_progress_is_capped() {
        let summary = DailySummary {
            total_sales: Money::from_units(4_500_000),
            transaction_count: 60,
            target: Money::from_units(3_000_000),
        };
        assert_eq!(summary.achievement(), Decimal::from(150));
        assert_eq!(summary.progress_percent(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_zero_target() {
        let summary = DailySummary::new(Money::zero());
        assert_eq!(summary.achievement(), Decimal::ZERO);
    }
}
