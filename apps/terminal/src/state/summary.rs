//! # Summary State
//!
//! Sales totals for the day. Outlives sessions: a cashier logging out and
//! back in keeps the day's figures.

use std::sync::{Mutex, PoisonError};

use warung_core::{DailySummary, Money, Receipt};

#[derive(Debug)]
pub struct SummaryState {
    summary: Mutex<DailySummary>,
}

impl SummaryState {
    pub fn new(target: Money) -> Self {
        SummaryState {
            summary: Mutex::new(DailySummary::new(target)),
        }
    }

    pub fn record(&self, receipt: &Receipt) {
        self.summary
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(receipt);
    }

    pub fn snapshot(&self) -> DailySummary {
        self.summary
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
