//! # Configuration State
//!
//! Read-only settings loaded at startup.
//!
//! ## Sources (priority order)
//! 1. Environment variables (`WARUNG_*`)
//! 2. Defaults (this file)

use serde::Serialize;
use tracing::warn;
use warung_core::{Money, DEFAULT_DAILY_TARGET};

/// Terminal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shown on the dashboard header
    pub store_name: String,

    /// ISO 4217 code
    pub currency_code: String,

    /// Display prefix for amounts
    pub currency_symbol: String,

    /// Daily sales target in whole rupiah
    pub daily_target: i64,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Warung POS".to_string(),
            currency_code: "IDR".to_string(),
            currency_symbol: "Rp".to_string(),
            daily_target: DEFAULT_DAILY_TARGET,
        }
    }
}

impl ConfigState {
    /// Defaults overridden by the process environment.
    ///
    /// ## Environment Variables
    /// - `WARUNG_STORE_NAME`
    /// - `WARUNG_CURRENCY_SYMBOL`
    /// - `WARUNG_DAILY_TARGET`: whole rupiah, e.g. "3000000"
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("WARUNG_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("WARUNG_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(target) = lookup("WARUNG_DAILY_TARGET") {
            match target.trim().parse::<i64>() {
                Ok(value) if value >= 0 => config.daily_target = value,
                _ => warn!(value = %target, "Ignoring invalid WARUNG_DAILY_TARGET"),
            }
        }

        config
    }

    pub fn daily_target(&self) -> Money {
        Money::from_units(self.daily_target)
    }

    /// Formats whole rupiah the Indonesian way: `Rp 1.250.000`.
    pub fn format_currency(&self, amount: i64) -> String {
        let digits = amount.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!(
            "{}{} {}",
            if amount < 0 { "-" } else { "" },
            self.currency_symbol,
            grouped
        )
    }
}
