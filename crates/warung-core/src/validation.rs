//! # Validation Module
//!
//! Input validation utilities for Warung POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end (TypeScript)                                       │
//! │  └── Numeric keyboards, empty-field hints                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command handler (Rust)                                       │
//! │  └── THIS MODULE: required fields, lengths, catalog constraints        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledgers                                                      │
//! │  └── Invariants (quantity ≥ 1, box stock ≥ 0)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use warung_core::validation::{parse_tendered, validate_credentials};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_credentials("cashier@pos.com", "cashier123").is_ok());
//! assert!(validate_credentials("", "cashier123").is_err());
//!
//! assert_eq!(parse_tendered("20000"), Decimal::from(20000));
//! assert_eq!(parse_tendered("abc"), Decimal::ZERO);
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest identifier accepted at login.
const MAX_IDENTIFIER_LEN: usize = 254;

/// Longest search text accepted by catalog and stock search.
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the login form before the credentials reach the session guard.
///
/// ## Rules
/// - Identifier and secret are both required (whitespace-only counts as empty)
/// - Identifier at most 254 characters
pub fn validate_credentials(identifier: &str, secret: &str) -> ValidationResult<()> {
    let identifier = identifier.trim();

    if identifier.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if identifier.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    if secret.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
pub fn validate_search_query(query: &str) -> ValidationResult<()> {
    if query.len() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(())
}

/// Validates a product id (SKU).
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a box-to-piece conversion ratio.
pub fn validate_pieces_per_box(pieces_per_box: u32) -> ValidationResult<()> {
    if pieces_per_box == 0 {
        return Err(ValidationError::MustBePositive {
            field: "pieces per box".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Lenient Parsing
// =============================================================================

/// Parses the cash amount typed by the cashier.
///
/// Reads the longest leading number, the way a numeric text field does:
/// `"12abc"` is 12, `"20000,"` is 20000, `"1e3"` is 1000. No leading number,
/// a negative amount, or a value out of `Decimal` range all read as zero.
/// Leading whitespace is ignored.
pub fn parse_tendered(text: &str) -> Decimal {
    let Some(number) = leading_number(text.trim_start()) else {
        return Decimal::ZERO;
    };

    let parsed = if number.contains('e') {
        Decimal::from_scientific(&number)
    } else {
        Decimal::from_str(&number)
    };

    match parsed {
        Ok(amount) if !amount.is_sign_negative() => amount,
        _ => Decimal::ZERO,
    }
}

/// Longest prefix of `text` shaped like `[+-]digits[.digits][e[+-]digits]`,
/// rewritten so `Decimal` can parse it (`".5"` becomes `"0.5"`, `"12."`
/// becomes `"12"`). `None` when there are no mantissa digits.
fn leading_number(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let digits_at = |start: usize| {
        bytes
            .get(start..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_len = digits_at(pos);
    let int_part = &text[pos..pos + int_len];
    pos += int_len;

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_len = digits_at(pos + 1);
        frac_part = &text[pos + 1..pos + 1 + frac_len];
        pos += 1 + frac_len;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut number = String::new();
    if negative {
        number.push('-');
    }
    number.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        number.push('.');
        number.push_str(frac_part);
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        let exp_negative = match bytes.get(exp_pos) {
            Some(b'-') => {
                exp_pos += 1;
                true
            }
            Some(b'+') => {
                exp_pos += 1;
                false
            }
            _ => false,
        };
        let exp_len = digits_at(exp_pos);
        if exp_len > 0 {
            number.push('e');
            if exp_negative {
                number.push('-');
            }
            number.push_str(&text[exp_pos..exp_pos + exp_len]);
        }
    }

    Some(number)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("cashier@pos.com", "cashier123").is_ok());

        assert_eq!(
            validate_credentials("   ", "cashier123"),
            Err(ValidationError::Required {
                field: "email".to_string()
            })
        );
        assert_eq!(
            validate_credentials("cashier@pos.com", ""),
            Err(ValidationError::Required {
                field: "password".to_string()
            })
        );
        assert!(validate_credentials(&"a".repeat(300), "x").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert!(validate_search_query("").is_ok());
        assert!(validate_search_query("indomie").is_ok());
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(3500).is_ok());
        assert!(validate_price(-1).is_err());
    }

    #[test]
    fn test_validate_pieces_per_box() {
        assert!(validate_pieces_per_box(24).is_ok());
        assert!(validate_pieces_per_box(0).is_err());
    }

    #[test]
    fn test_parse_tendered() {
        assert_eq!(parse_tendered("20000"), Decimal::from(20000));
        assert_eq!(parse_tendered(" 15000 "), Decimal::from(15000));
        assert_eq!(parse_tendered("12500.50"), Decimal::new(1250050, 2));

        assert_eq!(parse_tendered(""), Decimal::ZERO);
        assert_eq!(parse_tendered("abc"), Decimal::ZERO);
        assert_eq!(parse_tendered("-500"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_tendered_reads_leading_number() {
        assert_eq!(parse_tendered("12abc"), Decimal::from(12));
        assert_eq!(parse_tendered("20000,"), Decimal::from(20000));
        assert_eq!(parse_tendered("1e3"), Decimal::from(1000));
        assert_eq!(parse_tendered("15e-1"), Decimal::new(15, 1));
        assert_eq!(parse_tendered("1e"), Decimal::ONE);
        assert_eq!(parse_tendered(".5"), Decimal::new(5, 1));
        assert_eq!(parse_tendered("12."), Decimal::from(12));
        assert_eq!(parse_tendered("+7000"), Decimal::from(7000));
        // Dot is the decimal point, not a thousands separator.
        assert_eq!(parse_tendered("20.000"), Decimal::from(20));

        assert_eq!(parse_tendered("Rp 5000"), Decimal::ZERO);
        assert_eq!(parse_tendered("."), Decimal::ZERO);
        assert_eq!(parse_tendered("-1e3"), Decimal::ZERO);
    }
}
