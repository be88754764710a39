//! # Validation Module
//!
//! Input validation for codes, names and prices.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Decode Stage                                                 │
//! │  └── Empty payloads dropped, whitespace trimmed                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── validate_barcode    (upsert, manual entry)                        │
//! │  ├── validate_product_name (manual entry)                              │
//! │  └── validate_price      (manual entry, file load, config)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Inventory Store                                              │
//! │  └── Code uniqueness                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockscan_core::validation::{validate_barcode, is_valid_gtin};
//!
//! assert_eq!(validate_barcode("  4006381333931 ").unwrap(), "4006381333931");
//! assert!(is_valid_gtin("4006381333931"));
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_BARCODE_LENGTH, MAX_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a barcode payload and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_BARCODE_LENGTH` characters
/// - No control characters (tabs, newlines, NUL)
///
/// Payloads are otherwise opaque: QR codes may carry any printable text.
pub fn validate_barcode(code: &str) -> ValidationResult<&str> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if code.chars().count() > MAX_BARCODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LENGTH,
        });
    }

    if code.chars().any(char::is_control) {
        return Err(ValidationError::invalid_format(
            "barcode",
            "must not contain control characters",
        ));
    }

    Ok(code)
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_NAME_LENGTH` characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price. Zero is allowed (free items), negatives are not.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// GTIN Check Digits
// =============================================================================

/// Computes the GS1 check digit for a GTIN body (the digits before the
/// check digit). Returns `None` if the body is empty or not all digits.
///
/// ## Algorithm
/// ```text
/// body:     4 0 0 6 3 8 1 3 3 3 9 3
/// weights:  1 3 1 3 1 3 1 3 1 3 1 3   (3 on the rightmost body digit)
/// sum = 89  →  check = (10 - 89 % 10) % 10 = 1
/// ```
pub fn gtin_check_digit(body: &str) -> Option<u8> {
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = body
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 0 {
                digit * 3
            } else {
                digit
            }
        })
        .sum();

    Some(((10 - sum % 10) % 10) as u8)
}

/// True if `code` is a GTIN-8, UPC-A (GTIN-12), EAN-13 or GTIN-14 with a
/// correct check digit.
pub fn is_valid_gtin(code: &str) -> bool {
    if !matches!(code.len(), 8 | 12 | 13 | 14) || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let (body, check) = code.split_at(code.len() - 1);
    gtin_check_digit(body) == Some(check.as_bytes()[0] - b'0')
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_barcode() {
        assert_eq!(validate_barcode("123").unwrap(), "123");
        assert_eq!(validate_barcode("  123\n").unwrap(), "123");
        assert_eq!(
            validate_barcode("https://example.com/p/42").unwrap(),
            "https://example.com/p/42"
        );

        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("   ").is_err());
        assert!(validate_barcode("12\t3").is_err());
        assert!(validate_barcode(&"9".repeat(MAX_BARCODE_LENGTH + 1)).is_err());
        assert!(validate_barcode(&"9".repeat(MAX_BARCODE_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coca-Cola 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("  ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(0)).is_ok());
        assert!(validate_price(Money::from_cents(1099)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_gtin_check_digit() {
        // EAN-13 4006381333931
        assert_eq!(gtin_check_digit("400638133393"), Some(1));
        // UPC-A 036000291452
        assert_eq!(gtin_check_digit("03600029145"), Some(2));
        assert_eq!(gtin_check_digit(""), None);
        assert_eq!(gtin_check_digit("12a4"), None);
    }

    #[test]
    fn test_is_valid_gtin() {
        assert!(is_valid_gtin("4006381333931"));
        assert!(is_valid_gtin("036000291452"));

        assert!(!is_valid_gtin("4006381333932"));
        assert!(!is_valid_gtin("123"));
        assert!(!is_valid_gtin("40063813339A1"));
    }
}
