//! # Validation Module
//!
//! Input validation utilities for Karobar.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms (collaborator)                               │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - field validation                               │
//! │  └── Typed failures, trim-first semantics                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Operation preconditions (engine)                             │
//! │  └── Stock checks, entity existence, precedence ordering               │
//! │                                                                         │
//! │  Defense in depth: each layer catches what the one above missed        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale or purchase quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a selling price.
///
/// ## Rules
/// - Must be positive (> 0); free giveaways are not recorded as sales
pub fn validate_selling_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "sellingPrice".to_string(),
        });
    }

    Ok(())
}

/// Validates a payment amount.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a client name.
///
/// ## Rules
/// - Must not be blank after trimming
///
/// ## Returns
/// The trimmed name.
pub fn validate_client_name(name: &str) -> ValidationResult<&str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "clientName".to_string(),
        });
    }

    Ok(name)
}

/// Parses a units-in-stock field.
///
/// The store keeps units as a numeric string; every read goes through this
/// parser so a corrupted field surfaces as a typed error instead of a
/// silent zero.
///
/// ## Rules
/// - Trimmed value must be ASCII digits only (a non-negative integer)
///
/// ## Example
/// ```rust
/// use karobar_core::validation::parse_units;
///
/// assert_eq!(parse_units("10").unwrap(), 10);
/// assert_eq!(parse_units(" 7 ").unwrap(), 7);
/// assert!(parse_units("-3").is_err());
/// assert!(parse_units("ten").is_err());
/// assert!(parse_units("").is_err());
/// ```
pub fn parse_units(units: &str) -> ValidationResult<i64> {
    let trimmed = units.trim();

    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "units".to_string(),
            reason: "must be a non-negative whole number".to_string(),
        });
    }

    trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::OutOfRange {
            field: "units".to_string(),
            min: 0,
            max: i64::MAX,
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_selling_price() {
        assert!(validate_selling_price(Money::from_paise(1)).is_ok());
        assert!(validate_selling_price(Money::zero()).is_err());
        assert!(validate_selling_price(Money::from_paise(-100)).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_paise(5000)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
    }

    #[test]
    fn test_validate_client_name_trims() {
        assert_eq!(validate_client_name("  Acme Traders ").unwrap(), "Acme Traders");
        assert!(validate_client_name("").is_err());
        assert!(validate_client_name("   ").is_err());
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("0").unwrap(), 0);
        assert_eq!(parse_units("10").unwrap(), 10);
        assert_eq!(parse_units(" 42 ").unwrap(), 42);

        assert!(parse_units("").is_err());
        assert!(parse_units("  ").is_err());
        assert!(parse_units("-3").is_err());
        assert!(parse_units("3.5").is_err());
        assert!(parse_units("ten").is_err());
        assert!(parse_units("1e3").is_err());
    }

    #[test]
    fn test_parse_units_overflow_is_an_error() {
        // More digits than i64 can hold.
        assert!(parse_units("99999999999999999999").is_err());
    }
}
