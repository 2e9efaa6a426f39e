//! # Transaction Id Generation
//!
//! Fallback generator for purchase-application idempotency keys, used when
//! the caller did not supply a stable id.
//!
//! ## Shape
//! ```text
//! acme-traders-steel-bottle-1l-3-30000-1722945600123-0042
//! └────┬──────┘ └──────┬──────┘ │   │        │         │
//!   client        product      qty paise  millis   nano suffix
//! ```
//!
//! ## Caution: Not Reproducible
//! The id embeds the wall clock AND a subsecond-nanos suffix, so two calls
//! meant to represent the same logical event retried will produce two
//! DIFFERENT ids and will NOT dedupe against each other. Deduplication only
//! covers callers that pass a stable id of their own. Some call sites count
//! on every auto-generated call being treated as distinct, so the
//! randomness stays until product decides otherwise.

use chrono::Utc;

use karobar_core::Money;

/// Builds a transaction id from the purchase fields, the wall clock, and a
/// nanosecond-derived suffix.
pub fn generate_transaction_id(
    client_name: &str,
    product_name: &str,
    quantity: i64,
    amount: Money,
) -> String {
    let now = Utc::now();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    let suffix: u16 = (nanos % 10000) as u16;

    format!(
        "{}-{}-{}-{}-{}-{:04}",
        slug(client_name),
        slug(product_name),
        quantity,
        amount.paise(),
        now.timestamp_millis(),
        suffix
    )
}

/// Lowercases and collapses everything that isn't alphanumeric into single
/// hyphens, so the id stays one token in logs and exports.
fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Acme Traders"), "acme-traders");
        assert_eq!(slug("  Steel Bottle 1L "), "steel-bottle-1l");
        assert_eq!(slug("A & B (Pvt.) Ltd"), "a-b-pvt-ltd");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn test_id_embeds_purchase_fields() {
        let id = generate_transaction_id("Acme Traders", "Copper Jug", 3, Money::from_rupees(300));
        assert!(id.starts_with("acme-traders-copper-jug-3-30000-"));
    }

    #[test]
    fn test_ids_are_not_reproducible() {
        // Two back-to-back calls for the same logical event differ; that is
        // the documented contract, not a flake.
        let a = generate_transaction_id("Acme", "Jug", 1, Money::from_rupees(10));
        let b = generate_transaction_id("Acme", "Jug", 1, Money::from_rupees(10));
        // Millis may collide; the nano suffix almost never does alongside
        // them. Accept equality only if both halves collide at once.
        if a == b {
            let c = generate_transaction_id("Acme", "Jug", 1, Money::from_rupees(10));
            assert_ne!(a, c);
        }
    }
}
