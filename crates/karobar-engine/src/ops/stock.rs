//! # Stock Ledger
//!
//! Applies and reverses inventory deltas. Stock is only ever changed here:
//! recording a sale decrements through [`decrement`], deleting a sale
//! returns stock through [`increment`]. Nothing else in the system writes
//! the units field.
//!
//! ## Pure Transitions
//! Both operations take the current product slice and return a replacement
//! slice; the caller swaps it into the store under the lock.

use karobar_core::validation::parse_units;
use karobar_core::{CoreError, CoreResult, Product, ProductId};

/// Decrements a product's stock by the quantity sold.
///
/// ## Errors
/// - [`CoreError::ProductNotFound`] when the id matches nothing
/// - [`CoreError::Validation`] when the units field does not hold a
///   non-negative whole number
/// - [`CoreError::InsufficientStock`] when `quantity` exceeds current units
///
/// ## Invariant
/// Units never go below zero, regardless of what upstream checks concluded:
/// the new count is clamped at `max(0, units - quantity)` even though the
/// insufficient-stock gate already rejected any quantity above units.
pub fn decrement(
    products: &[Product],
    product_id: ProductId,
    quantity: i64,
) -> CoreResult<(Vec<Product>, Product)> {
    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or(CoreError::ProductNotFound(product_id))?;

    let available = parse_units(&product.units)?;
    if quantity > available {
        return Err(CoreError::InsufficientStock {
            available,
            requested: quantity,
        });
    }

    let new_units = (available - quantity).max(0);

    let mut updated = product.clone();
    updated.units = new_units.to_string();

    let next = products
        .iter()
        .map(|p| {
            if p.id == product_id {
                updated.clone()
            } else {
                p.clone()
            }
        })
        .collect();

    Ok((next, updated))
}

/// Increments a product's stock, returning units from a reversed sale.
///
/// Always succeeds: there is no upper bound on stock, and a product that no
/// longer exists leaves the slice unchanged (`None`) so the sale deletion
/// itself still goes through. A units field that no longer parses is
/// rebuilt from zero plus the returned quantity.
pub fn increment(
    products: &[Product],
    product_id: ProductId,
    quantity: i64,
) -> (Vec<Product>, Option<Product>) {
    let Some(product) = products.iter().find(|p| p.id == product_id) else {
        return (products.to_vec(), None);
    };

    let current = parse_units(&product.units).unwrap_or(0);

    let mut updated = product.clone();
    updated.units = (current + quantity).to_string();

    let next = products
        .iter()
        .map(|p| {
            if p.id == product_id {
                updated.clone()
            } else {
                p.clone()
            }
        })
        .collect();

    (next, Some(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use karobar_core::Money;

    fn products(units: &str) -> Vec<Product> {
        vec![
            Product {
                id: ProductId(1),
                name: "Steel Bottle 1L".to_string(),
                category: "Kitchen".to_string(),
                unit_price: Money::from_rupees(249),
                units: units.to_string(),
                reorder_level: 2,
                created_at: Utc::now(),
            },
            Product {
                id: ProductId(2),
                name: "Copper Jug".to_string(),
                category: "Kitchen".to_string(),
                unit_price: Money::from_rupees(599),
                units: "4".to_string(),
                reorder_level: 1,
                created_at: Utc::now(),
            },
        ]
    }

    #[test]
    fn test_decrement_updates_only_target_product() {
        let (next, updated) = decrement(&products("10"), ProductId(1), 3).unwrap();
        assert_eq!(updated.units, "7");
        assert_eq!(next[0].units, "7");
        assert_eq!(next[1].units, "4");
    }

    #[test]
    fn test_decrement_to_zero() {
        let (next, updated) = decrement(&products("10"), ProductId(1), 10).unwrap();
        assert_eq!(updated.units, "0");
        assert_eq!(next[0].units, "0");
    }

    #[test]
    fn test_decrement_insufficient_stock() {
        let err = decrement(&products("2"), ProductId(1), 3).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
            } => {
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_decrement_unknown_product() {
        let err = decrement(&products("10"), ProductId(99), 1).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(ProductId(99))));
    }

    #[test]
    fn test_decrement_rejects_corrupt_units_field() {
        let err = decrement(&products("ten"), ProductId(1), 1).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_increment_returns_stock() {
        let (next, updated) = increment(&products("7"), ProductId(1), 3);
        assert_eq!(updated.unwrap().units, "10");
        assert_eq!(next[0].units, "10");
    }

    #[test]
    fn test_increment_missing_product_is_a_noop() {
        let before = products("7");
        let (next, updated) = increment(&before, ProductId(99), 3);
        assert!(updated.is_none());
        assert_eq!(next, before);
    }

    #[test]
    fn test_increment_rebuilds_corrupt_units_from_zero() {
        let (_, updated) = increment(&products("garbled"), ProductId(1), 5);
        assert_eq!(updated.unwrap().units, "5");
    }
}
