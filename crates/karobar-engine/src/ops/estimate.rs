//! # Estimate Conversion
//!
//! A resumable state machine that walks an approved estimate's line items,
//! one recorded sale per item, and signals when the whole estimate has been
//! converted so the caller can move on to payment.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   start(estimate)                                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   InProgress { index: 0 } ──record item──► InProgress { index: 1 }     │
//! │                                  │              ...                     │
//! │                                  │                                      │
//! │                       last item recorded                                │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                      Complete { estimate_id } ──► payment step          │
//! │                                                                         │
//! │   A failed step (unmatched item, validation, stock) leaves the index   │
//! │   where it was; the dialog shows the error and the user retries or     │
//! │   walks away. Abandoning mid-way keeps the sales already recorded:     │
//! │   each step is a fully committed sale, and a partially fulfilled       │
//! │   estimate is valid business state. There is no rollback.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state is ephemeral: it lives in the conversion dialog and is dropped
//! when the last item is recorded or the dialog is closed. It survives
//! re-renders because advancing is a pure value-to-value transition.

use serde::{Deserialize, Serialize};

use karobar_core::{Estimate, EstimateId, EstimateItem, Product};

// =============================================================================
// Item Resolution
// =============================================================================

/// How an estimate line item was matched to a product.
///
/// Resolution tries the product id first and falls back to the product
/// name. The tag records which path matched so callers (and tests) can
/// tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemResolution<'a> {
    /// The item's product id matched a product.
    ById(&'a Product),

    /// The id was absent or stale, but the item's product name matched
    /// (trimmed, case-insensitive).
    ByName(&'a Product),

    /// Neither id nor name matched any product.
    Unresolved,
}

impl<'a> ItemResolution<'a> {
    /// The matched product, when there is one.
    pub fn product(&self) -> Option<&'a Product> {
        match self {
            ItemResolution::ById(p) | ItemResolution::ByName(p) => Some(p),
            ItemResolution::Unresolved => None,
        }
    }
}

/// Resolves an estimate line item against the product catalog.
///
/// Id match is exact. The name fallback trims both sides and ignores ASCII
/// case, since estimate items are often typed by hand.
pub fn resolve_item<'a>(products: &'a [Product], item: &EstimateItem) -> ItemResolution<'a> {
    if let Some(id) = item.product_id {
        if let Some(product) = products.iter().find(|p| p.id == id) {
            return ItemResolution::ById(product);
        }
    }

    let name = item.product_name.trim();
    if let Some(product) = products
        .iter()
        .find(|p| p.name.trim().eq_ignore_ascii_case(name))
    {
        return ItemResolution::ByName(product);
    }

    ItemResolution::Unresolved
}

// =============================================================================
// Conversion State
// =============================================================================

/// In-progress conversion of one estimate: the source estimate plus the
/// index of the next item to record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionState {
    estimate: Estimate,
    index: usize,
}

impl ConversionState {
    /// Starts a conversion at the first line item.
    pub fn start(estimate: Estimate) -> Self {
        ConversionState { estimate, index: 0 }
    }

    /// The estimate being converted.
    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    /// Index of the item the next recording step will use.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The line item the next recording step will use. `None` only for an
    /// estimate with no items.
    pub fn current_item(&self) -> Option<&EstimateItem> {
        self.estimate.items.get(self.index)
    }

    /// Whether items remain beyond the current one.
    pub fn has_more_items(&self) -> bool {
        self.index + 1 < self.estimate.items.len()
    }
}

/// Where the conversion stands after a successful recording step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ConversionStep {
    /// More items remain; the dialog re-renders prefilled with the item at
    /// the new index.
    InProgress(ConversionState),

    /// Every item has been recorded. The estimate id rides along so the
    /// payment created next can link back to it.
    #[serde(rename_all = "camelCase")]
    Complete { estimate_id: EstimateId },
}

/// Advances the conversion after the current item's sale was recorded.
///
/// Only called on success: a failed step keeps the old state (and index)
/// and reports the error instead.
pub fn advance(state: ConversionState) -> ConversionStep {
    if state.has_more_items() {
        ConversionStep::InProgress(ConversionState {
            index: state.index + 1,
            estimate: state.estimate,
        })
    } else {
        ConversionStep::Complete {
            estimate_id: state.estimate.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use karobar_core::{Money, ProductId};

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: ProductId(1),
                name: "Steel Bottle 1L".to_string(),
                category: "Kitchen".to_string(),
                unit_price: Money::from_rupees(249),
                units: "10".to_string(),
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

    fn item(product_id: Option<i64>, name: &str) -> EstimateItem {
        EstimateItem {
            product_id: product_id.map(ProductId),
            product_name: name.to_string(),
            quantity: 2,
            unit_price: Money::from_rupees(249),
        }
    }

    fn estimate(items: Vec<EstimateItem>) -> Estimate {
        Estimate {
            id: EstimateId(7),
            client_name: "Acme Traders".to_string(),
            items,
        }
    }

    #[test]
    fn test_resolve_by_id_wins() {
        let catalog = catalog();
        // Id points at the jug even though the name says bottle.
        let res = resolve_item(&catalog, &item(Some(2), "Steel Bottle 1L"));
        assert!(matches!(res, ItemResolution::ById(p) if p.id == ProductId(2)));
    }

    #[test]
    fn test_resolve_falls_back_to_name() {
        let catalog = catalog();
        let res = resolve_item(&catalog, &item(None, "  steel bottle 1l "));
        assert!(matches!(res, ItemResolution::ByName(p) if p.id == ProductId(1)));

        // A stale id also falls through to the name.
        let res = resolve_item(&catalog, &item(Some(99), "Copper Jug"));
        assert!(matches!(res, ItemResolution::ByName(p) if p.id == ProductId(2)));
    }

    #[test]
    fn test_resolve_unresolved() {
        let catalog = catalog();
        let res = resolve_item(&catalog, &item(Some(99), "Brass Lamp"));
        assert_eq!(res, ItemResolution::Unresolved);
        assert!(res.product().is_none());
    }

    #[test]
    fn test_state_walks_items_in_order() {
        let est = estimate(vec![
            item(Some(1), "Steel Bottle 1L"),
            item(Some(2), "Copper Jug"),
        ]);
        let state = ConversionState::start(est);
        assert_eq!(state.index(), 0);
        assert!(state.has_more_items());
        assert_eq!(state.current_item().unwrap().product_name, "Steel Bottle 1L");

        let step = advance(state);
        let ConversionStep::InProgress(state) = step else {
            panic!("expected InProgress");
        };
        assert_eq!(state.index(), 1);
        assert!(!state.has_more_items());
        assert_eq!(state.current_item().unwrap().product_name, "Copper Jug");

        let step = advance(state);
        assert_eq!(
            step,
            ConversionStep::Complete {
                estimate_id: EstimateId(7)
            }
        );
    }

    #[test]
    fn test_single_item_estimate_completes_immediately() {
        let state = ConversionState::start(estimate(vec![item(Some(1), "Steel Bottle 1L")]));
        assert!(!state.has_more_items());
        assert!(matches!(advance(state), ConversionStep::Complete { .. }));
    }
}
