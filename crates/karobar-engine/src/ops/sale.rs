//! # Sale Recorder
//!
//! Records and deletes sales.
//!
//! ## Recording Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(input)                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. product exists?        ── no ──► ProductNotFound                   │
//! │  2. quantity > 0?          ── no ──► InvalidQuantity                   │
//! │  3. selling price > 0?     ── no ──► InvalidPrice                      │
//! │  4. client named?          ── no ──► ClientRequired                    │
//! │     (skipped for estimate-driven sales)                                │
//! │  5. stock ≥ quantity?      ── no ──► InsufficientStock{avail, req}     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  allocate id ► snapshot product ► ledger decrement ► Sale              │
//! │                                                                         │
//! │  The check ORDER is part of the contract: the sale form maps each      │
//! │  error to a specific field message, and a reshuffle would surface      │
//! │  the wrong message first.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation runs strictly before mutation: a failed call returns with the
//! store untouched.
//!
//! ## Deletion
//! Deleting a sale returns its quantity to stock and removes the record.
//! Client totals are NOT reversed here; `recalculate_totals` is the repair
//! path when a client's aggregates need to follow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use karobar_core::validation::{parse_units, validate_quantity, validate_selling_price};
use karobar_core::{
    ClientId, CoreError, CoreResult, EstimateId, Money, Product, ProductId, Sale, SaleId,
};

use crate::state::EntityStore;
use super::stock;

/// Input for recording one sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    /// Product being sold.
    pub product_id: ProductId,

    /// Units sold.
    pub quantity: i64,

    /// Negotiated price per unit.
    pub selling_price: Money,

    /// Buying client, when picked from the client list.
    pub client_id: Option<ClientId>,

    /// Client name as entered on the form.
    pub client_name: String,

    /// Present when this sale is one step of an estimate conversion.
    /// Estimate-driven sales carry the estimate's client and skip the
    /// client-name requirement.
    pub estimate_id: Option<EstimateId>,
}

/// A successfully recorded sale plus the replacement product slice.
#[derive(Debug, Clone)]
pub struct RecordedSale {
    /// The new sale record.
    pub sale: Sale,

    /// Product slice with the stock decrement applied.
    pub products: Vec<Product>,
}

/// Result of deleting a sale.
#[derive(Debug, Clone)]
pub struct DeletedSale {
    /// The removed sale record.
    pub sale: Sale,

    /// Sale slice without the removed record.
    pub sales: Vec<Sale>,

    /// Product slice with the stock returned. Unchanged when the product
    /// no longer exists.
    pub products: Vec<Product>,
}

/// Validates and records a sale.
///
/// See the module docs for the check order. On success the sale id is
/// `max(existing) + 1`, the product is frozen onto the record, and stock is
/// decremented through the ledger.
pub fn record_sale(
    store: &EntityStore,
    input: &SaleInput,
    sold_at: DateTime<Utc>,
) -> CoreResult<RecordedSale> {
    // 1. Product must exist.
    let product = store
        .product(input.product_id)
        .ok_or(CoreError::ProductNotFound(input.product_id))?;

    // 2. Quantity must be a positive whole number.
    validate_quantity(input.quantity).map_err(|_| CoreError::InvalidQuantity)?;

    // 3. Selling price must be positive.
    validate_selling_price(input.selling_price).map_err(|_| CoreError::InvalidPrice)?;

    // 4. Direct sales need a client name; estimate-driven sales carry the
    //    estimate's client.
    if input.estimate_id.is_none() && input.client_name.trim().is_empty() {
        return Err(CoreError::ClientRequired);
    }

    // 5. Stock must cover the quantity.
    let available = parse_units(&product.units)?;
    if available < input.quantity {
        return Err(CoreError::InsufficientStock {
            available,
            requested: input.quantity,
        });
    }

    let sale = Sale {
        id: store.next_sale_id(),
        product_id: product.id,
        product: product.snapshot(),
        quantity: input.quantity,
        selling_price: input.selling_price,
        sold_at,
        client_id: input.client_id,
        client_name: input.client_name.trim().to_string(),
        estimate_id: input.estimate_id,
    };

    let (products, _) = stock::decrement(&store.products, product.id, input.quantity)?;

    Ok(RecordedSale { sale, products })
}

/// Deletes a sale, returning its quantity to stock.
///
/// ## Errors
/// - [`CoreError::SaleNotFound`] when the id matches nothing
///
/// Once the sale is found, deletion cannot fail: the stock increment has no
/// upper bound and tolerates a vanished product.
pub fn delete_sale(store: &EntityStore, sale_id: SaleId) -> CoreResult<DeletedSale> {
    let sale = store
        .sale(sale_id)
        .ok_or(CoreError::SaleNotFound(sale_id))?
        .clone();

    let (products, _) = stock::increment(&store.products, sale.product_id, sale.quantity);

    let sales = store
        .sales
        .iter()
        .filter(|s| s.id != sale_id)
        .cloned()
        .collect();

    Ok(DeletedSale {
        sale,
        sales,
        products,
    })
}
